//! # Chatterm Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used throughout
//! chatterm. It provides a consistent approach to error management with detailed
//! error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ChatError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The variants map onto how each failure is treated at runtime:
//! - Configuration errors (`Config`, `InvalidTrainer`) abort startup
//! - `TrainingSourceUnavailable` is recovered by falling back to list training
//! - `ResponseGeneration` is recovered inside the chat loop with an apology
//! - `FileSystem`, `Storage` and `Corpus` describe startup and I/O failures
//!
//! ## Examples
//!
//! ```rust
//! use anyhow::Context;
//! use chatterm::core::error::{ChatError, Result};
//!
//! fn pick(name: &str) -> Result<()> {
//!     if name != "list" {
//!         return Err(ChatError::InvalidTrainer { name: name.to_string() }.into());
//!     }
//!     Ok(())
//! }
//!
//! let err = pick("bogus").context("Failed to train the bot").unwrap_err();
//! assert!(err.downcast_ref::<ChatError>().map_or(false, ChatError::is_configuration));
//! ```
//!
use thiserror::Error;

/// Custom error type for chatterm.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid trainer '{name}'. Use: corpus, list, or none.")]
    InvalidTrainer { name: String },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Training source unavailable: {0}")]
    TrainingSourceUnavailable(String),

    #[error("Response generation failed: {0}")]
    ResponseGeneration(String),

    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: rusqlite::Error,
    },

    #[error("Malformed corpus document: {source}")]
    Corpus {
        #[from]
        source: serde_yaml::Error,
    },
}

impl ChatError {
    /// True for the errors that must abort the program instead of degrading.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ChatError::Config(_) | ChatError::InvalidTrainer { .. })
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
