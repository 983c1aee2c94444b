//! # Chatterm Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundations shared by every other module:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//!
//! ```rust
//! use chatterm::core::config; // For loading configuration
//! use chatterm::core::error::{ChatError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
