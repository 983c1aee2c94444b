//! # Chatterm Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to one part of the chat pipeline.
//!
//! - **`fs`**: Directory creation and file reading with error context.
//! - **`ui`**: Terminal output for the chat session (banner, prompt, speaker lines).
//!

/// Utilities for filesystem operations.
pub mod fs;
/// Terminal output helpers for the chat session.
pub mod ui;
