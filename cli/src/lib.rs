//! # Chatterm
//!
//! File: cli/src/lib.rs
//!
//! Terminal Q&A chatbot. A SQLite-backed conversational engine is seeded by a
//! trainer and then driven by a read-respond-print loop over stdin/stdout.
//!
//! Control flow, in dependency order:
//! `core::config` → `storage` → `engine` → `training` → `session`,
//! tied together by `commands::chat`.
//!
pub mod commands; // Command handlers invoked by main.rs
pub mod common; // Shared utilities (fs, terminal output)
pub mod core; // Core infrastructure (errors, config)
pub mod engine; // Conversational engine trait and SQLite implementation
pub mod session; // Interactive session loop and stdin reader
pub mod storage; // Database opening and schema migrations
pub mod training; // Trainer selector, built-in list and corpora
