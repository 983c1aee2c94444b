//! # Chatterm Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Entry points invoked by `main.rs`. chatterm has a single command, the
//! interactive chat, which takes its flags directly on the top-level CLI.
//!

/// The interactive chat: configuration, storage, training and the session loop.
pub mod chat;
