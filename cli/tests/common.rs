//! # Chatterm CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests. Every helper-built command points
//! at an isolated temporary directory and an explicit (empty) config file, so
//! no user or project configuration on the test machine leaks into a run.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// # Get Chatterm Command (`chatterm_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `chatterm` binary.
///
/// ## Panics
/// Panics if the `chatterm` binary cannot be found via `Command::cargo_bin`.
pub fn chatterm_cmd() -> Command {
    Command::cargo_bin("chatterm").expect("Failed to find chatterm binary for testing")
}

/// Writes `contents` as `config.toml` inside `dir` and returns its path.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

/// # Isolated Chat Command (`chat_cmd`)
///
/// `chatterm` running inside `dir` with its database at `dir/data/bot.sqlite3`
/// and an empty config file.
pub fn chat_cmd(dir: &Path) -> Command {
    let config = write_config(dir, "");
    let mut cmd = chatterm_cmd();
    cmd.current_dir(dir)
        .env_remove("CHATTERM_DB")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .arg("--db")
        .arg(dir.join("data").join("bot.sqlite3"));
    cmd
}
