//! # Chatterm Terminal Output (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Text the chat session writes to the terminal: the start banner, the user
//! prompt and speaker-prefixed lines. Writes are best-effort. A failed write is
//! logged and otherwise ignored so the session keeps running.
//!
use std::io::Write;
use tracing::warn;

/// Prompt shown before each line of user input.
pub const USER_PROMPT: &str = "user: ";

const RULE_WIDTH: usize = 60;

/// Writes `line` followed by a newline and flushes.
pub fn emit<W: Write + ?Sized>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        warn!("Failed to write to output: {}", e);
    }
}

/// Writes the user prompt without a newline.
pub fn prompt<W: Write + ?Sized>(out: &mut W) {
    if let Err(e) = write!(out, "{}", USER_PROMPT).and_then(|_| out.flush()) {
        warn!("Failed to write prompt: {}", e);
    }
}

/// `"<speaker>: <text>"`
pub fn speaker_line(speaker: &str, text: &str) -> String {
    format!("{}: {}", speaker, text)
}

/// Framed start-of-chat banner with the exit hint.
pub fn banner(bot_name: &str, exit_word: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\nChat with {bot_name} started. Type '{exit_word}' (or Ctrl+C) to quit.\n{rule}\n"
    )
}
