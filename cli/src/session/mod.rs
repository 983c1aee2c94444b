//! # Chatterm Session Loop (`session`)
//!
//! File: cli/src/session/mod.rs
//!
//! ## Overview
//!
//! Drives one interactive chat: read a line, hand it to the engine, print the
//! reply, repeat. The loop is a small state machine:
//!
//! ```text
//! AwaitingInput --line--> Processing --reply/apology--> AwaitingInput
//!       |
//!       +--exit word / Ctrl+C / end of input--> Closed
//! ```
//!
//! ## Behavior
//!
//! - Blank or whitespace-only lines are ignored; the engine is not called.
//! - A line equal to the exit word (ignoring case) prints a farewell and closes.
//! - An interrupt or end of input is handled exactly like the exit word.
//! - Any failure while producing a reply (or reading a line) is logged with
//!   full detail, an apology is printed, and the loop keeps going.
//!
//! `SessionLoop::run` never returns an error. It always finishes with the
//! session in the `Closed` state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn example(engine: &mut chatterm::engine::SqliteEngine) -> std::io::Result<()> {
//! use chatterm::session::{input, SessionLoop};
//!
//! let mut lines = input::spawn_stdin_reader()?;
//! let session = SessionLoop::new("Rusty", "exit")
//!     .run(engine, &mut lines, &mut std::io::stdout(), async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await;
//! println!("{} turn(s)", session.turns());
//! # Ok(())
//! # }
//! ```
//!
pub mod input;

use crate::common::ui;
use crate::core::config::AppConfig;
use crate::engine::{ConversationalEngine, Utterance};
use input::LineReceiver;
use std::future::Future;
use std::io::Write;
use tracing::{debug, error, info};

const FAREWELL: &str = "Goodbye! 👋";
const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Processing,
    Closed,
}

/// Why a session closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExitWord,
    Interrupted,
    EndOfInput,
}

/// Transient per-process chat state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    turns: u64,
    exit_reason: Option<ExitReason>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: SessionState::AwaitingInput,
            turns: 0,
            exit_reason: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of lines that were handed to the engine.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason
    }

    fn close(&mut self, reason: ExitReason) {
        self.state = SessionState::Closed;
        self.exit_reason = Some(reason);
    }
}

enum InputEvent {
    Line(String),
    ReadFailed(std::io::Error),
    EndOfInput,
    Interrupted,
}

/// The read-respond-print loop.
#[derive(Debug, Clone)]
pub struct SessionLoop {
    bot_name: String,
    exit_word: String,
}

impl SessionLoop {
    pub fn new(bot_name: impl Into<String>, exit_word: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            exit_word: exit_word.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.bot_name.clone(), config.exit_word.clone())
    }

    fn is_exit_word(&self, text: &str) -> bool {
        text.to_lowercase() == self.exit_word.to_lowercase()
    }

    fn say<W: Write + ?Sized>(&self, out: &mut W, text: &str) {
        ui::emit(out, &ui::speaker_line(&self.bot_name, text));
    }

    /// Runs until the exit word, `interrupt` resolving, or the input channel
    /// closing. Returns the closed session.
    pub async fn run<E, W, F>(
        &self,
        engine: &mut E,
        lines: &mut LineReceiver,
        out: &mut W,
        interrupt: F,
    ) -> Session
    where
        E: ConversationalEngine + ?Sized,
        W: Write + ?Sized,
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        let mut session = Session::new();

        ui::emit(out, &ui::banner(&self.bot_name, &self.exit_word));
        info!("Chat session started.");

        while session.state != SessionState::Closed {
            ui::prompt(out);

            let event = tokio::select! {
                biased;
                _ = &mut interrupt => InputEvent::Interrupted,
                line = lines.recv() => match line {
                    Some(Ok(line)) => InputEvent::Line(line),
                    Some(Err(e)) => InputEvent::ReadFailed(e),
                    None => InputEvent::EndOfInput,
                },
            };

            match event {
                InputEvent::Interrupted => {
                    ui::emit(out, "");
                    self.say(out, FAREWELL);
                    session.close(ExitReason::Interrupted);
                }
                InputEvent::EndOfInput => {
                    ui::emit(out, "");
                    self.say(out, FAREWELL);
                    session.close(ExitReason::EndOfInput);
                }
                InputEvent::ReadFailed(e) => {
                    error!("Failed to read input: {:?}", e);
                    self.say(out, APOLOGY);
                }
                InputEvent::Line(line) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    if self.is_exit_word(text) {
                        self.say(out, FAREWELL);
                        session.close(ExitReason::ExitWord);
                        continue;
                    }

                    session.state = SessionState::Processing;
                    session.turns += 1;
                    match engine.respond(&Utterance::new(text)) {
                        Ok(reply) => self.say(out, reply.as_str()),
                        Err(e) => {
                            error!("Unexpected error while responding to {:?}: {:?}", text, e);
                            self.say(out, APOLOGY);
                        }
                    }
                    session.state = SessionState::AwaitingInput;
                }
            }
        }

        debug!(
            "Chat session closed after {} turn(s): {:?}",
            session.turns, session.exit_reason
        );
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ChatError, Result};
    use crate::engine::TrainingExample;
    use std::future::{pending, ready};
    use tokio::sync::mpsc;

    /// Echoes input and records every call; optionally fails on one call (1-based).
    #[derive(Default)]
    struct MockEngine {
        calls: Vec<String>,
        fail_on: Option<usize>,
    }

    impl ConversationalEngine for MockEngine {
        fn train(&mut self, _conversation: &TrainingExample) -> Result<()> {
            Ok(())
        }

        fn respond(&mut self, input: &Utterance) -> Result<Utterance> {
            self.calls.push(input.as_str().to_string());
            if self.fail_on == Some(self.calls.len()) {
                return Err(ChatError::ResponseGeneration("storage went away".into()).into());
            }
            Ok(Utterance::new(format!("echo:{}", input)))
        }
    }

    fn feed(lines: &[&str]) -> LineReceiver {
        let (tx, rx) = mpsc::channel(lines.len() + 1);
        for line in lines {
            tx.try_send(Ok(line.to_string())).unwrap();
        }
        rx
    }

    async fn run_lines(engine: &mut MockEngine, lines: &[&str]) -> (Session, String) {
        let mut rx = feed(lines);
        let mut out = Vec::new();
        let session = SessionLoop::new("TestBot", "exit")
            .run(engine, &mut rx, &mut out, pending())
            .await;
        (session, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_hello_blank_exit_scenario() {
        let mut engine = MockEngine::default();
        let (session, out) = run_lines(&mut engine, &["hello", "", "exit"]).await;

        assert_eq!(engine.calls, vec!["hello"]);
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.exit_reason(), Some(ExitReason::ExitWord));
        assert_eq!(session.turns(), 1);
        assert!(out.contains("TestBot: echo:hello\n"));
        assert!(out.ends_with("TestBot: Goodbye! 👋\n"));
    }

    #[tokio::test]
    async fn test_one_reply_per_non_empty_line() {
        let mut engine = MockEngine::default();
        let (_, out) = run_lines(&mut engine, &["one", "two", "  three  ", "exit"]).await;

        assert_eq!(engine.calls, vec!["one", "two", "three"]);
        assert_eq!(out.matches("TestBot: echo:").count(), 3);
    }

    #[tokio::test]
    async fn test_whitespace_never_reaches_engine() {
        let mut engine = MockEngine::default();
        let (session, out) = run_lines(&mut engine, &["", "   ", "\t", "exit"]).await;

        assert!(engine.calls.is_empty());
        assert_eq!(session.turns(), 0);
        assert!(!out.contains("echo:"));
    }

    #[tokio::test]
    async fn test_exit_word_any_casing() {
        for word in ["exit", "EXIT", "ExIt", "  Exit  "] {
            let mut engine = MockEngine::default();
            let (session, out) = run_lines(&mut engine, &[word, "after"]).await;

            assert!(engine.calls.is_empty(), "engine called for {:?}", word);
            assert_eq!(session.exit_reason(), Some(ExitReason::ExitWord));
            assert!(out.contains("TestBot: Goodbye! 👋"));
        }
    }

    #[tokio::test]
    async fn test_failure_prints_one_apology_and_continues() {
        let mut engine = MockEngine {
            fail_on: Some(2),
            ..Default::default()
        };
        let (session, out) = run_lines(&mut engine, &["a", "b", "c", "exit"]).await;

        assert_eq!(engine.calls, vec!["a", "b", "c"]);
        assert_eq!(out.matches(APOLOGY).count(), 1);
        assert!(out.contains("TestBot: echo:a\n"));
        assert!(!out.contains("echo:b"));
        assert!(out.contains("TestBot: echo:c\n"));
        assert_eq!(session.exit_reason(), Some(ExitReason::ExitWord));
    }

    #[tokio::test]
    async fn test_end_of_input_says_goodbye() {
        let mut engine = MockEngine::default();
        let (session, out) = run_lines(&mut engine, &["hi"]).await;

        assert_eq!(engine.calls, vec!["hi"]);
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.exit_reason(), Some(ExitReason::EndOfInput));
        assert!(out.ends_with("\nTestBot: Goodbye! 👋\n"));
    }

    #[tokio::test]
    async fn test_interrupt_says_goodbye_without_responding() {
        let mut engine = MockEngine::default();
        let mut rx = feed(&["hello"]);
        let mut out = Vec::new();

        let session = SessionLoop::new("TestBot", "exit")
            .run(&mut engine, &mut rx, &mut out, ready(()))
            .await;

        assert!(engine.calls.is_empty());
        assert_eq!(session.exit_reason(), Some(ExitReason::Interrupted));
        assert!(String::from_utf8(out).unwrap().contains("TestBot: Goodbye! 👋"));
    }

    #[tokio::test]
    async fn test_read_error_apologizes_and_continues() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.try_send(Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        )))
        .unwrap();
        tx.try_send(Ok("still here".to_string())).unwrap();
        tx.try_send(Ok("exit".to_string())).unwrap();
        drop(tx);

        let mut engine = MockEngine::default();
        let mut out = Vec::new();
        let session = SessionLoop::new("TestBot", "exit")
            .run(&mut engine, &mut rx, &mut out, pending())
            .await;

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(APOLOGY).count(), 1);
        assert_eq!(engine.calls, vec!["still here"]);
        assert_eq!(session.exit_reason(), Some(ExitReason::ExitWord));
    }

    #[tokio::test]
    async fn test_custom_exit_word() {
        let mut engine = MockEngine::default();
        let mut rx = feed(&["exit", "QUIT"]);
        let mut out = Vec::new();

        let session = SessionLoop::new("TestBot", "quit")
            .run(&mut engine, &mut rx, &mut out, pending())
            .await;

        assert_eq!(engine.calls, vec!["exit"]);
        assert_eq!(session.exit_reason(), Some(ExitReason::ExitWord));
    }
}
