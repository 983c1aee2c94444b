//! # Chatterm Conversational Engine (`engine`)
//!
//! File: cli/src/engine/mod.rs
//!
//! ## Overview
//!
//! The engine turns one user utterance into one reply and can be seeded with
//! scripted conversations. The session loop and the trainer selector only see
//! the `ConversationalEngine` trait, so the matching strategy and the storage
//! behind it can be swapped without touching either.
//!
//! ## Architecture
//!
//! - `types`: `Utterance`, `TrainingExample` and the stored `Statement` record.
//! - `matcher`: text normalisation and similarity scoring.
//! - `sqlite`: `SqliteEngine`, a statement/response knowledge base stored in
//!   the database opened by the storage initializer.
//!
pub mod matcher;
pub mod sqlite;
pub mod types;

pub use sqlite::{EngineSettings, SqliteEngine};
pub use types::{Statement, TrainingExample, Utterance};

use crate::core::error::Result;

/// Capability contract for anything that can learn from scripted exchanges
/// and answer user input.
pub trait ConversationalEngine {
    /// Adds one scripted exchange to the knowledge base. Each turn is treated
    /// as the response to the turn before it.
    fn train(&mut self, conversation: &TrainingExample) -> Result<()>;

    /// Produces a reply to `input`.
    fn respond(&mut self, input: &Utterance) -> Result<Utterance>;

    /// Trains on several exchanges. Implementations backed by transactional
    /// storage should apply all of them or none.
    fn train_all(&mut self, conversations: &[TrainingExample]) -> Result<()> {
        for conversation in conversations {
            self.train(conversation)?;
        }
        Ok(())
    }
}
