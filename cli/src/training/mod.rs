//! # Chatterm Trainer Selector (`training`)
//!
//! File: cli/src/training/mod.rs
//!
//! ## Overview
//!
//! Seeds the engine's knowledge base before the chat starts. Three strategies
//! are available:
//!
//! - `none`: leave the knowledge base untouched.
//! - `list`: train on the built-in eleven-turn conversation (see `list`).
//! - `corpus`: train on a YAML corpus (see `corpus`). If the corpus cannot be
//!   loaded or trained for any reason, a warning is logged and the `list`
//!   strategy runs instead. This is the only place where failures are
//!   swallowed wholesale.
//!
//! Strategy names are matched case-insensitively after trimming. Any other
//! name is a configuration error.
//!
//! ```rust
//! use chatterm::training::TrainerKind;
//!
//! assert_eq!(" List ".parse::<TrainerKind>().unwrap(), TrainerKind::List);
//! assert!("markov".parse::<TrainerKind>().is_err());
//! ```
//!
pub mod corpus;
pub mod list;

pub use corpus::{BundledCorpus, CorpusSource, DirectoryCorpus};

use crate::core::error::{ChatError, Result};
use crate::engine::ConversationalEngine;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Available knowledge-base seeding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerKind {
    Corpus,
    List,
    None,
}

impl FromStr for TrainerKind {
    type Err = ChatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corpus" => Ok(TrainerKind::Corpus),
            "list" => Ok(TrainerKind::List),
            "none" => Ok(TrainerKind::None),
            _ => Err(ChatError::InvalidTrainer {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TrainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrainerKind::Corpus => "corpus",
            TrainerKind::List => "list",
            TrainerKind::None => "none",
        };
        f.write_str(name)
    }
}

/// Parses `strategy` and trains `engine` accordingly.
///
/// # Errors
///
/// `ChatError::InvalidTrainer` for an unknown strategy name, or any failure of
/// list training. Corpus failures never surface; they trigger the list
/// fallback.
pub fn train_engine<E>(
    engine: &mut E,
    strategy: &str,
    bot_name: &str,
    corpus: &dyn CorpusSource,
) -> Result<()>
where
    E: ConversationalEngine + ?Sized,
{
    let kind: TrainerKind = strategy.parse()?;

    match kind {
        TrainerKind::None => {
            info!("Skipping training (trainer=none).");
            Ok(())
        }
        TrainerKind::List => train_with_list(engine, bot_name),
        TrainerKind::Corpus => match train_with_corpus(engine, corpus) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Corpus training failed: {:#}", e);
                warn!("Falling back to list training.");
                train_with_list(engine, bot_name)
            }
        },
    }
}

fn train_with_list<E>(engine: &mut E, bot_name: &str) -> Result<()>
where
    E: ConversationalEngine + ?Sized,
{
    info!("Training with a small built-in conversation list...");
    engine.train(&list::builtin_conversation(bot_name))?;
    info!("List training complete.");
    Ok(())
}

fn train_with_corpus<E>(engine: &mut E, corpus: &dyn CorpusSource) -> Result<()>
where
    E: ConversationalEngine + ?Sized,
{
    info!(
        "Training with corpus '{}' (this may take a moment)...",
        corpus.name()
    );
    let conversations = corpus.load()?;
    engine.train_all(&conversations)?;
    info!("Corpus training complete.");
    Ok(())
}
