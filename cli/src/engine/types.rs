//! # Chatterm Engine Types
//!
//! File: cli/src/engine/types.rs
//!
//! ## Overview
//!
//! Value types shared by the engine, the trainers and the session loop.

use std::fmt;

/// One turn of dialogue, from either side. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Utterance(String);

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Utterance {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Utterance {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// A scripted exchange: an ordered run of utterances, optionally labelled
/// with the corpus categories it came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingExample {
    turns: Vec<Utterance>,
    tags: Vec<String>,
}

impl TrainingExample {
    pub fn new<I, U>(turns: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<Utterance>,
    {
        Self {
            turns: turns.into_iter().map(Into::into).collect(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn turns(&self) -> &[Utterance] {
        &self.turns
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// A row of the knowledge base as seen from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    pub in_response_to: Option<String>,
    pub conversation: String,
    pub persona: String,
}
