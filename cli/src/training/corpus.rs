//! # Training Corpora
//!
//! File: cli/src/training/corpus.rs
//!
//! ## Overview
//!
//! A corpus is a set of YAML documents, each shaped like:
//!
//! ```yaml
//! categories:
//! - greetings
//! conversations:
//! - - Hello
//!   - Hi
//! - - How are you doing?
//!   - I am doing well.
//! ```
//!
//! Every inner list becomes one `TrainingExample`, tagged with the document's
//! categories. Two sources are provided:
//! - `BundledCorpus`: English greetings and conversations compiled into the binary.
//! - `DirectoryCorpus`: every `.yml`/`.yaml` file below a directory, in path order.
//!
//! A source that yields no conversations is reported as unavailable.
//!
use crate::common::fs::io;
use crate::core::error::{ChatError, Result};
use crate::engine::TrainingExample;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const BUNDLED_DOCUMENTS: &[(&str, &str)] = &[
    (
        "english/greetings.yml",
        include_str!("../../corpus/english/greetings.yml"),
    ),
    (
        "english/conversations.yml",
        include_str!("../../corpus/english/conversations.yml"),
    ),
];

/// Somewhere the corpus strategy can load conversations from.
pub trait CorpusSource {
    /// Human-readable label used in log messages.
    fn name(&self) -> String;

    /// Loads every conversation of the corpus.
    fn load(&self) -> Result<Vec<TrainingExample>>;
}

#[derive(Deserialize, Debug)]
struct CorpusDocument {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    conversations: Vec<Vec<String>>,
}

/// Parses one corpus document. `origin` only appears in error messages.
pub fn parse_document(origin: &str, content: &str) -> Result<Vec<TrainingExample>> {
    let document: CorpusDocument = serde_yaml::from_str(content)
        .map_err(ChatError::from)
        .with_context(|| format!("Failed to parse corpus document {}", origin))?;
    let examples = document
        .conversations
        .into_iter()
        .filter(|turns| !turns.is_empty())
        .map(|turns| TrainingExample::new(turns).with_tags(document.categories.clone()))
        .collect();
    Ok(examples)
}

fn non_empty(origin: String, examples: Vec<TrainingExample>) -> Result<Vec<TrainingExample>> {
    if examples.is_empty() {
        return Err(anyhow!(ChatError::TrainingSourceUnavailable(format!(
            "corpus '{}' contains no conversations",
            origin
        ))));
    }
    debug!("Loaded {} conversation(s) from {}", examples.len(), origin);
    Ok(examples)
}

/// The English corpus shipped inside the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCorpus;

impl CorpusSource for BundledCorpus {
    fn name(&self) -> String {
        "bundled english".to_string()
    }

    fn load(&self) -> Result<Vec<TrainingExample>> {
        let mut examples = Vec::new();
        for (origin, content) in BUNDLED_DOCUMENTS {
            examples.extend(parse_document(origin, content)?);
        }
        non_empty(self.name(), examples)
    }
}

/// A corpus read from YAML files on disk.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml") | Some("yaml")
    )
}

impl CorpusSource for DirectoryCorpus {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    fn load(&self) -> Result<Vec<TrainingExample>> {
        if !self.root.is_dir() {
            return Err(anyhow!(ChatError::TrainingSourceUnavailable(format!(
                "corpus directory '{}' not found",
                self.root.display()
            ))));
        }

        let mut examples = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk corpus directory {}", self.root.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_yaml(path) {
                continue;
            }
            let content = io::read_file_to_string(path)?;
            examples.extend(parse_document(&path.display().to_string(), &content)?);
        }
        non_empty(self.name(), examples)
    }
}
