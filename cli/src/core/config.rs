//! # Chatterm Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module builds the single configuration handle (`AppConfig`) that the
//! rest of the application receives explicitly. It is produced exactly once at
//! process start by `AppConfig::init` and is never stored in global state.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (`ConfigOverrides`)
//! 2. An explicit `--config <file>`, which replaces steps 3 and 4 when given
//! 3. Project-specific `.chatterm.toml` in the current directory or ancestors
//! 4. User-specific `<config dir>/chatterm/config.toml`
//! 5. Default values defined in the code
//!
//! Paths are expanded (`~` to the home directory) and the merged result is
//! validated before it is handed out.
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! db = "~/.local/share/chatterm/bot.sqlite3"
//! name = "Rusty"
//! trainer = "list"
//! exit_word = "quit"
//! min_confidence = 0.6
//! ```
//!
//! Loading:
//!
//! ```rust,no_run
//! use chatterm::core::config::{AppConfig, ConfigOverrides};
//!
//! # fn run() -> chatterm::core::error::Result<()> {
//! let cfg = AppConfig::init(ConfigOverrides::default())?;
//! println!("Talking to {} (db: {})", cfg.bot_name, cfg.db_path.display());
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{ChatError, Result};
use crate::training::TrainerKind;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".chatterm.toml";

pub const DEFAULT_DB_PATH: &str = "data/chatterm.sqlite3";
pub const DEFAULT_BOT_NAME: &str = "SimpleBot";
pub const DEFAULT_TRAINER: &str = "corpus";
pub const DEFAULT_EXIT_WORD: &str = "exit";
pub const DEFAULT_RESPONSE: &str = "I am sorry, but I do not understand.";
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Raw contents of a TOML configuration file. Every key is optional so a file
/// only needs to mention what it changes.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Path to the SQLite database (can use ~).
    pub db: Option<String>,
    /// Display name of the bot.
    pub name: Option<String>,
    /// Training strategy name: corpus, list or none.
    pub trainer: Option<String>,
    /// Disable training and learning.
    pub read_only: Option<bool>,
    /// Word that ends the chat session (case-insensitive).
    pub exit_word: Option<String>,
    /// Directory of YAML corpus documents used instead of the bundled corpus (can use ~).
    pub corpus_dir: Option<String>,
    /// Reply used when nothing in the knowledge base matches well enough.
    pub default_response: Option<String>,
    /// Minimum similarity (0.0 - 1.0) for a known prompt to be considered a match.
    pub min_confidence: Option<f64>,
}

/// Values supplied on the command line. They win over every file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub name: Option<String>,
    pub trainer: Option<String>,
    pub read_only: bool,
    pub exit_word: Option<String>,
    pub corpus_dir: Option<PathBuf>,
}

/// The resolved configuration handle.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bot_name: String,
    /// Left unparsed; the trainer selector owns its validation.
    pub trainer: String,
    pub read_only: bool,
    pub exit_word: String,
    pub corpus_dir: Option<PathBuf>,
    pub default_response: String,
    pub min_confidence: f64,
}

impl AppConfig {
    /// Loads, merges and validates configuration from every source.
    ///
    /// Call once at startup and pass the result to whatever needs it.
    pub fn init(overrides: ConfigOverrides) -> Result<Self> {
        let file_config = match &overrides.config {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                load_config_from_path(path)?
            }
            None => merge_file_configs(load_user_config()?, load_project_config()?),
        };
        let config = Self::resolve(file_config, overrides)?;
        debug!("Final loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Applies CLI overrides and defaults on top of file settings, then
    /// expands and validates the result.
    pub fn resolve(file: FileConfig, overrides: ConfigOverrides) -> Result<Self> {
        let config = AppConfig {
            db_path: overrides
                .db
                .map(expand_override)
                .unwrap_or_else(|| expand_path(file.db.as_deref().unwrap_or(DEFAULT_DB_PATH))),
            bot_name: overrides
                .name
                .or(file.name)
                .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            trainer: overrides
                .trainer
                .or(file.trainer)
                .unwrap_or_else(|| DEFAULT_TRAINER.to_string()),
            read_only: overrides.read_only || file.read_only.unwrap_or(false),
            exit_word: overrides
                .exit_word
                .or(file.exit_word)
                .unwrap_or_else(|| DEFAULT_EXIT_WORD.to_string())
                .trim()
                .to_string(),
            corpus_dir: overrides
                .corpus_dir
                .map(expand_override)
                .or_else(|| file.corpus_dir.as_deref().map(expand_path)),
            default_response: file
                .default_response
                .unwrap_or_else(|| DEFAULT_RESPONSE.to_string()),
            min_confidence: file.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE),
        };
        validate_config(&config).context("Configuration validation failed")?;
        Ok(config)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Flag values may still carry a `~` when the shell left it quoted.
fn expand_override(path: PathBuf) -> PathBuf {
    if let Some(raw) = path.to_str() {
        return expand_path(raw);
    }
    path
}

fn load_user_config() -> Result<Option<FileConfig>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Chatterm", "chatterm") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<FileConfig>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = find_project_config_path(&current_dir) {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No project configuration file (.chatterm.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.chatterm.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_file_configs(user: Option<FileConfig>, project: Option<FileConfig>) -> FileConfig {
    let user = user.unwrap_or_default();
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    FileConfig {
        db: project.db.or(user.db),
        name: project.name.or(user.name),
        trainer: project.trainer.or(user.trainer),
        read_only: project.read_only.or(user.read_only),
        exit_word: project.exit_word.or(user.exit_word),
        corpus_dir: project.corpus_dir.or(user.corpus_dir),
        default_response: project.default_response.or(user.default_response),
        min_confidence: project.min_confidence.or(user.min_confidence),
    }
}

fn validate_config(config: &AppConfig) -> Result<()> {
    if config.bot_name.trim().is_empty() {
        return Err(anyhow!(ChatError::Config(
            "Bot name must not be empty.".to_string()
        )));
    }
    if config.exit_word.is_empty() {
        return Err(anyhow!(ChatError::Config(
            "Exit word must not be empty.".to_string()
        )));
    }
    // Rejected even in read-only mode, where no trainer runs.
    config.trainer.parse::<TrainerKind>()?;
    if !(0.0..=1.0).contains(&config.min_confidence) {
        return Err(anyhow!(ChatError::Config(format!(
            "min_confidence must be between 0.0 and 1.0, got {}.",
            config.min_confidence
        ))));
    }
    if config.db_path.is_dir() {
        return Err(anyhow!(ChatError::Config(format!(
            "Database path '{}' is a directory.",
            config.db_path.display()
        ))));
    }
    if let Some(dir) = &config.corpus_dir {
        if !dir.is_dir() {
            // Not fatal: corpus training falls back to the built-in list.
            warn!("Configured corpus directory '{}' does not exist.", dir.display());
        }
    }
    Ok(())
}
