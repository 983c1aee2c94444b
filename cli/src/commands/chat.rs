//! # Chatterm Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! Wires the pieces together for one run of the terminal client:
//!
//! 1. Build the configuration handle from flags, files and defaults.
//! 2. Open and migrate the SQLite database.
//! 3. Construct the engine against that database.
//! 4. Seed the knowledge base with the selected trainer (skipped in read-only mode).
//! 5. Chat over stdin/stdout until the exit word, Ctrl+C or end of input.
//!
//! Failures in steps 1-4 abort the program. Step 5 never fails.
//!
use crate::core::config::{AppConfig, ConfigOverrides};
use crate::core::error::Result;
use crate::engine::{EngineSettings, SqliteEngine};
use crate::session::{input, SessionLoop};
use crate::storage;
use crate::training::{self, BundledCorpus, CorpusSource, DirectoryCorpus, TrainerKind};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info};

/// # Chat Arguments (`ChatArgs`)
///
/// Flags accepted by `chatterm`. Anything left unset falls back to the
/// configuration files, then to built-in defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct ChatArgs {
    /// Path to the SQLite database file [default: data/chatterm.sqlite3].
    #[arg(long, value_name = "PATH", env = "CHATTERM_DB")]
    pub db: Option<PathBuf>,

    /// Bot name, shown in replies and used in training text [default: SimpleBot].
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Training method: corpus, list or none [default: corpus].
    #[arg(long, value_name = "STRATEGY")]
    pub trainer: Option<String>,

    /// Run without training or learning from the conversation.
    #[arg(long)]
    pub read_only: bool,

    /// Word that ends the chat, matched case-insensitively [default: exit].
    #[arg(long, value_name = "WORD")]
    pub exit_word: Option<String>,

    /// Directory of YAML corpus files to use instead of the bundled corpus.
    #[arg(long, value_name = "DIR")]
    pub corpus_dir: Option<PathBuf>,

    /// Configuration file to load instead of the user and project files.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl From<ChatArgs> for ConfigOverrides {
    fn from(args: ChatArgs) -> Self {
        ConfigOverrides {
            config: args.config,
            db: args.db,
            name: args.name,
            trainer: args.trainer,
            read_only: args.read_only,
            exit_word: args.exit_word,
            corpus_dir: args.corpus_dir,
        }
    }
}

/// Runs a full chat session.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let config = AppConfig::init(args.into())?;
    let mut engine = build_engine(&config)?;

    let mut lines = input::spawn_stdin_reader().context("Failed to start the input reader")?;
    let mut stdout = std::io::stdout();
    let session = SessionLoop::from_config(&config)
        .run(&mut engine, &mut lines, &mut stdout, shutdown_signal())
        .await;

    info!(
        "Session ended after {} turn(s) ({:?}).",
        session.turns(),
        session.exit_reason()
    );
    Ok(())
}

/// Opens storage, builds the engine and trains it unless read-only.
pub fn build_engine(config: &AppConfig) -> Result<SqliteEngine> {
    // The name is checked even when no training will run.
    config.trainer.parse::<TrainerKind>()?;
    let db = storage::initialize(&config.db_path)
        .with_context(|| format!("Failed to initialize storage at {}", config.db_path.display()))?;
    let mut engine = SqliteEngine::new(db, EngineSettings::from_config(config));

    if config.read_only {
        info!("Read-only mode: training skipped.");
        return Ok(engine);
    }

    let corpus: Box<dyn CorpusSource> = match &config.corpus_dir {
        Some(dir) => Box::new(DirectoryCorpus::new(dir)),
        None => Box::new(BundledCorpus),
    };
    training::train_engine(&mut engine, &config.trainer, &config.bot_name, corpus.as_ref())?;
    Ok(engine)
}

/// Resolves on Ctrl+C, or SIGTERM on Unix. If a handler cannot be installed
/// that source simply never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, closing the chat."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, closing the chat.");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
