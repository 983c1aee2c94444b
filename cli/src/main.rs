//! # Chatterm Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the chatterm CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Handing off to the chat command
//!
//! ## Examples
//!
//! ```bash
//! # Chat with the defaults (corpus training, data/chatterm.sqlite3)
//! chatterm
//!
//! # Predictable answers, custom name and exit word, with info logging
//! chatterm -v --trainer list --name Rusty --exit-word quit
//!
//! # Reuse an existing knowledge base without changing it
//! chatterm --db ~/bots/rusty.sqlite3 --read-only
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Run the chat
//! 4. Format and display any startup errors
//!
use chatterm::commands;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "chatterm",
    about = "Terminal Q&A chatbot backed by a SQLite conversation store",
    long_about = "Chat with a bot that answers from a SQLite knowledge base.\n\
                  The knowledge base is seeded from a corpus or a built-in list and\n\
                  grows from your conversations unless --read-only is given.",
    version
)]
struct Cli {
    #[command(flatten)]
    chat: commands::chat::ChatArgs,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::chat::handle_chat(cli.chat).await {
        tracing::error!("Startup failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
