//! # Chatterm Storage Initializer (`storage`)
//!
//! File: cli/src/storage/mod.rs
//!
//! ## Overview
//!
//! Owns the SQLite database that backs the conversation knowledge base. The
//! connection is opened once at startup, the schema is brought up to date, and
//! the resulting `Database` is handed to the engine for the rest of the process.
//!
//! ## Architecture
//!
//! - `db`: the `Database` wrapper and the `SchemaMigrator` capability trait.
//! - `migrations`: versioned schema changes tracked in `schema_migrations`.
//!
//! ```rust,no_run
//! use chatterm::storage;
//! use std::path::Path;
//!
//! # fn run() -> chatterm::core::error::Result<()> {
//! let db = storage::initialize(Path::new("data/chatterm.sqlite3"))?;
//! # Ok(())
//! # }
//! ```
//!
pub mod db;
pub mod migrations;

pub use db::{Database, SchemaMigrator};

use crate::common::fs::io;
use crate::core::error::Result;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Opens (creating if needed) the database at `path` and migrates it to the
/// latest schema version.
pub fn initialize(path: &Path) -> Result<Database> {
    io::ensure_parent_dir(path)
        .with_context(|| format!("Failed to prepare directory for database {}", path.display()))?;
    let db = Database::open(path)?;
    let version = db.migrate().context("Failed to migrate database schema")?;
    info!(
        "Storage ready at {} (schema version {})",
        path.display(),
        version
    );
    Ok(db)
}
