//! # Chatterm Database Connection
//!
//! File: cli/src/storage/db.rs
//!
//! ## Overview
//!
//! Database connection management.
//!
//! Wraps a single rusqlite `Connection`. The chat client is single-threaded,
//! so the connection is owned directly rather than behind a lock.

use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::core::error::{ChatError, Result};
use crate::storage::migrations;

/// Capability to bring a persistence backend's schema up to date.
pub trait SchemaMigrator {
    /// Applies any pending migrations and returns the resulting schema version.
    fn migrate(&self) -> Result<u32>;
}

/// SQLite database holding the conversation knowledge base.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database file.
    ///
    /// Does not migrate; call [`SchemaMigrator::migrate`] or use
    /// [`crate::storage::initialize`].
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(ChatError::from)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(ChatError::from)?;
        info!("Database opened at {}", path.display());
        Ok(Self { conn })
    }

    /// Open a migrated in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(ChatError::from)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(ChatError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access, needed to open transactions.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Highest applied migration version (0 for a fresh file).
    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }
}

impl SchemaMigrator for Database {
    fn migrate(&self) -> Result<u32> {
        migrations::run_migrations(&self.conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_database() {
        let db = Database::in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM statements", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_without_migrate_has_no_schema() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(&temp_dir.path().join("fresh.sqlite3")).unwrap();
        assert_eq!(db.schema_version().unwrap(), 0);
        assert_eq!(db.migrate().unwrap(), migrations::LATEST_VERSION);
    }
}
