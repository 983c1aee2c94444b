//! # Chatterm Schema Migrations
//!
//! File: cli/src/storage/migrations.rs
//!
//! ## Overview
//!
//! Database schema migrations.
//!
//! Versions are recorded in `schema_migrations`; each one is applied at most once.

use rusqlite::Connection;
use tracing::info;

use crate::core::error::{ChatError, Result};

pub const LATEST_VERSION: u32 = 1;

/// Run all pending database migrations and return the resulting version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(ChatError::from)?;

    let mut version = current_version(conn)?;

    if version < 1 {
        apply_v1(conn)?;
        record(conn, 1, "initial_schema")?;
        info!("Applied migration v1: initial_schema");
        version = 1;
    }

    Ok(version)
}

/// Highest recorded version, or 0 when nothing has been applied.
pub fn current_version(conn: &Connection) -> Result<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
            [],
            |row| row.get(0),
        )
        .map_err(ChatError::from)?;
    if !exists {
        return Ok(0);
    }
    let version: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(ChatError::from)?;
    Ok(version)
}

fn record(conn: &Connection, version: u32, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
        rusqlite::params![version, name],
    )
    .map_err(ChatError::from)?;
    Ok(())
}

/// Version 1: statements, tags and their join table.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS statements (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            text                  TEXT NOT NULL,
            search_text           TEXT NOT NULL DEFAULT '',
            conversation          TEXT NOT NULL DEFAULT '',
            persona               TEXT NOT NULL DEFAULT '',
            in_response_to        TEXT,
            search_in_response_to TEXT NOT NULL DEFAULT '',
            created_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_statements_search_text
            ON statements (search_text);

        CREATE INDEX IF NOT EXISTS idx_statements_search_in_response_to
            ON statements (search_in_response_to);

        CREATE TABLE IF NOT EXISTS tags (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS statement_tags (
            statement_id  INTEGER NOT NULL,
            tag_id        INTEGER NOT NULL,
            PRIMARY KEY (statement_id, tag_id),
            FOREIGN KEY (statement_id) REFERENCES statements(id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
        );
        ",
    )
    .map_err(ChatError::from)?;
    Ok(())
}
