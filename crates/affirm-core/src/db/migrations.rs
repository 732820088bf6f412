//! Database migrations

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension};

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);

    Ok(version)
}

/// Apply a batch of statements atomically
fn apply(conn: &Connection, version: i32, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?)",
        [version],
    )?;
    tx.commit()?;

    tracing::info!("Migrated database to version {version} (latest {CURRENT_VERSION})");
    Ok(())
}

/// Migration to version 1: Initial schema
fn migrate_v1(conn: &Connection) -> Result<()> {
    apply(
        conn,
        1,
        "
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        -- Affirmations
        CREATE TABLE IF NOT EXISTS affirmations (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_affirmations_updated ON affirmations(updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_affirmations_active ON affirmations(is_active);

        -- Settings table (local only)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
}

/// Migration to version 2: presentation state (last shown affirmation)
fn migrate_v2(conn: &Connection) -> Result<()> {
    apply(
        conn,
        2,
        "
        CREATE TABLE IF NOT EXISTS presentation_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
}
