//! Affirmation repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{Affirmation, AffirmationId};
use crate::util::unix_millis_now;
use rusqlite::types::Type;
use rusqlite::Error::FromSqlConversionFailure;
use rusqlite::{params, Connection, OptionalExtension};

const COLUMNS: &str = "id, text, is_active, created_at, updated_at";

/// Trait for affirmation storage operations
pub trait AffirmationRepository {
    /// Store a new affirmation with the given text
    fn create(&self, text: &str) -> Result<Affirmation>;

    /// Get an affirmation by ID
    fn get(&self, id: &AffirmationId) -> Result<Option<Affirmation>>;

    /// List affirmations, newest first
    fn list(&self, limit: usize, offset: usize, include_inactive: bool)
        -> Result<Vec<Affirmation>>;

    /// Every active affirmation, oldest first
    fn list_active(&self) -> Result<Vec<Affirmation>>;

    /// Replace an affirmation's text
    fn update_text(&self, id: &AffirmationId, text: &str) -> Result<Affirmation>;

    /// Include or exclude an affirmation from random selection
    fn set_active(&self, id: &AffirmationId, is_active: bool) -> Result<Affirmation>;

    /// Permanently delete an affirmation
    fn delete(&self, id: &AffirmationId) -> Result<()>;

    /// Number of stored affirmations
    fn count(&self, include_inactive: bool) -> Result<usize>;

    /// IDs starting with `prefix`, in ID order
    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// `SQLite` implementation of `AffirmationRepository`
pub struct SqliteAffirmationRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteAffirmationRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a fully-formed affirmation, keeping its ID and timestamps
    pub fn insert(&self, affirmation: &Affirmation) -> Result<()> {
        self.conn.execute(
            "INSERT INTO affirmations (id, text, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![
                affirmation.id.as_str(),
                affirmation.text,
                i32::from(affirmation.is_active),
                affirmation.created_at,
                affirmation.updated_at
            ],
        )?;
        Ok(())
    }

    /// Parse an affirmation from a database row
    fn parse_affirmation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Affirmation> {
        let id: String = row.get(0)?;
        let id = id
            .parse()
            .map_err(|error| FromSqlConversionFailure(0, Type::Text, Box::new(error)))?;
        Ok(Affirmation {
            id,
            text: row.get(1)?,
            is_active: row.get::<_, i32>(2)? != 0,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn require(&self, id: &AffirmationId) -> Result<Affirmation> {
        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

impl AffirmationRepository for SqliteAffirmationRepository<'_> {
    fn create(&self, text: &str) -> Result<Affirmation> {
        let affirmation = Affirmation::new(text);
        self.insert(&affirmation)?;
        tracing::debug!("Created affirmation {}", affirmation.id);
        Ok(affirmation)
    }

    fn get(&self, id: &AffirmationId) -> Result<Option<Affirmation>> {
        let affirmation = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM affirmations WHERE id = ?"),
                params![id.as_str()],
                Self::parse_affirmation,
            )
            .optional()?;
        Ok(affirmation)
    }

    fn list(
        &self,
        limit: usize,
        offset: usize,
        include_inactive: bool,
    ) -> Result<Vec<Affirmation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS}
             FROM affirmations
             WHERE is_active = 1 OR ?
             ORDER BY updated_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))?;

        let affirmations = stmt
            .query_map(
                params![include_inactive, limit as i64, offset as i64],
                Self::parse_affirmation,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(affirmations)
    }

    fn list_active(&self) -> Result<Vec<Affirmation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS}
             FROM affirmations
             WHERE is_active = 1
             ORDER BY created_at ASC, id ASC"
        ))?;

        let affirmations = stmt
            .query_map([], Self::parse_affirmation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(affirmations)
    }

    fn update_text(&self, id: &AffirmationId, text: &str) -> Result<Affirmation> {
        let now = unix_millis_now();

        let rows = self.conn.execute(
            "UPDATE affirmations SET text = ?, updated_at = ? WHERE id = ?",
            params![text, now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.require(id)
    }

    fn set_active(&self, id: &AffirmationId, is_active: bool) -> Result<Affirmation> {
        let now = unix_millis_now();

        let rows = self.conn.execute(
            "UPDATE affirmations SET is_active = ?, updated_at = ? WHERE id = ?",
            params![i32::from(is_active), now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.require(id)
    }

    fn delete(&self, id: &AffirmationId) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM affirmations WHERE id = ?",
            params![id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn count(&self, include_inactive: bool) -> Result<usize> {
        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM affirmations WHERE is_active = 1 OR ?",
            params![include_inactive],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let pattern = format!("{}%", escape_like(&prefix.to_ascii_lowercase()));
        let mut stmt = self.conn.prepare(
            "SELECT id FROM affirmations WHERE id LIKE ? ESCAPE '\\' ORDER BY id LIMIT ?",
        )?;

        let ids = stmt
            .query_map(params![pattern, limit as i64], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(ids)
    }
}

/// Escape `LIKE` wildcards so user input only matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
