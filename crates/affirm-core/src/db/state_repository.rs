//! Presentation state repository
//!
//! Holds the id of the affirmation shown last, which the next random
//! selection avoids.

use crate::error::Result;
use crate::models::AffirmationId;
use rusqlite::{params, Connection, OptionalExtension};

const LAST_SHOWN_KEY: &str = "last_shown_id";

/// Trait for presentation state storage
pub trait PresentationStateRepository {
    /// ID of the affirmation shown last, if any
    fn last_shown_id(&self) -> Result<Option<AffirmationId>>;

    /// Remember (or forget, with `None`) the affirmation shown last
    fn set_last_shown_id(&self, id: Option<&AffirmationId>) -> Result<()>;
}

/// `SQLite` implementation of `PresentationStateRepository`
pub struct SqlitePresentationStateRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqlitePresentationStateRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl PresentationStateRepository for SqlitePresentationStateRepository<'_> {
    fn last_shown_id(&self) -> Result<Option<AffirmationId>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM presentation_state WHERE key = ?",
                params![LAST_SHOWN_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw.and_then(|value| match value.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring malformed last shown id {value:?}");
                None
            }
        }))
    }

    fn set_last_shown_id(&self, id: Option<&AffirmationId>) -> Result<()> {
        if let Some(id) = id {
            self.conn.execute(
                "INSERT OR REPLACE INTO presentation_state (key, value) VALUES (?, ?)",
                params![LAST_SHOWN_KEY, id.as_str()],
            )?;
        } else {
            self.conn.execute(
                "DELETE FROM presentation_state WHERE key = ?",
                params![LAST_SHOWN_KEY],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_last_shown_starts_empty() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqlitePresentationStateRepository::new(db.connection());
        assert_eq!(repo.last_shown_id().unwrap(), None);
    }

    #[test]
    fn test_set_replace_and_clear() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqlitePresentationStateRepository::new(db.connection());

        let first = AffirmationId::new();
        let second = AffirmationId::new();

        repo.set_last_shown_id(Some(&first)).unwrap();
        assert_eq!(repo.last_shown_id().unwrap(), Some(first));

        repo.set_last_shown_id(Some(&second)).unwrap();
        assert_eq!(repo.last_shown_id().unwrap(), Some(second));

        repo.set_last_shown_id(None).unwrap();
        assert_eq!(repo.last_shown_id().unwrap(), None);
    }

    #[test]
    fn test_malformed_value_reads_as_none() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO presentation_state (key, value) VALUES ('last_shown_id', 'oops')",
                [],
            )
            .unwrap();

        let repo = SqlitePresentationStateRepository::new(db.connection());
        assert_eq!(repo.last_shown_id().unwrap(), None);
    }
}
