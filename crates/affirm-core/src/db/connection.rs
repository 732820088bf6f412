//! Database connection management

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::migrations;

/// Explicitly opened handle to the local `SQLite` store
///
/// There is no process-wide instance: callers open a `Database`, pass it (or
/// a borrowed connection) to whatever needs it, and close it when done.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let database = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        database.configure()?;
        database.migrate()?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let database = Self { conn, path: None };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Close the underlying connection, surfacing any error `SQLite` reports
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, error)| Error::from(error))?;
        if let Some(path) = &self.path {
            tracing::debug!("Closed database at {}", path.display());
        }
        Ok(())
    }

    /// Configure `SQLite` for optimal performance
    fn configure(&self) -> Result<()> {
        // WAL is unavailable for in-memory databases; the pragma reports
        // "memory" instead of failing, so its result is not checked
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Filesystem path of this database, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.path().is_none());

        let value: i32 = db
            .connection()
            .query_row("SELECT 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, 1);

        db.close().unwrap();
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("affirm.db");

        let db = Database::open(&db_path).unwrap();
        assert_eq!(db.path(), Some(db_path.as_path()));
        db.close().unwrap();

        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("affirm.db");

        {
            let db = Database::open(&db_path).unwrap();
            db.connection()
                .execute(
                    "INSERT INTO settings (key, value) VALUES ('theme', 'dark')",
                    [],
                )
                .unwrap();
            db.close().unwrap();
        }

        let db = Database::open(&db_path).unwrap();
        let theme: String = db
            .connection()
            .query_row("SELECT value FROM settings WHERE key = 'theme'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(theme, "dark");
    }
}
