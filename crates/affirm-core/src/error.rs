//! Error types for affirm-core

use thiserror::Error;

/// Result type alias using affirm-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in affirm-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Affirmation (or other record) not found
    #[error("Affirmation not found: {0}")]
    NotFound(String),

    /// Identifier prefix matched more than one record
    #[error("{0}")]
    Ambiguous(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Widget shared storage error
    #[error("Widget storage error: {0}")]
    WidgetStorage(String),
}
