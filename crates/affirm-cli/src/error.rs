use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] affirm_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No affirmation text provided")]
    EmptyText,
    #[error("Edited affirmation text cannot be empty")]
    EmptyEditedText,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Nothing to change; pass at least one option (see `affirm {0} --help`)")]
    NothingToChange(&'static str),
}
