//! Database layer for Affirm

mod connection;
mod migrations;
mod repository;
mod settings_repository;
mod state_repository;

pub use connection::Database;
pub use repository::{AffirmationRepository, SqliteAffirmationRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
pub use state_repository::{PresentationStateRepository, SqlitePresentationStateRepository};
