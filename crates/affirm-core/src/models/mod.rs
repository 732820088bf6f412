//! Data models for Affirm

mod affirmation;
mod settings;

pub use affirmation::{
    validate_affirmation_text, Affirmation, AffirmationId, MAX_AFFIRMATION_CHARS,
};
pub use settings::{
    is_valid_language_tag, parse_flag, RefreshInterval, Settings, ThemeMode, MAX_FONT_SIZE,
    MIN_FONT_SIZE,
};
