//! Affirmation model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Maximum length of an affirmation, in characters
pub const MAX_AFFIRMATION_CHARS: usize = 280;

/// A unique identifier for an affirmation, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AffirmationId(Uuid);

impl AffirmationId {
    /// Create a new unique affirmation ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for AffirmationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AffirmationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AffirmationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A user-authored affirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affirmation {
    /// Unique identifier
    pub id: AffirmationId,
    /// Display text
    pub text: String,
    /// Only active affirmations take part in random selection
    pub is_active: bool,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Affirmation {
    /// Create a new, active affirmation with the given text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let now = crate::util::unix_millis_now();
        Self {
            id: AffirmationId::new(),
            text: text.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// First line of the text with whitespace collapsed, truncated to
    /// `max_chars` with a trailing ellipsis
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.text.lines().next().unwrap_or("").trim();
        let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.chars().count() <= max_chars {
            collapsed
        } else {
            let take_len = max_chars.saturating_sub(3);
            let mut truncated = collapsed.chars().take(take_len).collect::<String>();
            truncated.push_str("...");
            truncated
        }
    }

    /// Check if the text is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Trim affirmation text and check it is non-empty and within
/// [`MAX_AFFIRMATION_CHARS`].
pub fn validate_affirmation_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("affirmation text cannot be empty".into()));
    }

    let len = trimmed.chars().count();
    if len > MAX_AFFIRMATION_CHARS {
        return Err(Error::InvalidInput(format!(
            "affirmation text is {len} characters; the limit is {MAX_AFFIRMATION_CHARS}"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmation_id_unique() {
        let id1 = AffirmationId::new();
        let id2 = AffirmationId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_affirmation_id_parse() {
        let id = AffirmationId::new();
        let parsed: AffirmationId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_affirmation_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<AffirmationId>().is_err());
    }

    #[test]
    fn test_affirmation_new() {
        let affirmation = Affirmation::new("I am enough");
        assert_eq!(affirmation.text, "I am enough");
        assert!(affirmation.is_active);
        assert!(affirmation.created_at > 0);
        assert_eq!(affirmation.created_at, affirmation.updated_at);
    }

    #[test]
    fn test_preview() {
        let affirmation = Affirmation::new("I am calm\nand collected");
        assert_eq!(affirmation.preview(50), "I am calm");

        let long = Affirmation::new("Every day I grow a little stronger than before");
        assert_eq!(long.preview(20), "Every day I grow ...");
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        let affirmation = Affirmation::new("  I   breathe    deeply ");
        assert_eq!(affirmation.preview(50), "I breathe deeply");
    }

    #[test]
    fn test_is_blank() {
        assert!(Affirmation::new(" \n ").is_blank());
        assert!(!Affirmation::new("I can").is_blank());
    }

    #[test]
    fn test_validate_trims() {
        assert_eq!(
            validate_affirmation_text("  I am loved  ").unwrap(),
            "I am loved"
        );
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            validate_affirmation_text(" \t\n"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_too_long() {
        let text = "a".repeat(MAX_AFFIRMATION_CHARS + 1);
        assert!(validate_affirmation_text(&text).is_err());

        let text = "a".repeat(MAX_AFFIRMATION_CHARS);
        assert!(validate_affirmation_text(&text).is_ok());
    }
}
