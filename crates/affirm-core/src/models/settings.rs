//! Application settings model

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accessibility font size, in points
pub const MIN_FONT_SIZE: u32 = 10;
/// Largest accessibility font size, in points
pub const MAX_FONT_SIZE: u32 = 32;

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(Error::InvalidInput(format!("unknown theme '{other}'"))),
        }
    }
}

/// How often the home-screen widget picks a new affirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RefreshInterval {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[default]
    #[serde(rename = "1h")]
    Hourly,
    #[serde(rename = "6h")]
    EverySixHours,
    #[serde(rename = "1d")]
    Daily,
}

impl RefreshInterval {
    /// All supported intervals, shortest first
    pub const ALL: [Self; 4] = [
        Self::FifteenMinutes,
        Self::Hourly,
        Self::EverySixHours,
        Self::Daily,
    ];

    #[must_use]
    pub const fn minutes(self) -> u32 {
        match self {
            Self::FifteenMinutes => 15,
            Self::Hourly => 60,
            Self::EverySixHours => 6 * 60,
            Self::Daily => 24 * 60,
        }
    }

    #[must_use]
    pub fn as_millis(self) -> i64 {
        i64::from(self.minutes()) * 60_000
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15m",
            Self::Hourly => "1h",
            Self::EverySixHours => "6h",
            Self::Daily => "1d",
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RefreshInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|interval| interval.label() == value)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown refresh interval '{value}' (expected one of 15m, 1h, 6h, 1d)"
                ))
            })
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Theme mode
    pub theme: ThemeMode,
    /// Widget refresh cadence
    pub refresh_interval: RefreshInterval,
    /// UI language tag (e.g. "en", "pt-BR")
    pub language: String,
    /// Accessibility text size in points
    pub font_size: u32,
    /// Accessibility high-contrast palette
    pub high_contrast: bool,
    /// Whether the home-screen widget shows affirmations at all
    pub show_on_widget: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            refresh_interval: RefreshInterval::Hourly,
            language: "en".to_string(),
            font_size: 16,
            high_contrast: false,
            show_on_widget: true,
        }
    }
}

impl Settings {
    /// Check every field is within its accepted range
    pub fn validate(&self) -> Result<()> {
        if !is_valid_language_tag(&self.language) {
            return Err(Error::InvalidInput(format!(
                "invalid language tag '{}'",
                self.language
            )));
        }

        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(Error::InvalidInput(format!(
                "font size {} is outside {MIN_FONT_SIZE}..={MAX_FONT_SIZE}",
                self.font_size
            )));
        }

        Ok(())
    }
}

/// Check a language tag has the `ll` or `ll-CC` shape
#[must_use]
pub fn is_valid_language_tag(tag: &str) -> bool {
    static LANGUAGE_TAG: OnceLock<Regex> = OnceLock::new();
    LANGUAGE_TAG
        .get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").expect("Invalid regex"))
        .is_match(tag)
}

/// Parse the loose boolean spellings accepted in settings storage and on the CLI
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.font_size, 16);
        assert_eq!(settings.theme, ThemeMode::System);
        assert_eq!(settings.refresh_interval, RefreshInterval::Hourly);
        assert!(settings.show_on_widget);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_refresh_interval_labels() {
        for interval in RefreshInterval::ALL {
            let parsed: RefreshInterval = interval.label().parse().unwrap();
            assert_eq!(parsed, interval);
        }
        assert!("2h".parse::<RefreshInterval>().is_err());
    }

    #[test]
    fn test_refresh_interval_serde_uses_labels() {
        let json = serde_json::to_string(&RefreshInterval::EverySixHours).unwrap();
        assert_eq!(json, "\"6h\"");
    }

    #[test]
    fn test_refresh_interval_millis() {
        assert_eq!(RefreshInterval::FifteenMinutes.as_millis(), 900_000);
        assert_eq!(RefreshInterval::Daily.as_millis(), 86_400_000);
    }

    #[test]
    fn test_language_tags() {
        assert!(is_valid_language_tag("en"));
        assert!(is_valid_language_tag("pt-BR"));
        assert!(is_valid_language_tag("fil"));
        assert!(!is_valid_language_tag("EN"));
        assert!(!is_valid_language_tag("pt_br"));
        assert!(!is_valid_language_tag(""));
    }

    #[test]
    fn test_validate_font_size_bounds() {
        let mut settings = Settings {
            font_size: MAX_FONT_SIZE + 1,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.font_size = MIN_FONT_SIZE;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
