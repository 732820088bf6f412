//! Settings repository implementation

use crate::error::Result;
use crate::models::{parse_flag, Settings, MAX_FONT_SIZE, MIN_FONT_SIZE};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for settings storage operations
pub trait SettingsRepository {
    /// Load settings from the database
    fn load(&self) -> Result<Settings>;

    /// Save settings to the database
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Parse a stored value, keeping the default when it is unreadable
fn parse_or_keep<T>(
    key: &str,
    raw: &str,
    current: &mut T,
    parse: impl FnOnce(&str) -> Option<T>,
) {
    match parse(raw) {
        Some(value) => *current = value,
        None => tracing::warn!("Ignoring unreadable setting {key}={raw:?}"),
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(value) = self.get_setting("theme")? {
            parse_or_keep("theme", &value, &mut settings.theme, |raw| raw.parse().ok());
        }

        if let Some(value) = self.get_setting("refresh_interval")? {
            parse_or_keep(
                "refresh_interval",
                &value,
                &mut settings.refresh_interval,
                |raw| raw.parse().ok(),
            );
        }

        if let Some(value) = self.get_setting("language")? {
            parse_or_keep("language", &value, &mut settings.language, |raw| {
                crate::models::is_valid_language_tag(raw).then(|| raw.to_string())
            });
        }

        if let Some(value) = self.get_setting("font_size")? {
            parse_or_keep("font_size", &value, &mut settings.font_size, |raw| {
                raw.trim()
                    .parse()
                    .ok()
                    .filter(|size| (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(size))
            });
        }

        if let Some(value) = self.get_setting("high_contrast")? {
            parse_or_keep("high_contrast", &value, &mut settings.high_contrast, parse_flag);
        }

        if let Some(value) = self.get_setting("show_on_widget")? {
            parse_or_keep("show_on_widget", &value, &mut settings.show_on_widget, parse_flag);
        }

        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let repo = SqliteSettingsRepository::new(&tx);
            repo.set_setting("theme", settings.theme.as_str())?;
            repo.set_setting("refresh_interval", settings.refresh_interval.label())?;
            repo.set_setting("language", &settings.language)?;
            repo.set_setting("font_size", &settings.font_size.to_string())?;
            repo.set_setting("high_contrast", bool_str(settings.high_contrast))?;
            repo.set_setting("show_on_widget", bool_str(settings.show_on_widget))?;
        }
        tx.commit()?;
        Ok(())
    }
}

const fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{RefreshInterval, ThemeMode};

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_load_default_settings() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = repo.load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = Settings {
            theme: ThemeMode::Dark,
            refresh_interval: RefreshInterval::Daily,
            language: "pt-BR".to_string(),
            font_size: 22,
            high_contrast: true,
            show_on_widget: false,
        };

        repo.save(&settings).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_unreadable_values_fall_back_to_defaults() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.set_setting("theme", "sepia").unwrap();
        repo.set_setting("font_size", "huge").unwrap();
        repo.set_setting("language", "English").unwrap();
        repo.set_setting("high_contrast", "yes").unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.theme, ThemeMode::System);
        assert_eq!(loaded.font_size, 16);
        assert_eq!(loaded.language, "en");
        assert!(loaded.high_contrast);
    }

    #[test]
    fn test_out_of_range_font_size_falls_back_to_default() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.set_setting("font_size", "99").unwrap();
        let mut loaded = repo.load().unwrap();
        assert_eq!(loaded.font_size, 16);

        repo.set_setting("font_size", "9").unwrap();
        assert_eq!(repo.load().unwrap().font_size, 16);

        repo.set_setting("font_size", "32").unwrap();
        assert_eq!(repo.load().unwrap().font_size, 32);

        loaded.theme = ThemeMode::Dark;
        assert!(loaded.validate().is_ok());
        repo.save(&loaded).unwrap();
        assert_eq!(repo.load().unwrap().theme, ThemeMode::Dark);
    }
}
