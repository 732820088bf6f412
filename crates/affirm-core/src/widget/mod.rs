//! Home-screen widget bridge
//!
//! The app and its widget extension run in separate processes. The app
//! writes the current affirmation into a [`SharedStore`] and bumps a reload
//! generation; the extension redraws whenever the generation changes.

mod store;

pub use store::{JsonFileStore, MemoryStore, SharedStore};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Affirmation, Settings, ThemeMode};

pub const AFFIRMATION_ID_KEY: &str = "affirmation_id";
pub const AFFIRMATION_TEXT_KEY: &str = "affirmation_text";
pub const SNAPSHOT_KEY: &str = "widget_snapshot";
pub const GENERATION_KEY: &str = "reload_generation";

/// Everything the widget needs to render without opening the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub affirmation_id: String,
    pub text: String,
    pub theme: ThemeMode,
    pub font_size: u32,
    pub high_contrast: bool,
    /// When this snapshot was published (Unix ms)
    pub updated_at: i64,
    /// When the widget should ask for a new affirmation (Unix ms)
    pub next_refresh_at: i64,
}

impl WidgetSnapshot {
    #[must_use]
    pub fn new(affirmation: &Affirmation, settings: &Settings, now_ms: i64) -> Self {
        Self {
            affirmation_id: affirmation.id.to_string(),
            text: affirmation.text.clone(),
            theme: settings.theme,
            font_size: settings.font_size,
            high_contrast: settings.high_contrast,
            updated_at: now_ms,
            next_refresh_at: now_ms.saturating_add(settings.refresh_interval.as_millis()),
        }
    }

    /// Same affirmation and publish time, presented with `settings`
    #[must_use]
    pub fn restyled(&self, settings: &Settings) -> Self {
        Self {
            affirmation_id: self.affirmation_id.clone(),
            text: self.text.clone(),
            theme: settings.theme,
            font_size: settings.font_size,
            high_contrast: settings.high_contrast,
            updated_at: self.updated_at,
            next_refresh_at: self
                .updated_at
                .saturating_add(settings.refresh_interval.as_millis()),
        }
    }
}

/// Publishes affirmations to a widget through a shared store
#[derive(Debug)]
pub struct WidgetBridge<S> {
    store: S,
}

impl<S: SharedStore> WidgetBridge<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write the snapshot and request a redraw; returns the new generation
    pub fn publish(&mut self, snapshot: &WidgetSnapshot) -> Result<u64> {
        self.store.put(AFFIRMATION_ID_KEY, snapshot.affirmation_id.clone());
        self.store.put(AFFIRMATION_TEXT_KEY, snapshot.text.clone());
        self.store.put(SNAPSHOT_KEY, serde_json::to_string(snapshot)?);
        let generation = self.bump_generation();
        self.store.flush()?;

        tracing::debug!(
            generation,
            affirmation_id = %snapshot.affirmation_id,
            "Published widget snapshot"
        );
        Ok(generation)
    }

    /// Remove the affirmation so the widget shows its empty state
    pub fn clear(&mut self) -> Result<u64> {
        self.store.remove(AFFIRMATION_ID_KEY);
        self.store.remove(AFFIRMATION_TEXT_KEY);
        self.store.remove(SNAPSHOT_KEY);
        let generation = self.bump_generation();
        self.store.flush()?;

        tracing::debug!(generation, "Cleared widget snapshot");
        Ok(generation)
    }

    /// The snapshot currently visible to the widget
    pub fn current(&self) -> Result<Option<WidgetSnapshot>> {
        self.store
            .get(SNAPSHOT_KEY)
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Reload generation, zero before the first publish
    pub fn generation(&self) -> u64 {
        self.store
            .get(GENERATION_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }

    /// Whether the widget timeline wants a new affirmation at `now_ms`
    pub fn is_refresh_due(&self, now_ms: i64) -> Result<bool> {
        Ok(self
            .current()?
            .map_or(true, |snapshot| now_ms >= snapshot.next_refresh_at))
    }

    fn bump_generation(&mut self) -> u64 {
        let generation = self.generation().wrapping_add(1);
        self.store.put(GENERATION_KEY, generation.to_string());
        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RefreshInterval;
    use pretty_assertions::assert_eq;

    fn settings() -> Settings {
        Settings {
            theme: ThemeMode::Dark,
            refresh_interval: RefreshInterval::FifteenMinutes,
            font_size: 20,
            high_contrast: true,
            ..Settings::default()
        }
    }

    #[test]
    fn test_snapshot_schedules_next_refresh() {
        let affirmation = Affirmation::new("I am patient");
        let snapshot = WidgetSnapshot::new(&affirmation, &settings(), 1_000);

        assert_eq!(snapshot.affirmation_id, affirmation.id.to_string());
        assert_eq!(snapshot.text, "I am patient");
        assert_eq!(snapshot.theme, ThemeMode::Dark);
        assert_eq!(snapshot.next_refresh_at, 1_000 + 15 * 60_000);
    }

    #[test]
    fn test_restyled_keeps_affirmation_and_reschedules() {
        let affirmation = Affirmation::new("I am patient");
        let snapshot = WidgetSnapshot::new(&affirmation, &settings(), 1_000);

        let restyled = snapshot.restyled(&Settings {
            theme: ThemeMode::Light,
            refresh_interval: RefreshInterval::Daily,
            font_size: 12,
            high_contrast: false,
            ..Settings::default()
        });

        assert_eq!(restyled.affirmation_id, snapshot.affirmation_id);
        assert_eq!(restyled.text, "I am patient");
        assert_eq!(restyled.theme, ThemeMode::Light);
        assert_eq!(restyled.font_size, 12);
        assert!(!restyled.high_contrast);
        assert_eq!(restyled.updated_at, 1_000);
        assert_eq!(restyled.next_refresh_at, 1_000 + 24 * 60 * 60_000);
    }

    #[test]
    fn test_publish_writes_keys_and_bumps_generation() {
        let mut bridge = WidgetBridge::new(MemoryStore::new());
        let affirmation = Affirmation::new("I am patient");
        let snapshot = WidgetSnapshot::new(&affirmation, &settings(), 1_000);

        assert_eq!(bridge.generation(), 0);
        assert_eq!(bridge.publish(&snapshot).unwrap(), 1);

        let store = bridge.store();
        assert_eq!(
            store.get(AFFIRMATION_TEXT_KEY).as_deref(),
            Some("I am patient")
        );
        assert_eq!(
            store.get(AFFIRMATION_ID_KEY),
            Some(affirmation.id.to_string())
        );
        assert_eq!(store.flush_count(), 1);
        assert_eq!(bridge.current().unwrap(), Some(snapshot.clone()));

        assert_eq!(bridge.publish(&snapshot).unwrap(), 2);
    }

    #[test]
    fn test_clear_removes_snapshot_but_still_reloads() {
        let mut bridge = WidgetBridge::new(MemoryStore::new());
        let snapshot = WidgetSnapshot::new(&Affirmation::new("I rest"), &settings(), 0);
        bridge.publish(&snapshot).unwrap();

        assert_eq!(bridge.clear().unwrap(), 2);
        assert_eq!(bridge.current().unwrap(), None);
        assert_eq!(bridge.store().get(AFFIRMATION_TEXT_KEY), None);
    }

    #[test]
    fn test_refresh_due_follows_timeline() {
        let mut bridge = WidgetBridge::new(MemoryStore::new());
        assert!(bridge.is_refresh_due(0).unwrap());

        let snapshot = WidgetSnapshot::new(&Affirmation::new("I rest"), &settings(), 0);
        bridge.publish(&snapshot).unwrap();

        assert!(!bridge.is_refresh_due(snapshot.next_refresh_at - 1).unwrap());
        assert!(bridge.is_refresh_due(snapshot.next_refresh_at).unwrap());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let mut store = MemoryStore::new();
        store.put(SNAPSHOT_KEY, "{".to_string());
        let bridge = WidgetBridge::new(store);
        assert!(bridge.current().is_err());
    }
}
