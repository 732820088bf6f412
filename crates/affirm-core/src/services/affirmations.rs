//! Affirmation use cases shared by every front end.

use std::path::Path;

use crate::db::{
    AffirmationRepository, Database, PresentationStateRepository, SettingsRepository,
    SqliteAffirmationRepository, SqlitePresentationStateRepository, SqliteSettingsRepository,
};
use crate::error::{Error, Result};
use crate::models::{validate_affirmation_text, Affirmation, AffirmationId, Settings};
use crate::selector::{RandomSelector, RandomSource};
use crate::widget::{SharedStore, WidgetBridge, WidgetSnapshot};

/// How many prefix matches are reported when an id prefix is ambiguous
const AMBIGUOUS_MATCH_PREVIEW: usize = 3;

/// What a widget sync did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetUpdate {
    /// A snapshot was written; carries the new reload generation
    Published(u64),
    /// The widget was cleared; carries the new reload generation
    Cleared(u64),
}

/// Owns the database handle and exposes affirmation use cases.
pub struct AffirmationService {
    db: Database,
}

impl AffirmationService {
    /// Wrap an already-open database
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open (creating if needed) the database at `db_path`
    pub fn open_path(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(db_path)?))
    }

    /// Open an in-memory service (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Close the underlying database
    pub fn close(self) -> Result<()> {
        self.db.close()
    }

    fn affirmations(&self) -> SqliteAffirmationRepository<'_> {
        SqliteAffirmationRepository::new(self.db.connection())
    }

    fn presentation_state(&self) -> SqlitePresentationStateRepository<'_> {
        SqlitePresentationStateRepository::new(self.db.connection())
    }

    fn settings(&self) -> SqliteSettingsRepository<'_> {
        SqliteSettingsRepository::new(self.db.connection())
    }

    /// Validate and store a new affirmation.
    pub fn create_affirmation(&self, text: &str) -> Result<Affirmation> {
        let text = validate_affirmation_text(text)?;
        self.affirmations().create(&text)
    }

    /// Fetch an affirmation by id.
    pub fn get_affirmation(&self, id: &AffirmationId) -> Result<Option<Affirmation>> {
        self.affirmations().get(id)
    }

    /// List affirmations newest-first.
    pub fn list_affirmations(
        &self,
        limit: usize,
        offset: usize,
        include_inactive: bool,
    ) -> Result<Vec<Affirmation>> {
        self.affirmations().list(limit, offset, include_inactive)
    }

    /// Every affirmation, active or not, newest-first.
    pub fn list_all_affirmations(&self) -> Result<Vec<Affirmation>> {
        const PAGE_SIZE: usize = 500;

        let repo = self.affirmations();
        let mut affirmations = Vec::new();
        let mut offset = 0usize;

        loop {
            let batch = repo.list(PAGE_SIZE, offset, true)?;
            let count = batch.len();
            affirmations.extend(batch);

            if count < PAGE_SIZE {
                break;
            }
            offset += count;
        }

        Ok(affirmations)
    }

    /// Number of affirmations that take part in selection.
    pub fn count_active(&self) -> Result<usize> {
        self.affirmations().count(false)
    }

    /// Validate and replace an affirmation's text.
    pub fn update_affirmation(&self, id: &AffirmationId, text: &str) -> Result<Affirmation> {
        let text = validate_affirmation_text(text)?;
        self.affirmations().update_text(id, &text)
    }

    /// Include or exclude an affirmation from random selection.
    pub fn set_affirmation_active(
        &self,
        id: &AffirmationId,
        is_active: bool,
    ) -> Result<Affirmation> {
        self.affirmations().set_active(id, is_active)
    }

    /// Delete an affirmation, forgetting it as "last shown" if it was.
    pub fn delete_affirmation(&self, id: &AffirmationId) -> Result<()> {
        self.affirmations().delete(id)?;

        let state = self.presentation_state();
        if state.last_shown_id()?.as_ref() == Some(id) {
            state.set_last_shown_id(None)?;
        }
        Ok(())
    }

    /// Find an affirmation by full id or unique id prefix.
    pub fn resolve_affirmation(&self, query: &str) -> Result<Affirmation> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("affirmation id cannot be empty".into()));
        }

        if let Ok(id) = query.parse::<AffirmationId>() {
            if let Some(affirmation) = self.get_affirmation(&id)? {
                return Ok(affirmation);
            }
        }

        let matching_ids = self
            .affirmations()
            .list_ids_by_prefix(query, AMBIGUOUS_MATCH_PREVIEW)?;

        match matching_ids.as_slice() {
            [] => Err(Error::NotFound(query.to_string())),
            [only] => {
                let id = only
                    .parse::<AffirmationId>()
                    .map_err(|_| Error::NotFound(query.to_string()))?;
                self.get_affirmation(&id)?
                    .ok_or_else(|| Error::NotFound(query.to_string()))
            }
            many => {
                let options = many
                    .iter()
                    .map(|id| id.chars().take(13).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::Ambiguous(format!(
                    "ID prefix '{query}' is ambiguous; matches: {options}"
                )))
            }
        }
    }

    /// Load settings, falling back to defaults for anything unset.
    pub fn load_settings(&self) -> Result<Settings> {
        self.settings().load()
    }

    /// Validate and persist settings.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        self.settings().save(settings)
    }

    /// The id remembered from the previous refresh, if any.
    pub fn last_shown_id(&self) -> Result<Option<AffirmationId>> {
        self.presentation_state().last_shown_id()
    }

    /// Run one display refresh: pick an active affirmation other than the
    /// previous one and remember the pick for next time.
    ///
    /// Returns `None` when there are no active affirmations.
    pub fn next_affirmation<R: RandomSource>(
        &self,
        selector: &mut RandomSelector<R>,
    ) -> Result<Option<Affirmation>> {
        let candidates = self.affirmations().list_active()?;
        let state = self.presentation_state();
        let last_shown = state.last_shown_id()?;

        let selected = selector
            .select_next_affirmation(&candidates, last_shown.as_ref())
            .cloned();

        state.set_last_shown_id(selected.as_ref().map(|affirmation| &affirmation.id))?;

        match &selected {
            Some(affirmation) => tracing::debug!(
                candidates = candidates.len(),
                "Selected affirmation {}",
                affirmation.id
            ),
            None => tracing::debug!("No active affirmations to select"),
        }

        Ok(selected)
    }

    /// Push `affirmation` to the widget, or clear the widget when there is
    /// nothing to show or the widget is turned off in settings.
    pub fn sync_widget<S: SharedStore>(
        &self,
        bridge: &mut WidgetBridge<S>,
        affirmation: Option<&Affirmation>,
        now_ms: i64,
    ) -> Result<WidgetUpdate> {
        let settings = self.load_settings()?;

        match affirmation {
            Some(affirmation) if settings.show_on_widget => {
                let snapshot = WidgetSnapshot::new(affirmation, &settings, now_ms);
                bridge.publish(&snapshot).map(WidgetUpdate::Published)
            }
            _ => bridge.clear().map(WidgetUpdate::Cleared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RefreshInterval, ThemeMode};
    use crate::widget::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn service() -> AffirmationService {
        AffirmationService::open_in_memory().unwrap()
    }

    fn selector() -> RandomSelector<ChaCha8Rng> {
        RandomSelector::new(ChaCha8Rng::seed_from_u64(11))
    }

    #[test]
    fn create_rejects_blank_text() {
        let service = service();
        assert!(matches!(
            service.create_affirmation("   "),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(service.count_active().unwrap(), 0);
    }

    #[test]
    fn create_trims_text() {
        let service = service();
        let affirmation = service.create_affirmation("  I am capable \n").unwrap();
        assert_eq!(affirmation.text, "I am capable");
    }

    #[test]
    fn update_validates_text() {
        let service = service();
        let affirmation = service.create_affirmation("Before").unwrap();
        assert!(service.update_affirmation(&affirmation.id, "").is_err());

        let updated = service.update_affirmation(&affirmation.id, " After ").unwrap();
        assert_eq!(updated.text, "After");
    }

    #[test]
    fn next_affirmation_on_empty_store_is_none() {
        let service = service();
        let mut selector = selector();

        assert_eq!(service.next_affirmation(&mut selector).unwrap(), None);
        assert_eq!(service.last_shown_id().unwrap(), None);
    }

    #[test]
    fn next_affirmation_never_repeats_back_to_back() {
        let service = service();
        for text in ["I am calm", "I am strong", "I am kind"] {
            service.create_affirmation(text).unwrap();
        }

        let mut selector = selector();
        let mut previous = service.next_affirmation(&mut selector).unwrap().unwrap();
        for _ in 0..30 {
            let next = service.next_affirmation(&mut selector).unwrap().unwrap();
            assert_ne!(next.id, previous.id);
            assert_eq!(service.last_shown_id().unwrap(), Some(next.id));
            previous = next;
        }
    }

    #[test]
    fn single_affirmation_repeats() {
        let service = service();
        let only = service.create_affirmation("I am here").unwrap();
        let mut selector = selector();

        for _ in 0..3 {
            let next = service.next_affirmation(&mut selector).unwrap().unwrap();
            assert_eq!(next.id, only.id);
        }
    }

    #[test]
    fn inactive_affirmations_are_never_selected() {
        let service = service();
        let active = service.create_affirmation("Shown").unwrap();
        let paused = service.create_affirmation("Hidden").unwrap();
        service.set_affirmation_active(&paused.id, false).unwrap();

        let mut selector = selector();
        for _ in 0..10 {
            let next = service.next_affirmation(&mut selector).unwrap().unwrap();
            assert_eq!(next.id, active.id);
        }
    }

    #[test]
    fn selection_clears_last_shown_when_everything_is_paused() {
        let service = service();
        let affirmation = service.create_affirmation("Soon paused").unwrap();
        let mut selector = selector();
        service.next_affirmation(&mut selector).unwrap();

        service.set_affirmation_active(&affirmation.id, false).unwrap();
        assert_eq!(service.next_affirmation(&mut selector).unwrap(), None);
        assert_eq!(service.last_shown_id().unwrap(), None);
    }

    #[test]
    fn delete_forgets_last_shown() {
        let service = service();
        let affirmation = service.create_affirmation("Short lived").unwrap();
        let mut selector = selector();
        service.next_affirmation(&mut selector).unwrap();
        assert_eq!(service.last_shown_id().unwrap(), Some(affirmation.id));

        service.delete_affirmation(&affirmation.id).unwrap();
        assert_eq!(service.last_shown_id().unwrap(), None);
    }

    #[test]
    fn resolve_by_full_id_and_prefix() {
        let service = service();
        let affirmation = service.create_affirmation("Find me").unwrap();
        let id = affirmation.id.to_string();

        assert_eq!(service.resolve_affirmation(&id).unwrap().id, affirmation.id);
        assert_eq!(
            service.resolve_affirmation(&id[..13]).unwrap().id,
            affirmation.id
        );
        assert_eq!(
            service
                .resolve_affirmation(&id[..13].to_ascii_uppercase())
                .unwrap()
                .id,
            affirmation.id
        );
    }

    #[test]
    fn resolve_reports_missing_empty_and_ambiguous() {
        let service = service();
        let repo = service.affirmations();
        for (id, text) in [
            ("11111111-1111-7111-8111-111111111111", "A"),
            ("11111111-1111-7111-8111-222222222222", "B"),
        ] {
            repo.insert(&Affirmation {
                id: id.parse().unwrap(),
                text: text.to_string(),
                is_active: true,
                created_at: 1,
                updated_at: 1,
            })
            .unwrap();
        }

        assert!(matches!(
            service.resolve_affirmation("  "),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            service.resolve_affirmation("ffff"),
            Err(Error::NotFound(_))
        ));
        match service.resolve_affirmation("1111") {
            Err(Error::Ambiguous(message)) => assert!(message.contains("11111111-1111")),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn save_settings_validates() {
        let service = service();
        let bad = Settings {
            language: "english".to_string(),
            ..Settings::default()
        };
        assert!(service.save_settings(&bad).is_err());

        let good = Settings {
            theme: ThemeMode::Light,
            refresh_interval: RefreshInterval::EverySixHours,
            ..Settings::default()
        };
        service.save_settings(&good).unwrap();
        assert_eq!(service.load_settings().unwrap(), good);
    }

    #[test]
    fn sync_widget_publishes_and_clears() {
        let service = service();
        let affirmation = service.create_affirmation("I shine").unwrap();
        let mut bridge = WidgetBridge::new(MemoryStore::new());

        let update = service
            .sync_widget(&mut bridge, Some(&affirmation), 5_000)
            .unwrap();
        assert_eq!(update, WidgetUpdate::Published(1));
        let snapshot = bridge.current().unwrap().unwrap();
        assert_eq!(snapshot.text, "I shine");
        assert_eq!(snapshot.next_refresh_at, 5_000 + 60 * 60_000);

        let update = service.sync_widget(&mut bridge, None, 6_000).unwrap();
        assert_eq!(update, WidgetUpdate::Cleared(2));
        assert!(bridge.current().unwrap().is_none());
    }

    #[test]
    fn sync_widget_respects_disabled_widget() {
        let service = service();
        service
            .save_settings(&Settings {
                show_on_widget: false,
                ..Settings::default()
            })
            .unwrap();
        let affirmation = service.create_affirmation("Private").unwrap();
        let mut bridge = WidgetBridge::new(MemoryStore::new());

        let update = service
            .sync_widget(&mut bridge, Some(&affirmation), 0)
            .unwrap();
        assert_eq!(update, WidgetUpdate::Cleared(1));
    }
}
