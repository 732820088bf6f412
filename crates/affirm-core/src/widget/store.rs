//! Shared key-value areas read by native widget extensions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// String key-value area shared with a widget extension
pub trait SharedStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value (visible to readers after [`flush`](Self::flush))
    fn put(&mut self, key: &str, value: String);

    /// Remove a value
    fn remove(&mut self, key: &str);

    /// Persist pending writes
    fn flush(&mut self) -> Result<()>;
}

/// In-process store, mainly for tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    flushes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed flushes
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl SharedStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// widget process never reads a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file doesn't exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|error| {
                Error::WidgetStorage(format!(
                    "Failed to parse widget store at {}: {error}",
                    path.display()
                ))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SharedStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.path)?;
        tracing::debug!("Flushed widget store to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_put_get_remove() {
        let mut store = MemoryStore::new();
        store.put("key", "value".to_string());
        assert_eq!(store.get("key").as_deref(), Some("value"));

        store.remove("key");
        assert_eq!(store.get("key"), None);

        store.flush().unwrap();
        assert_eq!(store.flush_count(), 1);
    }

    #[test]
    fn test_json_file_store_missing_file_is_empty() {
        let tmp = tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path().join("widget.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_json_file_store_persists_after_flush() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("shared").join("widget.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.put("affirmation_text", "I am steady".to_string());
        store.flush().unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("affirmation_text").as_deref(),
            Some("I am steady")
        );
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("widget.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(Error::WidgetStorage(_))));
    }
}
