//! Persistent CLI configuration and path resolution.
//!
//! Each path resolves in order: command-line flag, environment variable,
//! config file, built-in default.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";
const APP_DIR_NAME: &str = "affirm";

pub const DB_PATH_ENV: &str = "AFFIRM_DB_PATH";
pub const WIDGET_PATH_ENV: &str = "AFFIRM_WIDGET_PATH";
pub const CONFIG_PATH_ENV: &str = "AFFIRM_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub widget_path: Option<PathBuf>,
}

/// Final paths a command works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub widget_path: PathBuf,
}

const fn default_config_version() -> u32 {
    1
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV).map_or_else(
        || app_dir(dirs::config_dir()).join(CONFIG_FILE_NAME),
        PathBuf::from,
    )
}

pub fn default_db_path() -> PathBuf {
    app_dir(dirs::data_dir()).join("affirm.db")
}

pub fn default_widget_path() -> PathBuf {
    app_dir(dirs::data_dir()).join("widget.json")
}

/// Pick the first usable path: flag, environment, config file, default
pub fn resolve_path(
    flag: Option<PathBuf>,
    env_value: Option<OsString>,
    configured: Option<&Path>,
    default: impl FnOnce() -> PathBuf,
) -> PathBuf {
    flag.filter(|path| !path.as_os_str().is_empty())
        .or_else(|| env_value.filter(|value| !value.is_empty()).map(PathBuf::from))
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(default)
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Resolve the database and widget paths for this invocation
    pub fn resolve_paths(
        &self,
        db_flag: Option<PathBuf>,
        widget_flag: Option<PathBuf>,
    ) -> AppPaths {
        AppPaths {
            db_path: resolve_path(
                db_flag,
                std::env::var_os(DB_PATH_ENV),
                self.db_path.as_deref(),
                default_db_path,
            ),
            widget_path: resolve_path(
                widget_flag,
                std::env::var_os(WIDGET_PATH_ENV),
                self.widget_path.as_deref(),
                default_widget_path,
            ),
        }
    }

    fn normalize(&mut self) {
        self.version = default_config_version();
        self.db_path = self
            .db_path
            .take()
            .filter(|path| !path.as_os_str().is_empty());
        self.widget_path = self
            .widget_path
            .take()
            .filter(|path| !path.as_os_str().is_empty());
    }
}
