//! Configuration loading and management
//!
//! Handles parsing of `tickit.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::filter::FilterMode;
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::notice::DEFAULT_NOTICE_TTL_MS;
use crate::storage::DEFAULT_STORAGE_KEY;

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "tickit.toml";

/// Fallback store directory when no platform data dir is available
pub const FALLBACK_STORE_DIR: &str = ".tickit";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where and how tasks are persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// List display defaults
    #[serde(default)]
    pub display: DisplayConfig,

    /// Feedback notices in the interactive view
    #[serde(default)]
    pub notices: NoticeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Store directory; platform data dir when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Key the task list is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// How long to wait for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Filter used when none is given
    #[serde(default)]
    pub default_filter: FilterMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoticeConfig {
    /// Notice lifetime in milliseconds
    #[serde(default = "default_notice_ttl_ms")]
    pub ttl_ms: u64,
}

fn default_notice_ttl_ms() -> u64 {
    DEFAULT_NOTICE_TTL_MS
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_notice_ttl_ms(),
        }
    }
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` (or the default location), falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Store directory: explicit override, then config, then platform default
    pub fn store_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.storage.dir.clone())
            .or_else(default_store_dir)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_STORE_DIR))
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        if self.notices.ttl_ms == 0 {
            return Err(Error::InvalidConfig(
                "notices.ttl_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(Error::InvalidConfig(format!(
                "storage.key '{key}' may only contain letters, digits, '-' and '_'"
            )));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "tickit")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

pub fn default_store_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
