//! Front-end configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All editor options from `libarabic_core::Config` (flattened via serde)
//! - Which storage backend holds the history log, and where
//!
//! # Example
//!
//! ```rust
//! use libarabic::{KeyboardConfig, StorageKind};
//!
//! let config = KeyboardConfig::from_toml_str("storage = \"memory\"").unwrap();
//! assert_eq!(config.storage, StorageKind::Memory);
//! assert_eq!(config.base().long_press_ms, 500);
//! ```

use libarabic_core::{Config, EditorSession, Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// History backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Lost when the process exits
    Memory,
    /// Persistent `redb` database file
    Redb,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Editor timings and history limits
    #[serde(flatten)]
    pub base: Config,

    pub storage: StorageKind,

    /// Database file; `~/.arabic-keyboard/history.redb` when unset
    pub db_path: Option<PathBuf>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            base: Config::default(),
            storage: StorageKind::Redb,
            db_path: None,
        }
    }
}

impl KeyboardConfig {
    /// Load from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert into the base config for use with `EditorSession::with_config`
    pub fn into_base(self) -> Config {
        self.base
    }

    pub fn base(&self) -> &Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Config {
        &mut self.base
    }

    /// Database location, falling back to the per-user default.
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => path.clone(),
            None => default_db_path(),
        }
    }

    /// Open the configured backend.
    pub fn open_storage(&self) -> Result<Storage, StorageError> {
        match self.storage {
            StorageKind::Memory => Ok(Storage::new_in_memory()),
            StorageKind::Redb => {
                let path = self.resolved_db_path();
                debug!(path = %path.display(), "opening history database");
                Ok(Storage::new_redb(&path)?)
            }
        }
    }

    /// Editing session over the configured backend.
    pub fn open_session(&self) -> Result<EditorSession<Storage>, StorageError> {
        let storage = self.open_storage()?;
        Ok(EditorSession::with_config(storage, &self.base))
    }
}

/// `~/.arabic-keyboard/history.redb`, or the working directory when no home
/// directory is set.
pub fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".arabic-keyboard")
        .join("history.redb")
}
