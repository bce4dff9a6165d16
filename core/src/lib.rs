//! libarabic-core
//!
//! Core model for a virtual Arabic keyboard and text editor: long-press
//! variant table, Latin-to-Arabic transliteration, edit buffer, key
//! interaction state machine, debounced autosave into a deduplicated
//! history log, and the host interfaces for clipboard, export and search.
//!
//! Public API:
//! - `VariantTable` - Base key → ordered long-press variants
//! - `Transliterator` - Phonetic Latin → Arabic conversion
//! - `InteractionMachine` - Tap / long-press / picker state machine
//! - `EditBuffer` - Text plus selection, character offsets
//! - `HistoryStore` - Bounded, near-duplicate-free saved-text log
//! - `EditorSession` - All of the above driven as one editing session
//! - `Config` - Timings and history limits
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod variants;
pub use variants::VariantTable;

pub mod translit;
pub use translit::{transliterate, Transliterator};

pub mod similarity;
pub use similarity::{edit_distance, similarity, DuplicatePolicy};

pub mod storage;
pub use storage::{KeyValueStore, MemoryStore, RedbStore, Storage, StorageError};

pub mod history;
pub use history::{HistoryConfig, HistoryEntry, HistoryStore, SaveOutcome, HISTORY_KEY};

pub mod edit_buffer;
pub use edit_buffer::EditBuffer;

pub mod interaction;
pub use interaction::{Anchor, Interaction, InteractionMachine, Key, PressState, VariantPopover};

pub mod debounce;
pub use debounce::Debouncer;

pub mod host;
pub use host::{
    search_url, Clipboard, ClipboardError, CopyOutcome, ExportArtifact, SearchKind,
    SelectionCopy, UrlOpener,
};

pub mod layout;
pub use layout::KEYBOARD_ROWS;

pub mod context;
pub use context::{EditorContext, Notice};

pub mod session;
pub use session::{EditorSession, TickOutcome};

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Hold time before the variant picker opens (ms)
    pub long_press_ms: u64,

    /// Quiet period after the last edit before an autosave (ms)
    pub autosave_ms: u64,

    /// Start sessions with Latin-to-Arabic conversion of typed text
    pub auto_convert: bool,

    /// History log limits and duplicate thresholds
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            autosave_ms: 3000,
            auto_convert: false,
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn long_press_threshold(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_ms)
    }

    pub fn toggle_auto_convert(&mut self) {
        self.auto_convert = !self.auto_convert;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            "auto_convert = true\n\n[history]\nmax_entries = 10\n",
        )
        .unwrap();
        assert!(config.auto_convert);
        assert_eq!(config.long_press_threshold(), Duration::from_millis(500));
        assert_eq!(config.autosave_delay(), Duration::from_secs(3));
        assert_eq!(config.history.max_entries, 10);
        assert_eq!(config.history.recent_window, 3);
        assert_eq!(config.history.storage_key, HISTORY_KEY);
    }

    #[test]
    fn toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyboard.toml");
        let mut config = Config::default();
        config.toggle_auto_convert();
        config.history.min_similarity = 0.9;
        config.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), config);
    }
}
