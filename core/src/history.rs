//! Saved-text history with near-duplicate suppression.
//!
//! The log is a newest-first list of [`HistoryEntry`] serialized as one JSON
//! array under a single storage key. It is bounded (50 entries by default)
//! and never holds two entries with the same text.
//!
//! Failure policy: nothing here returns an error to the caller. Unreadable or
//! corrupt storage reads as an empty log, and a failed write abandons the
//! save while leaving the editing session untouched. Both are logged.

use crate::similarity::DuplicatePolicy;
use crate::storage::{KeyValueStore, StorageError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Storage key the log lives under.
pub const HISTORY_KEY: &str = "arabic-keyboard-history";

/// Marker appended to truncated previews.
const ELLIPSIS: &str = "...";

/// History tuning. The similarity thresholds are empirical and kept
/// configurable rather than fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Storage key holding the serialized log
    pub storage_key: String,
    /// Maximum entries kept; older ones are dropped
    pub max_entries: usize,
    /// Characters of text shown in a preview
    pub preview_chars: usize,
    /// How many of the newest entries are checked for near-duplicates
    pub recent_window: usize,
    /// Length difference ratio below which content is compared
    pub max_length_diff_ratio: f64,
    /// Similarity above which a save is skipped
    pub min_similarity: f64,
    /// Texts this long or longer are only checked for exact matches
    pub max_compare_length: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let policy = DuplicatePolicy::default();
        Self {
            storage_key: HISTORY_KEY.to_string(),
            max_entries: 50,
            preview_chars: 50,
            recent_window: 3,
            max_length_diff_ratio: policy.max_length_diff_ratio,
            min_similarity: policy.min_similarity,
            max_compare_length: policy.max_compare_length,
        }
    }
}

impl HistoryConfig {
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy {
            max_length_diff_ratio: self.max_length_diff_ratio,
            min_similarity: self.min_similarity,
            max_compare_length: self.max_compare_length,
        }
    }
}

/// One saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub preview: String,
}

impl HistoryEntry {
    /// Build an entry with a fresh random id.
    pub fn new(text: impl Into<String>, saved_at: DateTime<Utc>, preview_chars: usize) -> Self {
        let text = text.into();
        let preview = make_preview(&text, preview_chars);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            timestamp: saved_at.timestamp_millis(),
            preview,
        }
    }

    /// Save instant, if the stored timestamp is in range.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Short human description of the entry's age relative to `now`.
    pub fn relative_age(&self, now: DateTime<Utc>) -> String {
        let minutes = (now.timestamp_millis() - self.timestamp).max(0) / 60_000;
        if minutes < 1 {
            return "Just now".to_string();
        }
        if minutes < 60 {
            return format!("{}m ago", minutes);
        }
        let hours = minutes / 60;
        if hours < 24 {
            return format!("{}h ago", hours);
        }
        let days = hours / 24;
        if days < 7 {
            return format!("{}d ago", days);
        }
        match self.saved_at() {
            Some(at) => at.format("%Y-%m-%d").to_string(),
            None => format!("{}d ago", days),
        }
    }
}

fn make_preview(text: &str, preview_chars: usize) -> String {
    let mut chars = text.chars();
    let mut preview: String = chars.by_ref().take(preview_chars).collect();
    if chars.next().is_some() {
        preview.push_str(ELLIPSIS);
    }
    preview
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new entry was written
    Saved(HistoryEntry),
    /// Text was empty after trimming
    Blank,
    /// Text matched or closely resembled a recent entry
    Duplicate,
    /// The write failed; the log is unchanged
    StorageFailed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// History log persisted through a [`KeyValueStore`].
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
    config: HistoryConfig,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Create a store with default limits.
    pub fn new(store: S) -> Self {
        Self::with_config(store, HistoryConfig::default())
    }

    pub fn with_config(store: S, config: HistoryConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Underlying storage backend.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Save `text` as a new entry stamped with the current time.
    pub fn save(&self, text: &str) -> SaveOutcome {
        self.save_at(text, Utc::now())
    }

    /// Save `text` as a new entry stamped with `saved_at`.
    pub fn save_at(&self, text: &str, saved_at: DateTime<Utc>) -> SaveOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SaveOutcome::Blank;
        }

        let history = self.list();
        let policy = self.config.duplicate_policy();
        let recent = history.iter().take(self.config.recent_window);
        for entry in recent {
            if policy.is_near_duplicate(trimmed, &entry.text) {
                debug!(existing = %entry.id, "skipping history save: near-duplicate");
                return SaveOutcome::Duplicate;
            }
        }

        let entry = HistoryEntry::new(trimmed, saved_at, self.config.preview_chars);
        let mut updated = Vec::with_capacity(history.len() + 1);
        updated.push(entry.clone());
        updated.extend(history.into_iter().filter(|e| e.text != trimmed));
        updated.truncate(self.config.max_entries);

        match self.persist(&updated) {
            Ok(()) => {
                debug!(id = %entry.id, entries = updated.len(), "saved history entry");
                SaveOutcome::Saved(entry)
            }
            Err(e) => {
                warn!(error = %e, "failed to persist history; save abandoned");
                SaveOutcome::StorageFailed
            }
        }
    }

    /// All entries, newest first. Empty when storage is empty or unreadable.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read history; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "corrupt history log; treating as empty");
                Vec::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    /// Full text of the entry with `id`.
    pub fn load(&self, id: &str) -> Option<String> {
        self.get(id).map(|e| e.text)
    }

    /// Remove the entry with `id`. Returns whether an entry was removed;
    /// unknown ids are a no-op.
    pub fn delete(&self, id: &str) -> bool {
        let history = self.list();
        let before = history.len();
        let remaining: Vec<_> = history.into_iter().filter(|e| e.id != id).collect();
        if remaining.len() == before {
            return false;
        }

        if let Err(e) = self.persist(&remaining) {
            warn!(error = %e, id, "failed to persist history after delete");
            return false;
        }
        true
    }

    /// Drop the whole log. Asking the user first is up to the caller.
    pub fn clear_all(&self) {
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            warn!(error = %e, "failed to clear history");
        }
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)?;
        self.store.set(&self.config.storage_key, &json)
    }
}
