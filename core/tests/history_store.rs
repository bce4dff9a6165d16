//! History store behavior against real backends: bounds, duplicate
//! suppression, corruption and storage failure.

use libarabic_core::{
    HistoryConfig, HistoryStore, KeyValueStore, MemoryStore, SaveOutcome, Storage, StorageError,
    HISTORY_KEY,
};

/// Distinct texts long enough that only the exact-match check applies.
fn long_text(i: usize) -> String {
    format!("{i:03} {}", "ب".repeat(120))
}

#[test]
fn test_history_keeps_newest_fifty() {
    let history = HistoryStore::new(MemoryStore::new());
    for i in 0..60 {
        assert!(history.save(&long_text(i)).is_saved(), "save {i}");
    }

    let entries = history.list();
    assert_eq!(entries.len(), 50);
    // Newest first: 59 down to 10
    assert_eq!(entries[0].text, long_text(59));
    assert_eq!(entries[49].text, long_text(10));
}

#[test]
fn test_exact_duplicate_of_recent_entry_is_skipped() {
    let history = HistoryStore::new(MemoryStore::new());
    assert!(history.save("مرحبا بالعالم").is_saved());
    assert_eq!(history.save("مرحبا بالعالم"), SaveOutcome::Duplicate);
    // Surrounding whitespace is trimmed before comparison
    assert_eq!(history.save("  مرحبا بالعالم \n"), SaveOutcome::Duplicate);
    assert_eq!(history.len(), 1);
}

#[test]
fn test_near_duplicate_is_skipped() {
    let history = HistoryStore::new(MemoryStore::new());
    let original = "abcdefghijklmnopqrst";
    let edited = "abcdefghijklmnopqrsX";
    assert!(history.save(original).is_saved());
    assert_eq!(history.save(edited), SaveOutcome::Duplicate);
    assert_eq!(history.len(), 1);
}

#[test]
fn test_sufficiently_different_text_is_saved() {
    let history = HistoryStore::new(MemoryStore::new());
    assert!(history.save("abcdefghijklmnopqrst").is_saved());
    // Length differs by more than 10%
    assert!(history.save("abcdefghijklmnopqrst and then some more").is_saved());
    assert_eq!(history.len(), 2);
}

#[test]
fn test_only_recent_window_is_checked_for_near_duplicates() {
    let history = HistoryStore::new(MemoryStore::new());
    assert!(history.save("abcdefghijklmnopqrst").is_saved());
    for i in 0..3 {
        assert!(history.save(&long_text(i)).is_saved());
    }
    // The near-identical entry is now fourth newest
    assert!(history.save("abcdefghijklmnopqrsX").is_saved());
    assert_eq!(history.len(), 5);
}

#[test]
fn test_corrupt_log_reads_as_empty() {
    let backend = MemoryStore::new();
    backend.set(HISTORY_KEY, "{not json").unwrap();

    let history = HistoryStore::new(backend.clone());
    assert!(history.list().is_empty());
    assert!(history.get("anything").is_none());

    // The next save starts a fresh log
    assert!(history.save("بداية جديدة").is_saved());
    assert_eq!(history.len(), 1);
}

#[test]
fn test_quota_failure_leaves_log_unchanged() {
    let backend = MemoryStore::with_quota(600);
    let history = HistoryStore::new(backend.clone());
    assert!(history.save("قصير").is_saved());
    let before = backend.get(HISTORY_KEY).unwrap();

    let outcome = history.save(&"ك".repeat(400));
    assert_eq!(outcome, SaveOutcome::StorageFailed);
    assert_eq!(backend.get(HISTORY_KEY).unwrap(), before);
    assert_eq!(history.len(), 1);
}

#[test]
fn test_delete_and_clear() {
    let history = HistoryStore::new(MemoryStore::new());
    let id = match history.save("الأول") {
        SaveOutcome::Saved(entry) => entry.id,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert!(history.save(&long_text(1)).is_saved());

    assert!(!history.delete("no-such-id"));
    assert_eq!(history.len(), 2);
    assert!(history.delete(&id));
    assert!(history.load(&id).is_none());
    assert_eq!(history.len(), 1);

    history.clear_all();
    assert!(history.is_empty());
}

#[test]
fn test_custom_limits() {
    let config = HistoryConfig {
        max_entries: 3,
        storage_key: "custom-key".to_string(),
        ..HistoryConfig::default()
    };
    let backend = MemoryStore::new();
    let history = HistoryStore::with_config(backend.clone(), config);
    for i in 0..5 {
        history.save(&long_text(i));
    }
    assert_eq!(history.len(), 3);
    assert!(backend.get("custom-key").unwrap().is_some());
    assert!(backend.get(HISTORY_KEY).unwrap().is_none());
}

#[test]
fn test_redb_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.redb");

    let saved_id = {
        let history = HistoryStore::new(Storage::new_redb(&path).unwrap());
        assert_eq!(history.backend().backend_name(), "redb");
        assert!(history.list().is_empty());
        match history.save("نص دائم") {
            SaveOutcome::Saved(entry) => entry.id,
            other => panic!("unexpected outcome: {other:?}"),
        }
    };

    let history = HistoryStore::new(Storage::new_redb(&path).unwrap());
    let entries = history.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, saved_id);
    assert_eq!(history.load(&saved_id).as_deref(), Some("نص دائم"));
}

/// Backend whose every call fails, like storage disabled by the host.
struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn set(&self, _key: &str, value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded { needed: value.len(), quota: 0 })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }
}

/// Readable backend that rejects writes.
struct ReadOnlyStore(MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }
}

#[test]
fn test_unreadable_storage_reads_as_empty() {
    let history = HistoryStore::new(UnavailableStore);
    assert!(history.list().is_empty());
    assert!(history.is_empty());
    assert_eq!(history.save("نص لن يحفظ"), SaveOutcome::StorageFailed);
    assert!(!history.delete("missing"));
    assert_eq!(history.load("missing"), None);
    history.clear_all();
    assert!(history.list().is_empty());
}

#[test]
fn test_rejected_writes_keep_existing_log() {
    let seeded = HistoryStore::new(MemoryStore::new());
    let entry = match seeded.save("مدخل قديم") {
        SaveOutcome::Saved(entry) => entry,
        other => panic!("expected save, got {other:?}"),
    };
    let raw = seeded.backend().get(HISTORY_KEY).unwrap().unwrap();

    let memory = MemoryStore::new();
    memory.set(HISTORY_KEY, &raw).unwrap();
    let history = HistoryStore::new(ReadOnlyStore(memory));

    assert_eq!(history.save("مدخل جديد مختلف تماما"), SaveOutcome::StorageFailed);
    assert!(!history.delete(&entry.id));
    history.clear_all();
    assert_eq!(history.load(&entry.id).as_deref(), Some("مدخل قديم"));
    assert_eq!(history.len(), 1);
}
