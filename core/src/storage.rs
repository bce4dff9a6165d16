//! Key-value storage backends for persisted editor state.
//!
//! The history store only needs three operations on string keys and values,
//! captured by [`KeyValueStore`]. Two backends are provided:
//! - [`MemoryStore`]: in-process map with an optional byte quota, used by
//!   tests and throwaway sessions.
//! - [`RedbStore`]: persistent, ACID storage using `redb`.
//!
//! [`Storage`] switches between them at runtime.
use redb::{Database, TableDefinition, TableError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// A value could not be encoded for storage.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database backend failed.
    #[error("database error: {0}")]
    Backend(#[from] redb::Error),

    /// An in-memory lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Minimal string key-value storage, modeled on browser local storage.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Thread-safe in-memory store.
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect or corrupt what a history store wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once keys plus values exceed
    /// `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            inner: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        match self.inner.read() {
            Ok(map) => map.iter().map(|(k, v)| k.len() + v.len()).sum(),
            Err(_) => 0,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        if let Some(quota) = self.quota {
            let others: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}

/// `redb`-backed persistent store.
///
/// Every write runs in its own write transaction, so a value is either fully
/// committed or not at all.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Single table of string keys to string values.
    const TABLE_DEF: TableDefinition<'static, &'static str, &'static str> =
        TableDefinition::new("kv");

    /// Create or open a database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, redb::Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let db = Database::create(path)?;
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(Self::TABLE_DEF) {
            Ok(table) => table,
            // Nothing has been written yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = table.get(key)?.map(|v| v.value().to_string());
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.write(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Ok(self.delete(key)?)
    }
}

/// Runtime switch between storage backends.
#[derive(Debug)]
pub enum Storage {
    InMemory(MemoryStore),
    Redb(RedbStore),
}

impl Storage {
    /// Construct an unbounded in-memory store.
    pub fn new_in_memory() -> Self {
        Storage::InMemory(MemoryStore::new())
    }

    /// Construct a `redb`-backed store at `path`.
    pub fn new_redb<P: AsRef<Path>>(path: P) -> Result<Self, redb::Error> {
        Ok(Storage::Redb(RedbStore::open(path)?))
    }

    /// Short backend name for diagnostics.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Storage::InMemory(_) => "memory",
            Storage::Redb(_) => "redb",
        }
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Storage::InMemory(m) => m.get(key),
            Storage::Redb(r) => r.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Storage::InMemory(m) => m.set(key, value),
            Storage::Redb(r) => r.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Storage::InMemory(m) => m.remove(key),
            Storage::Redb(r) => r.remove(key),
        }
    }
}
