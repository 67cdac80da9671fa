use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::catalog::{InMemoryCatalog, QuizCatalog};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("store unavailable")]
    Unavailable,

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value store local to the device.
///
/// Writes are durable once the returned future resolves. There is no locking:
/// two writers on the same key race and the last write wins.
#[async_trait]
pub trait LocalRecordStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::QuotaExceeded` when the store is full, or other storage errors.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List stored keys starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Simple in-memory store for testing and prototyping.
///
/// An optional quota caps the summed byte length of keys and values.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<Mutex<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
    unavailable: bool,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            quota_bytes: None,
            unavailable: false,
        }
    }

    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    /// A store whose every operation fails, as when local storage is disabled.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn used_bytes(records: &HashMap<String, String>) -> usize {
    records.iter().map(|(k, v)| k.len() + v.len()).sum()
}

#[async_trait]
impl LocalRecordStore for InMemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.guard()?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.guard()?;
        if let Some(quota) = self.quota_bytes {
            let replaced = guard.get(key).map_or(0, |old| key.len() + old.len());
            let after = used_bytes(&guard) - replaced + key.len() + value.len();
            if after > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.guard()?;
        guard.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let guard = self.guard()?;
        let mut keys: Vec<String> = guard
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Aggregates the record store and quiz catalog behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub records: Arc<dyn LocalRecordStore>,
    pub catalog: Arc<dyn QuizCatalog>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_catalog(InMemoryCatalog::new())
    }

    #[must_use]
    pub fn with_catalog(catalog: InMemoryCatalog) -> Self {
        let records: Arc<dyn LocalRecordStore> = Arc::new(InMemoryRecordStore::new());
        let catalog: Arc<dyn QuizCatalog> = Arc::new(catalog);
        Self { records, catalog }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let store = InMemoryRecordStore::new();
        store.set("quiz:1:state", "{}").await.unwrap();
        assert_eq!(store.get("quiz:1:state").await.unwrap().as_deref(), Some("{}"));

        store.delete("quiz:1:state").await.unwrap();
        assert_eq!(store.get("quiz:1:state").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryRecordStore::new();
        store.delete("quiz:1:result").await.unwrap();
        store.delete("quiz:1:result").await.unwrap();
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = InMemoryRecordStore::new();
        let other = store.clone();
        store.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn quota_rejects_oversized_writes_but_allows_replacement() {
        let store = InMemoryRecordStore::with_quota(10);
        store.set("ab", "123456").await.unwrap();
        let err = store.set("cd", "123").await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded));

        // replacing frees the old value first
        store.set("ab", "87654321").await.unwrap();
        assert_eq!(store.get("cd").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryRecordStore::unavailable();
        assert!(matches!(store.get("k").await, Err(StorageError::Unavailable)));
        assert!(matches!(store.set("k", "v").await, Err(StorageError::Unavailable)));
        assert!(matches!(store.delete("k").await, Err(StorageError::Unavailable)));
    }

    #[tokio::test]
    async fn prefix_listing_is_sorted() {
        let store = InMemoryRecordStore::new();
        store.set("quiz:2:state", "x").await.unwrap();
        store.set("quiz:1:result", "y").await.unwrap();
        store.set("theme", "dark").await.unwrap();
        let keys = store.keys_with_prefix("quiz:").await.unwrap();
        assert_eq!(keys, vec!["quiz:1:result", "quiz:2:state"]);
    }
}
