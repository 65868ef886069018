//! In-memory storage using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::LocalStorage;
use crate::error::StorageError;

/// An in-memory storage backed by a concurrent hash map.
///
/// Data is lost when the process exits.
///
/// # Example
///
/// ```
/// use schoolboard_lib::storage::MemoryStorage;
///
/// let storage = MemoryStorage::new();
/// assert!(storage.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: DashMap<String, String>,
}

impl MemoryStorage {
    /// Creates a new empty storage.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key);
        Ok(())
    }
}
