//! String-keyed local storage
//!
//! A minimal key-value slot store, the native equivalent of a browser's
//! `localStorage`. The fetch lifecycle reads its credential record from
//! here and clears it on unauthorized responses.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend trait for local storage.
///
/// Values are opaque strings; callers serialize JSON themselves.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Get the value stored under a key.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value under a key, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
