//! SQLite storage with in-memory cache.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use dashmap::DashMap;

use super::LocalStorage;
use crate::error::StorageError;

/// SQLite-backed storage with a DashMap read cache.
///
/// Survives process restarts, which makes it the backend for a stored login.
pub struct SqliteStorage {
    client: Client,
    cache: DashMap<String, String>,
}

impl SqliteStorage {
    /// Open (or create) the storage database at the given path.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let client = async_sqlite::ClientBuilder::new()
            .path(path)
            .open()
            .await?;

        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS storage (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("cached_keys", &self.cache.len())
            .finish()
    }
}

#[async_trait]
impl LocalStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let key_owned = key.to_string();
        let result = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM storage WHERE key = ?")?;
                let mut rows = stmt.query([&key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key_owned = key.to_string();
        let value_owned = value.to_string();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO storage (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [&key_owned, &value_owned],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM storage WHERE key = ?", [&key_owned]))
            .await?;

        self.cache.remove(key);

        Ok(())
    }
}
