//! Local storage error types

/// Errors that can occur while reading or writing local storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// SQLite backend failure.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// A stored value could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
