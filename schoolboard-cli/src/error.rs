use std::path::PathBuf;

use schoolboard_lib::error::{FetchError, StorageError, TableError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Lib(#[from] schoolboard_lib::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Fetch(FetchError),

    #[error("{0}")]
    Usage(String),
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        Self::Lib(err.into())
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        Self::Lib(err.into())
    }
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
