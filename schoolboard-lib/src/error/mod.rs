//! Error types

mod api;
mod fetch;
mod storage;
mod table;

pub use api::*;
pub use fetch::*;
pub use storage::*;
pub use table::*;

/// Top-level error for library operations.
///
/// The fetch lifecycle never returns this; its failures are recorded in
/// [`FetchError`] on the lifecycle itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Table engine error.
    #[error(transparent)]
    Table(#[from] TableError),
}
