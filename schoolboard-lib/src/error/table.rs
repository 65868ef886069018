//! Table engine error types

/// Errors raised by the table engine for invalid column references.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// No column with this id exists.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The column exists but cannot be sorted.
    #[error("Column is not sortable: {0}")]
    NotSortable(String),
}
