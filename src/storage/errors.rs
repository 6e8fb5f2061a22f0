//! # Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Table was never defined
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table defined twice
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Insert names a column the table does not have
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Row width differs from the column list
    #[error("Row {row} of insert into '{table}' has {actual} values, expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Lock poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    Poisoned,
}
