//! # Server Errors
//!
//! Failures while assembling or starting the server. Request-level failures
//! are [`crate::dispatch::HandlerError`]s instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::SchemaError;
use crate::storage::StorageError;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid listen address '{0}'")]
    Address(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
