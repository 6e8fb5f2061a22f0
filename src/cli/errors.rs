//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http_server::ServerError;
use crate::schema::SchemaError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload failed validation with this many messages
    #[error("Payload is invalid ({0} errors)")]
    Invalid(usize),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "OMS_CLI_CONFIG_ERROR",
            CliError::Schema(_) => "OMS_CLI_SCHEMA_ERROR",
            CliError::Server(_) => "OMS_CLI_SERVER_ERROR",
            CliError::Io(_) | CliError::Json(_) => "OMS_CLI_IO_ERROR",
            CliError::Invalid(_) => "OMS_CLI_INVALID_PAYLOAD",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
