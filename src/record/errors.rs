//! Avro record codec errors

use thiserror::Error;

/// Result type for record encoding and decoding
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised while converting records to or from Avro containers
#[derive(Debug, Error)]
pub enum RecordError {
    /// apache-avro rejected the schema, the container or a value
    #[error("Avro error: {0}")]
    Avro(#[from] apache_avro::Error),

    /// A JSON value cannot be represented under the declared type
    #[error("Cannot encode field '{field}': {reason}")]
    Unencodable { field: String, reason: String },

    /// The container holds something other than records
    #[error("Expected an Avro record, found {0}")]
    NotARecord(String),

    /// The Avro value has no JSON representation here
    #[error("Unsupported Avro value: {0}")]
    Unsupported(String),
}

impl RecordError {
    pub(crate) fn unencodable(field: &str, reason: impl Into<String>) -> Self {
        Self::Unencodable {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
