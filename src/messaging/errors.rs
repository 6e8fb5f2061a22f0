//! # Messaging Errors

use thiserror::Error;

use crate::record::RecordError;
use crate::storage::StorageError;

/// Result type for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Errors raised while handling or publishing events
#[derive(Debug, Error)]
pub enum MessagingError {
    /// Event data is not valid base64
    #[error("Invalid event data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Event data is not a readable Avro container
    #[error("Invalid Avro payload: {0}")]
    Record(#[from] RecordError),

    /// Decoded record failed schema validation
    #[error("Record failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// Writing the record failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Publishing to a topic failed
    #[error("Publish to '{topic}' failed: {reason}")]
    Publish { topic: String, reason: String },

    /// In-memory publisher state is unusable after a panic
    #[error("Publisher lock poisoned")]
    Poisoned,

    /// Push envelope could not be parsed
    #[error("Invalid push envelope: {0}")]
    Envelope(String),
}

impl MessagingError {
    /// Caller-facing messages for this error
    pub fn messages(&self) -> Vec<String> {
        match self {
            MessagingError::Invalid(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
