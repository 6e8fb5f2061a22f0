//! Schema construction errors
//!
//! Every variant is fatal: schemas are built at startup and a malformed
//! declaration stops the process before any request is served.

use thiserror::Error;

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building or loading a record schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields share a name
    #[error("Duplicate field '{0}'")]
    DuplicateField(String),

    /// Field, record or namespace name is not a valid Avro name
    #[error("Invalid name '{0}'")]
    InvalidName(String),

    /// Primitive type name is not recognised
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// Type expression is structurally wrong
    #[error("Malformed type for '{field}': {reason}")]
    MalformedType { field: String, reason: String },

    /// Default value does not satisfy the field's own type
    #[error("Default for field '{0}' does not match its type")]
    InvalidDefault(String),

    /// Schema document could not be parsed
    #[error("Malformed schema '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    /// Two schemas registered under the same record name
    #[error("Schema '{0}' is already registered")]
    AlreadyRegistered(String),
}

impl SchemaError {
    pub(crate) fn malformed_type(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedType {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        assert_eq!(
            SchemaError::DuplicateField("sku".into()).to_string(),
            "Duplicate field 'sku'"
        );
        let err = SchemaError::malformed_type("tags", "array requires 'items'");
        assert_eq!(
            err.to_string(),
            "Malformed type for 'tags': array requires 'items'"
        );
    }
}
