//! Low-level validation failures, before formatting

use serde_json::Value;

use crate::schema::TypeExpr;

/// One (field, candidate type) mismatch
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Field the failure belongs to
    pub field_path: String,
    /// Candidate type the value failed to match
    pub schema_type: TypeExpr,
    /// Value checked, `None` when the field was absent with no default
    pub actual: Option<Value>,
}

/// Anything the engine can object to
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A declared field failed its type
    Mismatch(ValidationFailure),
    /// The datum carries a field the schema does not declare
    Forbidden { field: String },
}

impl Failure {
    pub fn mismatch(field_path: impl Into<String>, schema_type: TypeExpr, actual: Option<Value>) -> Self {
        Failure::Mismatch(ValidationFailure {
            field_path: field_path.into(),
            schema_type,
            actual,
        })
    }

    pub fn forbidden(field: impl Into<String>) -> Self {
        Failure::Forbidden {
            field: field.into(),
        }
    }
}
