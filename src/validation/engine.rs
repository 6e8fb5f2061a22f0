//! Validation engine
//!
//! Validation semantics:
//! - every declared field is checked, in schema order, against its type
//! - absent fields fall back to the field default before checking
//! - every undeclared datum key is forbidden, independent of the above
//! - all failures are collected; nothing short-circuits
//!
//! The engine is a pure function of (schema, datum).

use serde_json::{Map, Value};

use super::failure::Failure;
use super::formatter;
use crate::schema::matcher::{candidates, matches};
use crate::schema::Schema;

/// One untyped input record
pub type Datum = Map<String, Value>;

/// Collects every failure for `datum`, mismatches first.
pub fn collect_failures(schema: &Schema, datum: &Datum) -> Vec<Failure> {
    let mut failures = Vec::new();

    for field in schema.fields() {
        let value = datum.get(&field.name).or(field.default.as_ref());
        if matches(&field.type_expr, value) {
            continue;
        }
        for candidate in candidates(&field.type_expr) {
            failures.push(Failure::mismatch(&field.name, candidate, value.cloned()));
        }
    }

    for key in datum.keys() {
        if !schema.has_field(key) {
            failures.push(Failure::forbidden(key));
        }
    }

    failures
}

/// Validates `datum`, returning `None` when valid and the ordered error
/// messages otherwise.
pub fn validate(schema: &Schema, datum: &Datum) -> Option<Vec<String>> {
    let messages = formatter::format(&collect_failures(schema, datum));
    if messages.is_empty() {
        None
    } else {
        Some(messages)
    }
}

/// Validates an arbitrary JSON value, which must be an object.
pub fn validate_value(schema: &Schema, value: &Value) -> Option<Vec<String>> {
    match value.as_object() {
        Some(datum) => validate(schema, datum),
        None => Some(vec![format!(
            "Expected a JSON object for record \"{}\"",
            schema.name()
        )]),
    }
}
