//! Payload validation against record schemas
//!
//! [`validate`] checks a datum field by field, rejects undeclared keys and
//! returns the formatted messages. [`collect_failures`] and [`format`] are
//! exposed separately so the two halves can be exercised on their own.

mod engine;
mod failure;
mod formatter;

pub use engine::{collect_failures, validate, validate_value, Datum};
pub use failure::{Failure, ValidationFailure};
pub use formatter::format;
