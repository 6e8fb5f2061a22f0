//! Schema-shaped row writes
//!
//! A validated record is written as one row whose columns are the schema's
//! fields in declaration order.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::batch::{Batch, Cell};
use super::errors::StorageResult;
use super::memory::Database;
use crate::schema::Schema;
use crate::validation::Datum;

/// Column that always receives the commit timestamp
pub const COMMIT_TIMESTAMP_COLUMN: &str = "commit_timestamp";

/// Builds the cells for `row` under `schema`.
///
/// Absent values fall back to the field default, then to null.
pub fn row_cells(schema: &Schema, row: &Datum) -> Vec<Cell> {
    schema
        .fields()
        .iter()
        .map(|field| {
            if field.name == COMMIT_TIMESTAMP_COLUMN {
                return Cell::CommitTimestamp;
            }
            let value = row
                .get(&field.name)
                .or(field.default.as_ref())
                .cloned()
                .unwrap_or(Value::Null);
            Cell::Value(value)
        })
        .collect()
}

/// Writes one record to `table` in its own batch.
pub fn write_to_table(
    db: &dyn Database,
    table: &str,
    schema: &Schema,
    row: &Datum,
) -> StorageResult<DateTime<Utc>> {
    let mut batch = Batch::new();
    batch.insert(table, schema.column_names(), vec![row_cells(schema, row)])?;
    db.commit(batch)
}
