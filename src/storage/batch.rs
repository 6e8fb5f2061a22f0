//! Mutation batches
//!
//! A batch collects inserts for several tables and is committed as a unit.
//! Cells are either concrete JSON values or the commit-timestamp sentinel,
//! which the database replaces with the commit time.

use serde_json::Value;

use super::errors::{StorageError, StorageResult};

/// A single cell of an insert row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Value(Value),
    /// Replaced with the commit timestamp when the batch is committed
    CommitTimestamp,
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Value(value)
    }
}

/// Rows to insert into one table
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Ordered set of inserts applied atomically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    inserts: Vec<Insert>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues rows for `table`. Every row must have one cell per column.
    pub fn insert<C, S>(&mut self, table: &str, columns: C, rows: Vec<Vec<Cell>>) -> StorageResult<()>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(StorageError::RowWidth {
                    table: table.to_string(),
                    row: idx,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        self.inserts.push(Insert {
            table: table.to_string(),
            columns,
            rows,
        });
        Ok(())
    }

    pub fn inserts(&self) -> &[Insert] {
        &self.inserts
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
    }

    /// Total number of rows across all inserts
    pub fn row_count(&self) -> usize {
        self.inserts.iter().map(|i| i.rows.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_accepts_matching_rows() {
        let mut batch = Batch::new();
        batch
            .insert(
                "products",
                ["id", "commit_timestamp"],
                vec![
                    vec![Cell::from(json!("a")), Cell::CommitTimestamp],
                    vec![Cell::from(json!("b")), Cell::CommitTimestamp],
                ],
            )
            .unwrap();
        assert_eq!(batch.inserts().len(), 1);
        assert_eq!(batch.row_count(), 2);
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_insert_rejects_short_row() {
        let mut batch = Batch::new();
        let err = batch
            .insert("products", ["id", "sku"], vec![vec![Cell::from(json!("a"))]])
            .unwrap_err();
        assert_eq!(
            err,
            StorageError::RowWidth {
                table: "products".into(),
                row: 0,
                expected: 2,
                actual: 1,
            }
        );
        assert!(batch.is_empty());
    }
}
