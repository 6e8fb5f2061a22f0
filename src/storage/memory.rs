//! In-process table store
//!
//! Tables are created up front from [`TableDef`]s. A commit checks every
//! insert of the batch before touching any table, so a failed commit writes
//! nothing.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use super::batch::{Batch, Cell};
use super::errors::{StorageError, StorageResult};
use crate::timestamp::{storage_now, to_storage_timestamp};
use crate::validation::Datum;

/// Transactional row store
pub trait Database: Send + Sync {
    /// Applies every insert in `batch` atomically and returns the commit time.
    fn commit(&self, batch: Batch) -> StorageResult<DateTime<Utc>>;
}

/// Table name and column layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableDef {
    pub fn new<C, S>(name: impl Into<String>, columns: C) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug)]
struct Table {
    columns: Vec<String>,
    rows: Vec<Datum>,
}

/// [`Database`] keeping committed rows in memory
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a database holding the given (empty) tables.
    pub fn with_tables(defs: impl IntoIterator<Item = TableDef>) -> StorageResult<Self> {
        let db = Self::new();
        for def in defs {
            db.create_table(def)?;
        }
        Ok(db)
    }

    pub fn create_table(&self, def: TableDef) -> StorageResult<()> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        if tables.contains_key(&def.name) {
            return Err(StorageError::TableExists(def.name));
        }
        debug!(table = %def.name, columns = def.columns.len(), "created table");
        tables.insert(
            def.name,
            Table {
                columns: def.columns,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    /// Committed rows of `table`, in commit order, keyed by column name.
    pub fn rows(&self, table: &str) -> StorageResult<Vec<Datum>> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        tables
            .get(table)
            .map(|t| t.rows.clone())
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))
    }

    pub fn row_count(&self, table: &str) -> StorageResult<usize> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        tables
            .get(table)
            .map(|t| t.rows.len())
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))
    }
}

impl Database for InMemoryDatabase {
    fn commit(&self, batch: Batch) -> StorageResult<DateTime<Utc>> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;

        for insert in batch.inserts() {
            let table = tables
                .get(&insert.table)
                .ok_or_else(|| StorageError::TableNotFound(insert.table.clone()))?;
            if let Some(column) = insert.columns.iter().find(|c| !table.columns.contains(c)) {
                return Err(StorageError::UnknownColumn {
                    table: insert.table.clone(),
                    column: column.clone(),
                });
            }
        }

        let committed_at = storage_now();
        let stamp = Value::String(to_storage_timestamp(&committed_at));

        for insert in batch.inserts() {
            let Some(table) = tables.get_mut(&insert.table) else {
                continue;
            };
            for row in &insert.rows {
                let mut provided: HashMap<&str, &Cell> = insert
                    .columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter())
                    .collect();
                let mut stored = Datum::new();
                for column in &table.columns {
                    let value = match provided.remove(column.as_str()) {
                        Some(Cell::Value(v)) => v.clone(),
                        Some(Cell::CommitTimestamp) => stamp.clone(),
                        None => Value::Null,
                    };
                    stored.insert(column.clone(), value);
                }
                table.rows.push(stored);
            }
        }

        info!(
            inserts = batch.inserts().len(),
            rows = batch.row_count(),
            "committed batch"
        );
        Ok(committed_at)
    }
}
