//! Table storage for validated records
//!
//! Writes are grouped into a [`Batch`] and applied through a [`Database`].
//! Cells marked [`Cell::CommitTimestamp`] receive the commit time, so every
//! row of one commit carries the same timestamp.

mod batch;
mod errors;
mod memory;
mod writer;

pub use batch::{Batch, Cell, Insert};
pub use errors::{StorageError, StorageResult};
pub use memory::{Database, InMemoryDatabase, TableDef};
pub use writer::{row_cells, write_to_table, COMMIT_TIMESTAMP_COLUMN};
