//! Attribute routing and Avro payload extraction
//!
//! Every handler here either runs its callback ([`Routed::Handled`]) or
//! reports why the event was not for it ([`Routed::Skipped`]). Skipping is
//! not an error: a topic carries events for many tables.

use std::fmt;

use tracing::{debug, error};

use super::errors::MessagingResult;
use super::event::Event;
use crate::record::deserialize_record;
use crate::validation::Datum;

/// Why an event was not handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Event has no sink-table attribute
    MissingSinkTable,
    /// Event targets another table
    OtherTable(String),
    /// Event has no data
    NoData,
    /// Data decoded to a container with no records
    EmptyContainer,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSinkTable => write!(f, "missing sink table attribute"),
            SkipReason::OtherTable(table) => write!(f, "event is for table {}", table),
            SkipReason::NoData => write!(f, "event has no data"),
            SkipReason::EmptyContainer => write!(f, "event data holds no records"),
        }
    }
}

/// Outcome of routing an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed<R> {
    Handled(R),
    Skipped(SkipReason),
}

impl<R> Routed<R> {
    pub fn is_handled(&self) -> bool {
        matches!(self, Routed::Handled(_))
    }

    pub fn handled(self) -> Option<R> {
        match self {
            Routed::Handled(r) => Some(r),
            Routed::Skipped(_) => None,
        }
    }
}

/// Runs `func` only for events whose sink table is `table`.
pub fn table_filter<R, F>(event: &Event, table: &str, func: F) -> MessagingResult<Routed<R>>
where
    F: FnOnce(&Event) -> MessagingResult<R>,
{
    let Some(sink_table) = event.sink_table() else {
        error!(attributes = ?event.attributes, "table_filter: sink table attribute missing");
        return Ok(Routed::Skipped(SkipReason::MissingSinkTable));
    };
    if sink_table != table {
        debug!(sink_table, table, "table_filter: event is for another table");
        return Ok(Routed::Skipped(SkipReason::OtherTable(sink_table.to_string())));
    }
    func(event).map(Routed::Handled)
}

/// Decodes the first Avro record of the event data and passes it to `func`.
pub fn avro_event<R, F>(event: &Event, func: F) -> MessagingResult<Routed<R>>
where
    F: FnOnce(Datum) -> MessagingResult<R>,
{
    with_record(event, |record, _| func(record))
}

/// Sink-table filter followed by Avro decoding.
///
/// `func` receives the decoded record and the raw container bytes.
pub fn avro_handler<R, F>(event: &Event, sink_table: &str, func: F) -> MessagingResult<Routed<R>>
where
    F: FnOnce(Datum, Vec<u8>) -> MessagingResult<R>,
{
    match table_filter(event, sink_table, |event| with_record(event, func))? {
        Routed::Handled(inner) => Ok(inner),
        Routed::Skipped(reason) => Ok(Routed::Skipped(reason)),
    }
}

fn with_record<R, F>(event: &Event, func: F) -> MessagingResult<Routed<R>>
where
    F: FnOnce(Datum, Vec<u8>) -> MessagingResult<R>,
{
    let Some(bytes) = event.decode_data()? else {
        error!("avro_event: payload is missing");
        return Ok(Routed::Skipped(SkipReason::NoData));
    };
    let Some(record) = deserialize_record(&bytes)? else {
        error!(bytes = bytes.len(), "avro_event: container holds no records");
        return Ok(Routed::Skipped(SkipReason::EmptyContainer));
    };
    func(record, bytes).map(Routed::Handled)
}
