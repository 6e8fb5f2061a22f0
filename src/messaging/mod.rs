//! # Messaging
//!
//! Topic events routed by their sink-table attribute. Handlers decode the
//! base64 Avro payload, validate it and either persist it or forward it to
//! another topic.

mod errors;
mod event;
mod filter;
mod publisher;

pub use errors::{MessagingError, MessagingResult};
pub use event::{Event, PushEnvelope, SINK_TABLE_ATTRIBUTE};
pub use filter::{avro_event, avro_handler, table_filter, Routed, SkipReason};
pub use publisher::{forward, InMemoryPublisher, PublishedMessage, Publisher};
