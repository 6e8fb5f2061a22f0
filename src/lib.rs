//! retail-oms - schema-validated event handlers for a retail order system
//!
//! Incoming events (JSON or Avro) are validated against record schemas and
//! either written to tables or forwarded to another topic. Validation
//! failures are reported as a flat list of readable messages.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod http_server;
pub mod logging;
pub mod messaging;
pub mod record;
pub mod schema;
pub mod storage;
pub mod timestamp;
pub mod validation;
