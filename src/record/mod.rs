//! Avro object-container codec for records

mod codec;
mod errors;

pub use codec::{avro_schema, deserialize_record, deserialize_records, serialize_record, serialize_records};
pub use errors::{RecordError, RecordResult};
