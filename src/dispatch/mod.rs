//! # Request Dispatch
//!
//! Content-type driven decoding, validation and invocation of the endpoint
//! work function.

mod decoder;
mod errors;
mod handler;

pub use decoder::{Decoder, AVRO_BINARY_CONTENT_TYPE, AVRO_CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use errors::{DecodeError, HandlerError};
pub use handler::{handle, try_handle, DispatchRequest, DispatchResponse, Stage};
