//! Request body decoders
//!
//! The decoder is picked from the media type of the request's content type.
//! Parameters such as `charset` are ignored and matching is case-insensitive.

use serde_json::Value;

use super::errors::DecodeError;
use crate::record::deserialize_record;
use crate::validation::Datum;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const AVRO_CONTENT_TYPE: &str = "application/avro";
pub const AVRO_BINARY_CONTENT_TYPE: &str = "avro/binary";

/// Supported body encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// A JSON object
    Json,
    /// An Avro object container; the first record is used
    AvroContainer,
}

impl Decoder {
    pub fn for_content_type(content_type: Option<&str>) -> Result<Self, DecodeError> {
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .ok_or(DecodeError::MissingContentType)?;
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            JSON_CONTENT_TYPE => Ok(Decoder::Json),
            AVRO_CONTENT_TYPE | AVRO_BINARY_CONTENT_TYPE => Ok(Decoder::AvroContainer),
            _ => Err(DecodeError::UnsupportedContentType(content_type.to_string())),
        }
    }

    pub fn decode(&self, body: &[u8]) -> Result<Datum, DecodeError> {
        match self {
            Decoder::Json => match serde_json::from_slice::<Value>(body) {
                Ok(Value::Object(datum)) => Ok(datum),
                Ok(_) => Err(DecodeError::NotAnObject),
                Err(e) => Err(DecodeError::MalformedJson(e.to_string())),
            },
            Decoder::AvroContainer => deserialize_record(body)
                .map_err(|e| DecodeError::MalformedAvro(e.to_string()))?
                .ok_or(DecodeError::EmptyContainer),
        }
    }
}
