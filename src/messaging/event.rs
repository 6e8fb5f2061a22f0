//! # Messaging Events
//!
//! Events as delivered by a push subscription: string attributes plus an
//! optional base64 data payload.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::errors::{MessagingError, MessagingResult};

/// Attribute naming the table an event is destined for
pub const SINK_TABLE_ATTRIBUTE: &str = "spez.sink.table";

/// One message from a topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Base64 text of the message body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(
        default,
        rename = "messageId",
        alias = "message_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub message_id: Option<String>,
}

impl Event {
    /// Builds an event carrying `bytes` as its data.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            data: Some(STANDARD.encode(bytes)),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Value of the sink-table attribute, if set
    pub fn sink_table(&self) -> Option<&str> {
        self.attributes.get(SINK_TABLE_ATTRIBUTE).map(String::as_str)
    }

    /// Decoded data bytes; `None` when the event has no data.
    pub fn decode_data(&self) -> MessagingResult<Option<Vec<u8>>> {
        self.data
            .as_deref()
            .map(|data| STANDARD.decode(data).map_err(MessagingError::from))
            .transpose()
    }
}

/// Body of a push-subscription delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEnvelope {
    pub message: Event,
    #[serde(default)]
    pub subscription: String,
}

impl PushEnvelope {
    pub fn from_slice(body: &[u8]) -> MessagingResult<Self> {
        serde_json::from_slice(body).map_err(|e| MessagingError::Envelope(e.to_string()))
    }
}
