//! Topic publishing and validated forwarding

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, info};

use super::errors::{MessagingError, MessagingResult};
use super::event::Event;
use super::filter::{avro_handler, Routed};
use crate::schema::Schema;
use crate::validation::validate;

/// Publishes raw message bytes to a topic
pub trait Publisher: Send + Sync {
    /// Returns the id assigned to the published message.
    fn publish(
        &self,
        topic: &str,
        attributes: BTreeMap<String, String>,
        data: Vec<u8>,
    ) -> MessagingResult<String>;
}

/// A message accepted by [`InMemoryPublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub id: String,
    pub topic: String,
    pub attributes: BTreeMap<String, String>,
    pub data: Vec<u8>,
}

/// [`Publisher`] that records messages in memory
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    next_id: AtomicU64,
    messages: Mutex<Vec<PublishedMessage>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published so far, oldest first
    pub fn messages(&self) -> MessagingResult<Vec<PublishedMessage>> {
        let messages = self.messages.lock().map_err(|_| MessagingError::Poisoned)?;
        Ok(messages.clone())
    }

    /// Messages published to `topic`
    pub fn messages_for(&self, topic: &str) -> MessagingResult<Vec<PublishedMessage>> {
        let messages = self.messages.lock().map_err(|_| MessagingError::Poisoned)?;
        Ok(messages.iter().filter(|m| m.topic == topic).cloned().collect())
    }
}

impl Publisher for InMemoryPublisher {
    fn publish(
        &self,
        topic: &str,
        attributes: BTreeMap<String, String>,
        data: Vec<u8>,
    ) -> MessagingResult<String> {
        let id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        let mut messages = self.messages.lock().map_err(|_| MessagingError::Publish {
            topic: topic.to_string(),
            reason: "publisher lock poisoned".to_string(),
        })?;
        messages.push(PublishedMessage {
            id: id.clone(),
            topic: topic.to_string(),
            attributes,
            data,
        });
        debug!(topic, message_id = %id, "published message");
        Ok(id)
    }
}

/// Validates the event's record and republishes the original bytes to `topic`.
///
/// Attributes are carried over unchanged. Returns the new message id.
pub fn forward(
    event: &Event,
    sink_table: &str,
    schema: &Schema,
    publisher: &dyn Publisher,
    topic: &str,
) -> MessagingResult<Routed<String>> {
    avro_handler(event, sink_table, |record, bytes| {
        if let Some(errors) = validate(schema, &record) {
            debug!(sink_table, errors = errors.len(), "forward: record rejected");
            return Err(MessagingError::Invalid(errors));
        }
        let id = publisher.publish(topic, event.attributes.clone(), bytes)?;
        info!(sink_table, topic, message_id = %id, "forwarded record");
        Ok(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{SkipReason, SINK_TABLE_ATTRIBUTE};
    use crate::record::serialize_record;
    use crate::schema::{SchemaField, TypeExpr};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            "",
            "item",
            vec![
                SchemaField::new("id", TypeExpr::string()),
                SchemaField::new("qty", TypeExpr::nullable(TypeExpr::long())),
            ],
        )
        .unwrap()
    }

    fn event_for(record: serde_json::Value, writer: &Schema) -> Event {
        let record = record.as_object().cloned().unwrap();
        Event::with_bytes(&serialize_record(&record, writer).unwrap())
            .with_attribute(SINK_TABLE_ATTRIBUTE, "items")
    }

    #[test]
    fn test_forward_republishes_bytes_and_attributes() {
        let publisher = InMemoryPublisher::new();
        let event = event_for(json!({"id": "i-1", "qty": 2}), &schema());

        let routed = forward(&event, "items", &schema(), &publisher, "items-validated").unwrap();
        assert_eq!(routed, Routed::Handled("1".to_string()));

        let published = publisher.messages_for("items-validated").unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].data, event.decode_data().unwrap().unwrap());
        assert_eq!(published[0].attributes, event.attributes);
    }

    #[test]
    fn test_forward_rejects_invalid_record() {
        let loose = Schema::new(
            "",
            "item",
            vec![SchemaField::new("id", TypeExpr::nullable(TypeExpr::string()))],
        )
        .unwrap();
        let publisher = InMemoryPublisher::new();
        let event = event_for(json!({"id": null}), &loose);

        let err = forward(&event, "items", &schema(), &publisher, "out").unwrap_err();
        assert_eq!(err.messages(), vec!["Missing required field \"id\"".to_string()]);
        assert!(publisher.messages().unwrap().is_empty());
    }

    #[test]
    fn test_forward_skips_other_tables() {
        let publisher = InMemoryPublisher::new();
        let event = event_for(json!({"id": "i-1"}), &schema()).with_attribute(SINK_TABLE_ATTRIBUTE, "orders");
        let routed = forward(&event, "items", &schema(), &publisher, "out").unwrap();
        assert_eq!(routed, Routed::Skipped(SkipReason::OtherTable("orders".into())));
        assert!(publisher.messages().unwrap().is_empty());
    }

    #[test]
    fn test_poisoned_publisher_reports_error() {
        let publisher = std::sync::Arc::new(InMemoryPublisher::new());
        publisher.publish("t", BTreeMap::new(), vec![1]).unwrap();

        let shared = std::sync::Arc::clone(&publisher);
        let _ = std::thread::spawn(move || {
            let _guard = shared.messages.lock().unwrap();
            panic!("writer crashed");
        })
        .join();

        assert!(matches!(publisher.messages(), Err(MessagingError::Poisoned)));
        assert!(matches!(publisher.messages_for("t"), Err(MessagingError::Poisoned)));
        assert!(matches!(
            publisher.publish("t", BTreeMap::new(), vec![2]),
            Err(MessagingError::Publish { .. })
        ));
    }

    #[test]
    fn test_message_ids_increase() {
        let publisher = InMemoryPublisher::new();
        let a = publisher.publish("t", BTreeMap::new(), vec![1]).unwrap();
        let b = publisher.publish("t", BTreeMap::new(), vec![2]).unwrap();
        assert_eq!((a.as_str(), b.as_str()), ("1", "2"));
    }
}
