//! Topic events through decoding, validation and storage

use std::sync::Arc;

use retail_oms::messaging::{
    avro_handler, forward, Event, InMemoryPublisher, MessagingError, Routed, SkipReason,
    SINK_TABLE_ATTRIBUTE,
};
use retail_oms::record::serialize_records;
use retail_oms::schema::{product_schema, SchemaMode};
use retail_oms::storage::{write_to_table, Database, InMemoryDatabase, TableDef};
use retail_oms::timestamp::parse_timestamp;
use retail_oms::validation::{validate, Datum};
use serde_json::json;

fn product(id: &str) -> Datum {
    json!({
        "id": id,
        "sku": format!("SKU-{}", id),
        "item_groups": ["shoes"],
        "commit_timestamp": "placeholder"
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn sink(db: &dyn Database, event: &Event) -> Result<Routed<String>, MessagingError> {
    let schema = product_schema(SchemaMode::Backend).unwrap();
    avro_handler(event, "products", |record, _| {
        if let Some(errors) = validate(&schema, &record) {
            return Err(MessagingError::Invalid(errors));
        }
        let committed_at = write_to_table(db, "products", &schema, &record)?;
        Ok(committed_at.to_rfc3339())
    })
}

#[test]
fn test_first_record_of_container_is_stored() {
    let schema = product_schema(SchemaMode::Backend).unwrap();
    let db = InMemoryDatabase::with_tables([TableDef::new("products", schema.column_names())]).unwrap();
    let bytes = serialize_records(&[product("a"), product("b")], &schema).unwrap();
    let event = Event::with_bytes(&bytes).with_attribute(SINK_TABLE_ATTRIBUTE, "products");

    assert!(sink(&db, &event).unwrap().is_handled());

    let rows = db.rows("products").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "a");
    assert_eq!(rows[0]["item_groups"], json!(["shoes"]));
    let stamp = rows[0]["commit_timestamp"].as_str().unwrap();
    assert_ne!(stamp, "placeholder");
    assert!(parse_timestamp(stamp).is_ok());
}

#[test]
fn test_events_without_attribute_are_skipped() {
    let schema = product_schema(SchemaMode::Backend).unwrap();
    let db = InMemoryDatabase::with_tables([TableDef::new("products", schema.column_names())]).unwrap();
    let event = Event::with_bytes(&serialize_records(&[product("a")], &schema).unwrap());

    assert_eq!(
        sink(&db, &event).unwrap(),
        Routed::Skipped(SkipReason::MissingSinkTable)
    );
    assert_eq!(db.row_count("products").unwrap(), 0);
}

#[test]
fn test_storage_failure_surfaces_as_error() {
    let schema = product_schema(SchemaMode::Backend).unwrap();
    let db = InMemoryDatabase::new();
    let event = Event::with_bytes(&serialize_records(&[product("a")], &schema).unwrap())
        .with_attribute(SINK_TABLE_ATTRIBUTE, "products");

    assert!(matches!(sink(&db, &event), Err(MessagingError::Storage(_))));
}

#[test]
fn test_forward_preserves_payload_for_downstream_sink() {
    let schema = product_schema(SchemaMode::Backend).unwrap();
    let publisher = Arc::new(InMemoryPublisher::new());
    let event = Event::with_bytes(&serialize_records(&[product("z")], &schema).unwrap())
        .with_attribute(SINK_TABLE_ATTRIBUTE, "products");

    forward(&event, "products", &schema, publisher.as_ref(), "validated").unwrap();

    let message = publisher.messages_for("validated").unwrap().remove(0);
    let republished = Event::with_bytes(&message.data).with_attribute(SINK_TABLE_ATTRIBUTE, "products");
    let db = InMemoryDatabase::with_tables([TableDef::new("products", schema.column_names())]).unwrap();
    sink(&db, &republished).unwrap();
    assert_eq!(db.rows("products").unwrap()[0]["sku"], "SKU-z");
}
