//! Decode, validate and work through the dispatcher

use std::cell::RefCell;

use axum::http::StatusCode;
use retail_oms::dispatch::{handle, try_handle, DecodeError, DispatchRequest, HandlerError, Stage};
use retail_oms::record::serialize_record;
use retail_oms::schema::{frontdoor_schema, Schema, SchemaField, TypeExpr};
use retail_oms::validation::Datum;
use serde_json::{json, Value};

fn item_schema() -> Schema {
    Schema::new(
        "test",
        "item",
        vec![
            SchemaField::new("id", TypeExpr::string()),
            SchemaField::new("tags", TypeExpr::nullable(TypeExpr::array(TypeExpr::string()))),
        ],
    )
    .unwrap()
}

#[test]
fn test_unsupported_content_type_is_400_naming_the_type() {
    let response = handle(
        &DispatchRequest::new("text/xml", b"<id/>".to_vec()),
        &item_schema(),
        |_| Ok(Value::Null),
    );
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"errors": ["Unsupported content type: text/xml"]})
    );
}

#[test]
fn test_missing_content_type_is_400() {
    let request = DispatchRequest {
        content_type: None,
        body: br#"{"id": "x"}"#.to_vec(),
    };
    let err = try_handle(&request, &item_schema(), |_| Ok(Value::Null)).unwrap_err();
    assert_eq!(err, HandlerError::Decode(DecodeError::MissingContentType));
    assert_eq!(err.stage(), Stage::Decoding);
}

#[test]
fn test_invalid_payload_returns_all_messages_without_work() {
    let calls = RefCell::new(0);
    let response = handle(
        &DispatchRequest::new("application/json", br#"{"tags": [1], "x": 0}"#.to_vec()),
        &item_schema(),
        |_| {
            *calls.borrow_mut() += 1;
            Ok(Value::Null)
        },
    );
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"errors": [
            "Missing required field \"id\"",
            "The field \"tags\" has a value of \"[1]\" which is not one of the valid types (array of string)",
            "Forbidden field x"
        ]})
    );
}

#[test]
fn test_valid_json_invokes_work_once_with_payload() {
    let seen: RefCell<Vec<Datum>> = RefCell::new(Vec::new());
    let response = handle(
        &DispatchRequest::new("application/json; charset=utf-8", br#"{"id": "x", "tags": null}"#.to_vec()),
        &item_schema(),
        |datum| {
            seen.borrow_mut().push(datum);
            Ok(json!({"ok": true}))
        },
    );
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"ok": true}));

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 1);
    assert_eq!(Value::Object(seen[0].clone()), json!({"id": "x", "tags": null}));
}

#[test]
fn test_avro_body_is_decoded_and_validated() {
    let schema = frontdoor_schema().unwrap();
    let record = json!({"event_info_json_string": "{\"event\":\"add-to-cart\"}"})
        .as_object()
        .cloned()
        .unwrap();
    let body = serialize_record(&record, &schema).unwrap();

    let result = try_handle(&DispatchRequest::new("avro/binary", body), &schema, |datum| {
        Ok(datum["event_info_json_string"].clone())
    })
    .unwrap();
    assert_eq!(result, json!("{\"event\":\"add-to-cart\"}"));
}

#[test]
fn test_work_failure_is_reported() {
    let err = try_handle(
        &DispatchRequest::new("application/json", br#"{"id": "x"}"#.to_vec()),
        &item_schema(),
        |_| Err(vec!["table offline".to_string()]),
    )
    .unwrap_err();
    assert_eq!(err.stage(), Stage::Working);
    assert_eq!(err.messages(), vec!["table offline".to_string()]);
}

#[test]
fn test_non_object_json_is_decode_error() {
    let err = try_handle(
        &DispatchRequest::new("application/json", b"\"just a string\"".to_vec()),
        &item_schema(),
        |_| Ok(Value::Null),
    )
    .unwrap_err();
    assert_eq!(err, HandlerError::Decode(DecodeError::NotAnObject));
}
