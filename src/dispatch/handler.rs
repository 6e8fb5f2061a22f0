//! Request dispatch
//!
//! A request moves through `Decoding -> Validating -> Working -> Done`.
//! Any failure ends the request with a 400 and an `errors` list; the work
//! function only ever sees payloads that passed validation.

use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::debug;

use super::decoder::Decoder;
use super::errors::HandlerError;
use crate::schema::Schema;
use crate::validation::{validate, Datum};

/// Processing stage of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decoding,
    Validating,
    Working,
    Done,
}

/// Raw request as seen by the dispatcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl DispatchRequest {
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }

    /// Builds a request from axum headers and body.
    pub fn from_parts(headers: &HeaderMap, body: Bytes) -> Self {
        Self {
            content_type: headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: body.to_vec(),
        }
    }
}

/// Body and status produced for a request
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl From<HandlerError> for DispatchResponse {
    fn from(err: HandlerError) -> Self {
        Self {
            status: err.status_code(),
            body: serde_json::json!({ "errors": err.messages() }),
        }
    }
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Decodes, validates and runs `work` on the request payload.
pub fn try_handle<F>(request: &DispatchRequest, schema: &Schema, work: F) -> Result<Value, HandlerError>
where
    F: FnOnce(Datum) -> Result<Value, Vec<String>>,
{
    let decoder = Decoder::for_content_type(request.content_type.as_deref())?;
    let datum = decoder.decode(&request.body)?;

    if let Some(errors) = validate(schema, &datum) {
        debug!(schema = %schema.full_name(), errors = ?errors, "payload rejected");
        return Err(HandlerError::Validation(errors));
    }

    work(datum).map_err(HandlerError::Work)
}

/// Like [`try_handle`] but folds the outcome into a response.
pub fn handle<F>(request: &DispatchRequest, schema: &Schema, work: F) -> DispatchResponse
where
    F: FnOnce(Datum) -> Result<Value, Vec<String>>,
{
    match try_handle(request, schema, work) {
        Ok(body) => {
            debug!(schema = %schema.name(), stage = ?Stage::Done, "request handled");
            DispatchResponse {
                status: StatusCode::OK,
                body,
            }
        }
        Err(err) => {
            debug!(schema = %schema.name(), stage = ?err.stage(), error = %err, "request failed");
            err.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DecodeError;
    use crate::schema::{Schema, SchemaField, TypeExpr};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("", "item", vec![SchemaField::new("id", TypeExpr::string())]).unwrap()
    }

    #[test]
    fn test_valid_request_runs_work_once() {
        let mut calls = 0;
        let response = handle(
            &DispatchRequest::new("application/json", br#"{"id": "x"}"#.to_vec()),
            &schema(),
            |datum| {
                calls += 1;
                Ok(json!({ "echo": datum["id"] }))
            },
        );
        assert_eq!(calls, 1);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({"echo": "x"}));
    }

    #[test]
    fn test_invalid_payload_skips_work() {
        let response = handle(
            &DispatchRequest::new("application/json", b"{}".to_vec()),
            &schema(),
            |_| -> Result<Value, Vec<String>> { panic!("work must not run") },
        );
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({"errors": ["Missing required field \"id\""]}));
    }

    #[test]
    fn test_unsupported_content_type() {
        let err = try_handle(
            &DispatchRequest::new("text/plain", b"id=x".to_vec()),
            &schema(),
            |_| Ok(Value::Null),
        )
        .unwrap_err();
        assert_eq!(
            err,
            HandlerError::Decode(DecodeError::UnsupportedContentType("text/plain".into()))
        );
    }

    #[test]
    fn test_error_reports_failing_stage() {
        let decode = try_handle(&DispatchRequest::new("text/plain", b"x".to_vec()), &schema(), |_| {
            Ok(Value::Null)
        })
        .unwrap_err();
        assert_eq!(decode.stage(), Stage::Decoding);

        let validate = try_handle(&DispatchRequest::new("application/json", b"{}".to_vec()), &schema(), |_| {
            Ok(Value::Null)
        })
        .unwrap_err();
        assert_eq!(validate.stage(), Stage::Validating);

        let work = try_handle(
            &DispatchRequest::new("application/json", br#"{"id": "x"}"#.to_vec()),
            &schema(),
            |_| Err(vec!["down".to_string()]),
        )
        .unwrap_err();
        assert_eq!(work.stage(), Stage::Working);
    }

    #[test]
    fn test_work_errors_become_400() {
        let response = handle(
            &DispatchRequest::new("application/json", br#"{"id": "x"}"#.to_vec()),
            &schema(),
            |_| Err(vec!["table unavailable".to_string()]),
        );
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({"errors": ["table unavailable"]}));
    }

    #[test]
    fn test_from_parts_reads_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "avro/binary".parse().unwrap());
        let request = DispatchRequest::from_parts(&headers, Bytes::from_static(b"abc"));
        assert_eq!(request.content_type.as_deref(), Some("avro/binary"));
        assert_eq!(request.body, b"abc");
    }
}
