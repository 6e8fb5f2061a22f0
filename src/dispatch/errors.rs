//! # Dispatch Errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::handler::Stage;

/// Errors turning a request body into a datum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Missing content type")]
    MissingContentType,

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("Expected a JSON object body")]
    NotAnObject,

    #[error("Malformed Avro body: {0}")]
    MalformedAvro(String),

    #[error("Avro body holds no records")]
    EmptyContainer,
}

/// Request failures reported to the caller as `{"errors": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Request failed: {}", .0.join("; "))]
    Work(Vec<String>),
}

impl HandlerError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Decode(_) | HandlerError::Validation(_) | HandlerError::Work(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Stage the request was in when it failed
    pub fn stage(&self) -> Stage {
        match self {
            HandlerError::Decode(_) => Stage::Decoding,
            HandlerError::Validation(_) => Stage::Validating,
            HandlerError::Work(_) => Stage::Working,
        }
    }

    /// Flat list of caller-facing messages
    pub fn messages(&self) -> Vec<String> {
        match self {
            HandlerError::Decode(e) => vec![e.to_string()],
            HandlerError::Validation(messages) | HandlerError::Work(messages) => messages.clone(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = json!({ "errors": self.messages() });
        (self.status_code(), Json(body)).into_response()
    }
}
