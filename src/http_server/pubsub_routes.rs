//! Push-Subscription HTTP Routes
//!
//! Endpoints receiving push deliveries. Events for other tables are
//! acknowledged with `204 No Content` so the subscription does not redeliver
//! them.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::debug;

use super::state::AppState;
use crate::messaging::{avro_handler, forward, MessagingError, MessagingResult, PushEnvelope, Routed};
use crate::storage::write_to_table;
use crate::validation::validate;

/// Create push-subscription routes
pub fn pubsub_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sink", post(sink_handler))
        .route("/forward", post(forward_handler))
        .with_state(state)
}

async fn sink_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    respond(sink_envelope(&state, &body))
}

async fn forward_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let routed = PushEnvelope::from_slice(&body).and_then(|envelope| {
        forward(
            &envelope.message,
            &state.config.sink_table,
            &state.product_schema,
            state.publisher.as_ref(),
            &state.config.forward_topic,
        )
    });
    respond(routed.map(|r| match r {
        Routed::Handled(id) => Routed::Handled(json!({ "message_id": id })),
        Routed::Skipped(reason) => Routed::Skipped(reason),
    }))
}

/// Validates the event's product record and writes it to the sink table.
pub fn sink_envelope(state: &AppState, body: &[u8]) -> MessagingResult<Routed<Value>> {
    let envelope = PushEnvelope::from_slice(body)?;
    let table = &state.config.sink_table;
    avro_handler(&envelope.message, table, |record, _| {
        if let Some(errors) = validate(&state.product_schema, &record) {
            return Err(MessagingError::Invalid(errors));
        }
        let committed_at =
            write_to_table(state.database.as_ref(), table, &state.product_schema, &record)?;
        Ok(json!({
            "id": record.get("id").cloned().unwrap_or(Value::Null),
            "table": table,
            "commit_timestamp": crate::timestamp::to_storage_timestamp(&committed_at),
        }))
    })
}

fn respond(result: MessagingResult<Routed<Value>>) -> Response {
    match result {
        Ok(Routed::Handled(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Routed::Skipped(reason)) => {
            debug!(%reason, "event skipped");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            let status = match &err {
                MessagingError::Storage(_)
                | MessagingError::Publish { .. }
                | MessagingError::Poisoned => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            };
            debug!(error = %err, %status, "event rejected");
            (status, Json(json!({ "errors": err.messages() }))).into_response()
        }
    }
}
