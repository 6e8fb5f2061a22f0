//! Front-door HTTP Routes
//!
//! Accepts raw storefront events and stores them as JSON strings.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap, routing::post, Router};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::state::AppState;
use crate::dispatch::{handle, DispatchRequest, DispatchResponse};
use crate::storage::{Batch, Cell, Database};
use crate::timestamp::timestamp;
use crate::validation::Datum;

/// Column layout of the front-door table
pub const FRONTDOOR_COLUMNS: [&str; 4] = [
    "id",
    "event_info_json_string",
    "created_at",
    "commit_timestamp",
];

/// Create front-door routes
pub fn frontdoor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/frontdoor", post(frontdoor_handler))
        .with_state(state)
}

async fn frontdoor_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> DispatchResponse {
    let request = DispatchRequest::from_parts(&headers, body);
    handle(&request, &state.frontdoor_schema, |datum| {
        insert_frontdoor_event(state.database.as_ref(), &state.config.frontdoor_table, &datum)
    })
}

/// Stores one validated front-door event under a fresh id.
pub fn insert_frontdoor_event(
    db: &dyn Database,
    table: &str,
    datum: &Datum,
) -> Result<Value, Vec<String>> {
    let id = Uuid::new_v4().to_string();
    let event_info = datum
        .get("event_info_json_string")
        .cloned()
        .unwrap_or(Value::Null);

    let mut batch = Batch::new();
    batch
        .insert(
            table,
            FRONTDOOR_COLUMNS,
            vec![vec![
                Cell::from(Value::String(id.clone())),
                Cell::from(event_info),
                Cell::from(Value::String(timestamp())),
                Cell::CommitTimestamp,
            ]],
        )
        .map_err(|e| vec![e.to_string()])?;
    db.commit(batch).map_err(|e| vec![e.to_string()])?;

    info!(table, id = %id, "stored front-door event");
    Ok(json!({ "id": id }))
}
