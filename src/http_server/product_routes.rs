//! Product HTTP Routes
//!
//! Direct product writes, validated against the product schema.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap, routing::post, Router};
use serde_json::{json, Value};

use super::state::AppState;
use crate::dispatch::{handle, DispatchRequest, DispatchResponse};
use crate::schema::Schema;
use crate::storage::{write_to_table, Database};
use crate::timestamp::to_storage_timestamp;
use crate::validation::Datum;

/// Create product routes
pub fn product_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/products", post(product_handler))
        .with_state(state)
}

async fn product_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> DispatchResponse {
    let request = DispatchRequest::from_parts(&headers, body);
    handle(&request, &state.product_schema, |datum| {
        store_product(
            state.database.as_ref(),
            &state.config.product_table,
            &state.product_schema,
            &datum,
        )
    })
}

/// Writes a validated product row.
pub fn store_product(
    db: &dyn Database,
    table: &str,
    schema: &Schema,
    datum: &Datum,
) -> Result<Value, Vec<String>> {
    let committed_at = write_to_table(db, table, schema, datum).map_err(|e| vec![e.to_string()])?;
    Ok(json!({
        "id": datum.get("id").cloned().unwrap_or(Value::Null),
        "commit_timestamp": to_storage_timestamp(&committed_at),
    }))
}
