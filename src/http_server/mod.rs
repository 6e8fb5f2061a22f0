//! # HTTP Server Module
//!
//! Axum server exposing the event handlers.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /frontdoor` - Store a storefront event
//! - `POST /products` - Write a product record
//! - `POST /pubsub/sink` - Push delivery; write the product to the sink table
//! - `POST /pubsub/forward` - Push delivery; republish to the validated topic

pub mod config;
pub mod errors;
pub mod frontdoor_routes;
pub mod health_routes;
pub mod product_routes;
pub mod pubsub_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ServerError, ServerResult};
pub use server::{build_router, HttpServer};
pub use state::{in_memory_state, AppState, InMemoryBackends};
