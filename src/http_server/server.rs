//! # HTTP Server
//!
//! Combines the endpoint routers into one Axum application.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::errors::ServerResult;
use super::frontdoor_routes::frontdoor_routes;
use super::health_routes::health_routes;
use super::product_routes::product_routes;
use super::pubsub_routes::pubsub_routes;
use super::state::AppState;

/// HTTP server for the event handlers
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over shared handler state
    pub fn new(state: Arc<AppState>) -> Self {
        let config = state.config.http.clone();
        Self::with_config(config, state)
    }

    /// Create a server with an explicit listener configuration
    pub fn with_config(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server
    pub async fn start(self) -> ServerResult<()> {
        let addr = self.config.listen_addr()?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "retail-oms handlers listening");
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(frontdoor_routes(state.clone()))
        .merge(product_routes(state.clone()))
        .nest("/pubsub", pubsub_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
}
