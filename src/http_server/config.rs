//! Listener and CORS settings for the handler server

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::errors::{ServerError, ServerResult};
use crate::config::{ConfigError, ConfigResult};

/// Where the handlers listen and which browser origins may call them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// IP address to bind (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins the storefront may call from; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// `host:port` as configured, for logs
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address the listener binds to
    pub fn listen_addr(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ServerError::Address(self.socket_addr()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Rejects a zero port, a host that is not an IP address and origins
    /// that are not `http(s)://` header values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("http.port must be > 0".into()));
        }
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "http.host '{}' is not an IP address",
                self.host
            )));
        }
        for origin in &self.cors_origins {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            if !scheme_ok || HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "http.cors_origins entry '{}' is not an origin",
                    origin
                )));
            }
        }
        Ok(())
    }

    /// CORS layer for the router: any origin when none are listed.
    pub fn cors_layer(&self) -> CorsLayer {
        let allow_origin = if self.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(
                self.cors_origins
                    .iter()
                    .filter_map(|origin| HeaderValue::from_str(origin).ok()),
            )
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
