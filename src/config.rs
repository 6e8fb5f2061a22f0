//! Service configuration
//!
//! Loaded once at startup from a JSON file. Every field has a default, so
//! `{}` is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Names of the backing database, used for log context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_instance")]
    pub instance: String,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_project() -> String {
    "rcs-demo-test".to_string()
}
fn default_instance() -> String {
    "test-instance".to_string()
}
fn default_database() -> String {
    "test-database".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            instance: default_instance(),
            database: default_database(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG` (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table receiving frontdoor events (default: "frontdoor")
    #[serde(default = "default_frontdoor_table")]
    pub frontdoor_table: String,

    /// Table receiving product writes (default: "products")
    #[serde(default = "default_product_table")]
    pub product_table: String,

    /// Sink table accepted from topic events (default: "products")
    #[serde(default = "default_product_table")]
    pub sink_table: String,

    /// Topic validated events are forwarded to (default: "products-validated")
    #[serde(default = "default_forward_topic")]
    pub forward_topic: String,

    /// Directory of Avro schema documents loaded at startup
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_frontdoor_table() -> String {
    "frontdoor".to_string()
}
fn default_product_table() -> String {
    "products".to_string()
}
fn default_forward_topic() -> String {
    "products-validated".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            database: DatabaseConfig::default(),
            frontdoor_table: default_frontdoor_table(),
            product_table: default_product_table(),
            sink_table: default_product_table(),
            forward_topic: default_forward_topic(),
            schema_dir: None,
            log: LogConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: ServiceConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.http.validate()?;

        let names = [
            ("frontdoor_table", &self.frontdoor_table),
            ("product_table", &self.product_table),
            ("sink_table", &self.sink_table),
            ("forward_topic", &self.forward_topic),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ServiceConfig::from_json("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.frontdoor_table, "frontdoor");
        assert_eq!(config.sink_table, "products");
        assert_eq!(config.forward_topic, "products-validated");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"http": {{"port": 9090}}, "product_table": "catalog", "log": {{"json": true}}}}"#
        )
        .unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.product_table, "catalog");
        assert!(config.log.json);
    }

    #[test]
    fn test_rejects_empty_names() {
        let err = ServiceConfig::from_json(r#"{"forward_topic": " "}"#).unwrap_err();
        assert!(err.to_string().contains("forward_topic"));
    }

    #[test]
    fn test_rejects_port_zero() {
        assert!(matches!(
            ServiceConfig::from_json(r#"{"http": {"port": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_listener_settings() {
        assert!(ServiceConfig::from_json(r#"{"http": {"host": "shop.local"}}"#).is_err());
        assert!(ServiceConfig::from_json(r#"{"http": {"cors_origins": ["*"]}}"#).is_err());
        assert!(
            ServiceConfig::from_json(r#"{"http": {"host": "::1", "cors_origins": ["https://shop.example.com"]}}"#)
                .is_ok()
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServiceConfig::load(Path::new("/nonexistent/retail-oms.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
