//! Schema registry loaded at startup
//!
//! Schema documents live in a directory as `<record>.avsc` (or `.json`),
//! one Avro record schema per file. Any malformed file is fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Record schemas keyed by record name
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every schema file in `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> SchemaResult<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            let is_schema = path
                .extension()
                .map_or(false, |ext| ext == "avsc" || ext == "json");
            if is_schema {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            let schema = Self::load_file(&path)?;
            debug!(schema = %schema.full_name(), path = %path.display(), "loaded schema");
            registry.register(schema)?;
        }
        info!(dir = %dir.display(), count = registry.len(), "schema registry loaded");
        Ok(registry)
    }

    fn load_file(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;
        Schema::from_avro_str(&path.display().to_string(), &content)
    }

    /// Registers a schema under its record name; names are write-once.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        let name = schema.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::AlreadyRegistered(name));
        }
        let schema = Arc::new(schema);
        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{frontdoor_schema, product_schema, SchemaMode};
    use tempfile::TempDir;

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(frontdoor_schema().unwrap()).unwrap();

        let schema = registry.get("frontdoor").unwrap();
        assert_eq!(schema.name(), "frontdoor");
        assert!(registry.get("product").is_none());
    }

    #[test]
    fn test_names_are_write_once() {
        let mut registry = SchemaRegistry::new();
        registry.register(frontdoor_schema().unwrap()).unwrap();
        let err = registry.register(frontdoor_schema().unwrap()).unwrap_err();
        assert_eq!(err, SchemaError::AlreadyRegistered("frontdoor".into()));
    }

    #[test]
    fn test_load_dir() {
        let tmp = TempDir::new().unwrap();
        let product = product_schema(SchemaMode::Backend).unwrap();
        fs::write(
            tmp.path().join("product.avsc"),
            serde_json::to_string_pretty(&product.to_avro_json()).unwrap(),
        )
        .unwrap();
        fs::write(tmp.path().join("README.md"), "not a schema").unwrap();

        let registry = SchemaRegistry::load_dir(tmp.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(*registry.get("product").unwrap(), product);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.avsc"), r#"{"type": "record"}"#).unwrap();
        assert!(SchemaRegistry::load_dir(tmp.path()).is_err());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(SchemaRegistry::load_dir(&missing).is_err());
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let registry = SchemaRegistry::load_dir(tmp.path()).unwrap();
        assert!(registry.is_empty());
    }
}
