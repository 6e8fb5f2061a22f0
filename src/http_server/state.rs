//! Shared handler state
//!
//! Built once at startup and shared by every route through `Arc<AppState>`.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::errors::ServerResult;
use super::frontdoor_routes::FRONTDOOR_COLUMNS;
use crate::config::ServiceConfig;
use crate::messaging::{InMemoryPublisher, Publisher};
use crate::schema::{frontdoor_schema, product_schema, Schema, SchemaMode, SchemaRegistry};
use crate::storage::{Database, InMemoryDatabase, TableDef};

/// Registry name overriding the built-in product schema
pub const PRODUCT_SCHEMA_NAME: &str = "product";
/// Registry name overriding the built-in frontdoor schema
pub const FRONTDOOR_SCHEMA_NAME: &str = "frontdoor";

/// State shared across handlers
pub struct AppState {
    pub config: ServiceConfig,
    pub database: Arc<dyn Database>,
    pub publisher: Arc<dyn Publisher>,
    pub frontdoor_schema: Arc<Schema>,
    pub product_schema: Arc<Schema>,
}

impl AppState {
    /// Resolves schemas from `registry`, falling back to the built-in ones.
    pub fn new(
        config: ServiceConfig,
        database: Arc<dyn Database>,
        publisher: Arc<dyn Publisher>,
        registry: &SchemaRegistry,
    ) -> ServerResult<Self> {
        let frontdoor_schema = match registry.get(FRONTDOOR_SCHEMA_NAME) {
            Some(schema) => schema,
            None => Arc::new(frontdoor_schema()?),
        };
        let product_schema = match registry.get(PRODUCT_SCHEMA_NAME) {
            Some(schema) => schema,
            None => Arc::new(product_schema(SchemaMode::Backend)?),
        };

        Ok(Self {
            config,
            database,
            publisher,
            frontdoor_schema,
            product_schema,
        })
    }

    /// Loads the configured schema directory, if any.
    pub fn load_registry(config: &ServiceConfig) -> ServerResult<SchemaRegistry> {
        match &config.schema_dir {
            Some(dir) => Ok(SchemaRegistry::load_dir(Path::new(dir))?),
            None => Ok(SchemaRegistry::new()),
        }
    }
}

/// Handles to the in-process collaborators behind an [`AppState`]
pub struct InMemoryBackends {
    pub database: Arc<InMemoryDatabase>,
    pub publisher: Arc<InMemoryPublisher>,
}

/// Builds state backed by an in-memory database and publisher.
///
/// The frontdoor, product and sink tables are created empty.
pub fn in_memory_state(config: ServiceConfig) -> ServerResult<(Arc<AppState>, InMemoryBackends)> {
    let registry = AppState::load_registry(&config)?;
    let database = Arc::new(InMemoryDatabase::new());
    let publisher = Arc::new(InMemoryPublisher::new());

    let state = AppState::new(config, database.clone(), publisher.clone(), &registry)?;

    database.create_table(TableDef::new(
        state.config.frontdoor_table.clone(),
        FRONTDOOR_COLUMNS,
    ))?;
    let product_columns = state.product_schema.column_names();
    database.create_table(TableDef::new(
        state.config.product_table.clone(),
        product_columns.iter().copied(),
    ))?;
    if state.config.sink_table != state.config.product_table
        && state.config.sink_table != state.config.frontdoor_table
    {
        database.create_table(TableDef::new(
            state.config.sink_table.clone(),
            product_columns.iter().copied(),
        ))?;
    }

    info!(
        project = %state.config.database.project,
        instance = %state.config.database.instance,
        database = %state.config.database.database,
        schemas = registry.len(),
        "in-memory backends ready"
    );

    Ok((Arc::new(state), InMemoryBackends { database, publisher }))
}
