//! Record schemas for retail OMS events
//!
//! A schema is an ordered list of named fields, each carrying a type
//! expression (primitive, nullable, array or union). Schemas are built once
//! at startup, either from the declarative builder or from Avro schema
//! documents, and are read-only afterwards.

mod builder;
mod errors;
mod loader;
pub mod matcher;
mod types;

pub use builder::{
    frontdoor_schema, make_type, oms_retail_schema, product_schema, ColumnSpec, FieldKind,
    SchemaMode, OMS_NAMESPACE,
};
pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaRegistry;
pub use types::{Primitive, Schema, SchemaField, TypeExpr};
