//! Declarative table-schema builder
//!
//! Tables are declared once as a list of [`ColumnSpec`]s and turned into
//! mode-specific record schemas: a column can be required in one mode and
//! omitted entirely in another.

use super::errors::SchemaResult;
use super::types::{Schema, SchemaField, TypeExpr};

/// Namespace shared by all retail OMS records
pub const OMS_NAMESPACE: &str = "google.retail.oms";

/// Column kinds understood by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int64,
    Bool,
    /// Stored as an RFC 3339 string
    Timestamp,
    StringArray,
    Int64Array,
    Float64Array,
}

impl FieldKind {
    /// The non-null type for this kind
    pub fn type_expr(&self) -> TypeExpr {
        match self {
            FieldKind::String | FieldKind::Timestamp => TypeExpr::string(),
            FieldKind::Int64 => TypeExpr::long(),
            FieldKind::Bool => TypeExpr::boolean(),
            FieldKind::StringArray => TypeExpr::array(TypeExpr::string()),
            FieldKind::Int64Array => TypeExpr::array(TypeExpr::long()),
            FieldKind::Float64Array => TypeExpr::array(TypeExpr::double()),
        }
    }
}

/// Required columns get the bare type, optional ones are nullable.
pub fn make_type(kind: FieldKind, required: bool) -> TypeExpr {
    if required {
        kind.type_expr()
    } else {
        TypeExpr::nullable(kind.type_expr())
    }
}

/// Which audience a schema variant is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    /// Records as stored, including server-assigned columns
    #[default]
    Backend,
    /// Records as submitted by storefront clients
    Frontend,
}

/// One declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub kind: FieldKind,
    pub name: &'static str,
    pub required: bool,
    /// Leave the column out of the built schema
    pub ignore: bool,
}

impl ColumnSpec {
    pub fn optional(kind: FieldKind, name: &'static str) -> Self {
        Self {
            kind,
            name,
            required: false,
            ignore: false,
        }
    }

    pub fn required(kind: FieldKind, name: &'static str) -> Self {
        Self::required_if(kind, name, true)
    }

    pub fn required_if(kind: FieldKind, name: &'static str, required: bool) -> Self {
        Self {
            kind,
            name,
            required,
            ignore: false,
        }
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    fn to_field(&self) -> SchemaField {
        SchemaField::new(self.name, make_type(self.kind, self.required))
    }
}

/// Builds a record in the OMS namespace, skipping ignored columns.
pub fn oms_retail_schema(name: &str, columns: &[ColumnSpec]) -> SchemaResult<Schema> {
    let fields = columns
        .iter()
        .filter(|c| !c.ignore)
        .map(ColumnSpec::to_field)
        .collect();
    Schema::new(OMS_NAMESPACE, name, fields)
}

/// Product catalogue record.
///
/// Frontend submissions may not carry `id`, `features`, `memory` or
/// `commit_timestamp`, and must carry the descriptive columns.
pub fn product_schema(mode: SchemaMode) -> SchemaResult<Schema> {
    use FieldKind::*;

    let fe = mode == SchemaMode::Frontend;
    let columns = [
        ColumnSpec::required(String, "id").with_ignore(fe),
        ColumnSpec::required_if(String, "sku", fe),
        ColumnSpec::required_if(String, "title", fe),
        ColumnSpec::required_if(String, "name", fe),
        ColumnSpec::required_if(String, "description", fe),
        ColumnSpec::required_if(String, "pdp_link", fe),
        ColumnSpec::optional(String, "main_image_link"),
        ColumnSpec::optional(StringArray, "additional_images"),
        ColumnSpec::optional(Int64, "gtin"),
        ColumnSpec::optional(String, "mpn"),
        ColumnSpec::optional(Bool, "identifier_exists"),
        ColumnSpec::optional(Float64Array, "features").with_ignore(fe),
        ColumnSpec::optional(Float64Array, "memory").with_ignore(fe),
        ColumnSpec::optional(StringArray, "filters"),
        ColumnSpec::required_if(StringArray, "item_groups", fe),
        ColumnSpec::optional(Timestamp, "created_at"),
        ColumnSpec::optional(Timestamp, "expires_at"),
        ColumnSpec::optional(Timestamp, "last_updated"),
        ColumnSpec::required(Timestamp, "commit_timestamp").with_ignore(fe),
    ];
    oms_retail_schema("product", &columns)
}

/// Front-door event record: the raw event info as a JSON string.
pub fn frontdoor_schema() -> SchemaResult<Schema> {
    oms_retail_schema(
        "frontdoor",
        &[ColumnSpec::required(FieldKind::String, "event_info_json_string")],
    )
}
