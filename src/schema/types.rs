//! Record schema model
//!
//! Supported type expressions:
//! - primitives: null, boolean, int, long, float, double, string
//! - nullable: `["null", T]` in Avro spelling
//! - array: `{"type": "array", "items": T}`
//! - union: any other Avro union of the above
//!
//! A [`Schema`] is checked once at construction and never mutated afterwards,
//! so it can be shared across requests behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::matcher;

/// Avro primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl Primitive {
    /// Returns the Avro type name
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
        }
    }

    /// Looks up a primitive by its Avro type name
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "null" => Primitive::Null,
            "boolean" => Primitive::Boolean,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "string" => Primitive::String,
            _ => return None,
        };
        Some(primitive)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared shape of one field
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A single primitive
    Primitive(Primitive),
    /// Absent/null, or the inner type
    Nullable(Box<TypeExpr>),
    /// Sequence whose every element matches the item type
    Array(Box<TypeExpr>),
    /// At least one member matches
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn null() -> Self {
        TypeExpr::Primitive(Primitive::Null)
    }

    pub fn boolean() -> Self {
        TypeExpr::Primitive(Primitive::Boolean)
    }

    pub fn int() -> Self {
        TypeExpr::Primitive(Primitive::Int)
    }

    pub fn long() -> Self {
        TypeExpr::Primitive(Primitive::Long)
    }

    pub fn float() -> Self {
        TypeExpr::Primitive(Primitive::Float)
    }

    pub fn double() -> Self {
        TypeExpr::Primitive(Primitive::Double)
    }

    pub fn string() -> Self {
        TypeExpr::Primitive(Primitive::String)
    }

    pub fn nullable(inner: TypeExpr) -> Self {
        TypeExpr::Nullable(Box::new(inner))
    }

    pub fn array(item: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(item))
    }

    pub fn union(members: Vec<TypeExpr>) -> Self {
        TypeExpr::Union(members)
    }

    /// Whether null/absent satisfies this type at the top level
    pub fn accepts_null(&self) -> bool {
        match self {
            TypeExpr::Primitive(p) => *p == Primitive::Null,
            TypeExpr::Nullable(_) => true,
            TypeExpr::Array(_) => false,
            TypeExpr::Union(members) => members.iter().any(TypeExpr::accepts_null),
        }
    }

    /// Parses an Avro type declaration.
    ///
    /// `field` only names the owner in error messages. The two-branch union
    /// `["null", T]` becomes [`TypeExpr::Nullable`]; `[T, "null"]` stays a
    /// union so its branch order survives rendering and encoding.
    pub fn from_avro(field: &str, decl: &Value) -> SchemaResult<Self> {
        let parsed = match decl {
            Value::String(name) => Primitive::from_name(name)
                .map(TypeExpr::Primitive)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?,
            Value::Array(branches) => {
                let mut members = Vec::with_capacity(branches.len());
                for branch in branches {
                    if branch.is_array() {
                        return Err(SchemaError::malformed_type(
                            field,
                            "unions may not contain unions",
                        ));
                    }
                    members.push(Self::from_avro(field, branch)?);
                }
                Self::from_members(members)
            }
            Value::Object(obj) => match obj.get("type") {
                Some(Value::String(kind)) if kind == "array" => {
                    let items = obj.get("items").ok_or_else(|| {
                        SchemaError::malformed_type(field, "array requires 'items'")
                    })?;
                    TypeExpr::array(Self::from_avro(field, items)?)
                }
                Some(Value::String(kind)) => match Primitive::from_name(kind) {
                    Some(p) => TypeExpr::Primitive(p),
                    None => {
                        return Err(SchemaError::malformed_type(
                            field,
                            format!("unsupported type '{}'", kind),
                        ))
                    }
                },
                _ => {
                    return Err(SchemaError::malformed_type(
                        field,
                        "type object requires a string 'type'",
                    ))
                }
            },
            other => {
                return Err(SchemaError::malformed_type(
                    field,
                    format!("unexpected type declaration {}", other),
                ))
            }
        };
        parsed.check(field)?;
        Ok(parsed)
    }

    fn from_members(mut members: Vec<TypeExpr>) -> TypeExpr {
        if members.len() == 2 && members[0] == TypeExpr::null() && members[1] != TypeExpr::null() {
            return TypeExpr::nullable(members.remove(1));
        }
        TypeExpr::Union(members)
    }

    /// Whether `default` is a legal Avro default for this type.
    ///
    /// A union default must match its first branch, so `Nullable` only takes
    /// `null`.
    pub fn accepts_default(&self, default: &Value) -> bool {
        match self {
            TypeExpr::Nullable(_) => default.is_null(),
            TypeExpr::Union(members) => members
                .first()
                .map_or(false, |first| matcher::matches(first, Some(default))),
            other => matcher::matches(other, Some(default)),
        }
    }

    /// Renders the Avro declaration for this type
    pub fn to_avro(&self) -> Value {
        match self {
            TypeExpr::Primitive(p) => Value::String(p.name().to_string()),
            TypeExpr::Nullable(inner) => json!(["null", inner.to_avro()]),
            TypeExpr::Array(item) => json!({ "type": "array", "items": item.to_avro() }),
            TypeExpr::Union(members) => {
                Value::Array(members.iter().map(TypeExpr::to_avro).collect())
            }
        }
    }

    /// Checks structural well-formedness
    pub fn check(&self, field: &str) -> SchemaResult<()> {
        match self {
            TypeExpr::Primitive(_) => Ok(()),
            TypeExpr::Nullable(inner) => match inner.as_ref() {
                TypeExpr::Nullable(_) => Err(SchemaError::malformed_type(
                    field,
                    "nullable may not wrap a nullable",
                )),
                TypeExpr::Primitive(Primitive::Null) => Err(SchemaError::malformed_type(
                    field,
                    "nullable may not wrap null",
                )),
                inner => inner.check(field),
            },
            TypeExpr::Array(item) => item.check(field),
            TypeExpr::Union(members) => {
                if members.is_empty() {
                    return Err(SchemaError::malformed_type(field, "union has no members"));
                }
                for (i, member) in members.iter().enumerate() {
                    if matches!(member, TypeExpr::Union(_) | TypeExpr::Nullable(_)) {
                        return Err(SchemaError::malformed_type(
                            field,
                            "unions may not contain unions",
                        ));
                    }
                    if members[..i].contains(member) {
                        return Err(SchemaError::malformed_type(
                            field,
                            format!("duplicate union branch '{}'", matcher::pretty_type(member)),
                        ));
                    }
                    member.check(field)?;
                }
                Ok(())
            }
        }
    }
}

/// One declared field
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared type
    pub type_expr: TypeExpr,
    /// Value used when the datum omits the field
    pub default: Option<Value>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, type_expr: TypeExpr) -> Self {
        Self {
            name: name.into(),
            type_expr,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Immutable record schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    namespace: String,
    name: String,
    fields: Vec<SchemaField>,
    positions: HashMap<String, usize>,
}

fn avro_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name pattern"))
}

fn check_name(name: &str) -> SchemaResult<()> {
    if avro_name_re().is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidName(name.to_string()))
    }
}

fn check_namespace(namespace: &str) -> SchemaResult<()> {
    if namespace.is_empty() {
        return Ok(());
    }
    if namespace.split('.').all(|part| avro_name_re().is_match(part)) {
        Ok(())
    } else {
        Err(SchemaError::InvalidName(namespace.to_string()))
    }
}

impl Schema {
    /// Builds a schema, rejecting duplicate names, malformed types and
    /// defaults that do not satisfy their own field type.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<SchemaField>,
    ) -> SchemaResult<Self> {
        let namespace = namespace.into();
        let name = name.into();
        check_namespace(&namespace)?;
        check_name(&name)?;

        let mut positions = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            check_name(&field.name)?;
            if positions.insert(field.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            field.type_expr.check(&field.name)?;
            if let Some(default) = &field.default {
                if !field.type_expr.accepts_default(default) {
                    return Err(SchemaError::InvalidDefault(field.name.clone()));
                }
            }
        }

        Ok(Self {
            namespace,
            name,
            fields,
            positions,
        })
    }

    /// Parses an Avro record schema document
    pub fn from_avro_json(doc: &Value) -> SchemaResult<Self> {
        let obj = doc
            .as_object()
            .ok_or_else(|| SchemaError::malformed("<schema>", "schema must be a JSON object"))?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::malformed("<schema>", "missing record 'name'"))?;
        if obj.get("type").and_then(Value::as_str) != Some("record") {
            return Err(SchemaError::malformed(name, "type must be 'record'"));
        }
        let namespace = match obj.get("namespace") {
            None | Some(Value::Null) => "",
            Some(Value::String(ns)) => ns.as_str(),
            Some(_) => return Err(SchemaError::malformed(name, "namespace must be a string")),
        };
        let decls = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::malformed(name, "missing 'fields' array"))?;

        let mut fields = Vec::with_capacity(decls.len());
        for decl in decls {
            let field_name = decl
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::malformed(name, "field without a 'name'"))?;
            let type_decl = decl.get("type").ok_or_else(|| {
                SchemaError::malformed_type(field_name, "field without a 'type'")
            })?;
            let mut field = SchemaField::new(field_name, TypeExpr::from_avro(field_name, type_decl)?);
            field.default = decl.get("default").cloned();
            fields.push(field);
        }

        Self::new(namespace, name, fields)
    }

    /// Parses an Avro record schema from text
    pub fn from_avro_str(source_name: &str, text: &str) -> SchemaResult<Self> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|e| SchemaError::malformed(source_name, e.to_string()))?;
        Self::from_avro_json(&doc)
    }

    /// Renders the Avro record schema document
    pub fn to_avro_json(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|field| {
                let mut decl = Map::new();
                decl.insert("name".into(), Value::String(field.name.clone()));
                decl.insert("type".into(), field.type_expr.to_avro());
                if let Some(default) = &field.default {
                    decl.insert("default".into(), default.clone());
                }
                Value::Object(decl)
            })
            .collect();

        let mut doc = Map::new();
        if !self.namespace.is_empty() {
            doc.insert("namespace".into(), Value::String(self.namespace.clone()));
        }
        doc.insert("type".into(), Value::String("record".into()));
        doc.insert("name".into(), Value::String(self.name.clone()));
        doc.insert("fields".into(), Value::Array(fields));
        Value::Object(doc)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace.name`, or just the name when there is no namespace
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.positions.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn field_names(&self) -> HashSet<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Field names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
