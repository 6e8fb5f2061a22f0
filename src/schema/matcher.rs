//! Type matching between declared type expressions and untyped values
//!
//! Numeric policy:
//! - `long` accepts integers that fit in i64
//! - `int` accepts integers that fit in i32
//! - `double` accepts any number, integers included
//! - `float` accepts any finite number within f32 magnitude
//! - fractional numbers never satisfy `int`/`long`, even `1.0`
//! - booleans are never numbers
//!
//! `None` stands for an absent field and behaves like JSON null.

use serde_json::Value;

use super::types::{Primitive, TypeExpr};

/// Returns true when `value` satisfies `type_expr`.
pub fn matches(type_expr: &TypeExpr, value: Option<&Value>) -> bool {
    match type_expr {
        TypeExpr::Primitive(p) => primitive_matches(*p, value),
        TypeExpr::Nullable(inner) => is_null(value) || matches(inner, value),
        TypeExpr::Array(item) => match value {
            Some(Value::Array(elements)) => elements.iter().all(|e| matches(item, Some(e))),
            _ => false,
        },
        TypeExpr::Union(members) => members.iter().any(|m| matches(m, value)),
    }
}

fn primitive_matches(primitive: Primitive, value: Option<&Value>) -> bool {
    let value = match value {
        None | Some(Value::Null) => return primitive == Primitive::Null,
        Some(value) => value,
    };

    match (primitive, value) {
        (Primitive::Boolean, Value::Bool(_)) => true,
        (Primitive::String, Value::String(_)) => true,
        (Primitive::Long, Value::Number(n)) => n.is_i64(),
        (Primitive::Int, Value::Number(n)) => n
            .as_i64()
            .map_or(false, |i| i32::try_from(i).is_ok()),
        (Primitive::Double, Value::Number(_)) => true,
        (Primitive::Float, Value::Number(n)) => n
            .as_f64()
            .map_or(false, |f| f.is_finite() && f.abs() <= f64::from(f32::MAX)),
        _ => false,
    }
}

/// Whether the value is absent or JSON null
pub fn is_null(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Flattens a field type into the candidate types reported on mismatch.
///
/// `Nullable(T)` contributes `null` followed by the candidates of `T`;
/// unions contribute each member in declaration order.
pub fn candidates(type_expr: &TypeExpr) -> Vec<TypeExpr> {
    match type_expr {
        TypeExpr::Nullable(inner) => {
            let mut out = vec![TypeExpr::null()];
            out.extend(candidates(inner));
            out
        }
        TypeExpr::Union(members) => members.iter().flat_map(candidates).collect(),
        other => vec![other.clone()],
    }
}

/// Human-readable rendering of a type for error messages.
///
/// Nullable wrappers render as their inner type; `null` only shows up when
/// it is the sole acceptable kind.
pub fn pretty_type(type_expr: &TypeExpr) -> String {
    match type_expr {
        TypeExpr::Primitive(p) => p.name().to_string(),
        TypeExpr::Array(item) => format!("array of {}", pretty_type(item)),
        TypeExpr::Nullable(inner) => pretty_type(inner),
        TypeExpr::Union(members) => {
            let named: Vec<String> = members
                .iter()
                .filter(|m| **m != TypeExpr::null())
                .map(pretty_type)
                .collect();
            if named.is_empty() {
                Primitive::Null.name().to_string()
            } else {
                named.join(", ")
            }
        }
    }
}
