//! Turns failures into caller-facing messages
//!
//! Mismatches are grouped per field in first-seen order and rendered as a
//! single message per field; forbidden fields follow, one message each, in
//! the order they were recorded.

use std::collections::HashMap;

use serde_json::Value;

use super::failure::{Failure, ValidationFailure};
use crate::schema::matcher::{is_null, pretty_type};
use crate::schema::Primitive;

/// Formats failures into the ordered list of error messages.
pub fn format(failures: &[Failure]) -> Vec<String> {
    let mut groups: Vec<(&str, Vec<&ValidationFailure>)> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut forbidden: Vec<&str> = Vec::new();

    for failure in failures {
        match failure {
            Failure::Mismatch(mismatch) => {
                let path = mismatch.field_path.as_str();
                match group_index.get(path) {
                    Some(&idx) => groups[idx].1.push(mismatch),
                    None => {
                        group_index.insert(path, groups.len());
                        groups.push((path, vec![mismatch]));
                    }
                }
            }
            Failure::Forbidden { field } => forbidden.push(field),
        }
    }

    let mut messages: Vec<String> = groups
        .iter()
        .map(|(path, group)| format_group(path, group))
        .collect();
    messages.extend(forbidden.iter().map(|field| format!("Forbidden field {}", field)));
    messages
}

fn format_group(path: &str, group: &[&ValidationFailure]) -> String {
    let actual = group.first().and_then(|f| f.actual.as_ref());
    let nullable = group.iter().any(|f| f.schema_type.accepts_null());

    if is_null(actual) && !nullable {
        return format!("Missing required field \"{}\"", path);
    }

    let mut types: Vec<String> = Vec::new();
    for failure in group {
        if failure.schema_type.accepts_null() {
            continue;
        }
        let pretty = pretty_type(&failure.schema_type);
        if !types.contains(&pretty) {
            types.push(pretty);
        }
    }
    if types.is_empty() {
        types.push(Primitive::Null.name().to_string());
    }

    format!(
        "The field \"{}\" has a value of \"{}\" which is not one of the valid types ({})",
        path,
        display_value(actual),
        types.join(", ")
    )
}

/// Strings render raw, everything else as compact JSON.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeExpr;
    use serde_json::json;

    #[test]
    fn test_missing_required() {
        let failures = vec![Failure::mismatch("id", TypeExpr::string(), None)];
        assert_eq!(format(&failures), vec!["Missing required field \"id\""]);
    }

    #[test]
    fn test_null_for_required_is_missing() {
        let failures = vec![Failure::mismatch("id", TypeExpr::string(), Some(Value::Null))];
        assert_eq!(format(&failures), vec!["Missing required field \"id\""]);
    }

    #[test]
    fn test_candidates_grouped_and_deduplicated() {
        let failures = vec![
            Failure::mismatch("sku", TypeExpr::null(), Some(json!(42))),
            Failure::mismatch("sku", TypeExpr::string(), Some(json!(42))),
            Failure::mismatch("sku", TypeExpr::long(), Some(json!(42))),
            Failure::mismatch("sku", TypeExpr::string(), Some(json!(42))),
        ];
        assert_eq!(
            format(&failures),
            vec!["The field \"sku\" has a value of \"42\" which is not one of the valid types (string, long)"]
        );
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let failures = vec![
            Failure::mismatch("b", TypeExpr::string(), None),
            Failure::forbidden("zzz"),
            Failure::mismatch("a", TypeExpr::boolean(), Some(json!("yes"))),
            Failure::forbidden("aaa"),
        ];
        assert_eq!(
            format(&failures),
            vec![
                "Missing required field \"b\"".to_string(),
                "The field \"a\" has a value of \"yes\" which is not one of the valid types (boolean)".to_string(),
                "Forbidden field zzz".to_string(),
                "Forbidden field aaa".to_string(),
            ]
        );
    }

    #[test]
    fn test_values_render_as_json() {
        let failures = vec![Failure::mismatch(
            "tags",
            TypeExpr::array(TypeExpr::string()),
            Some(json!(["a", 2])),
        )];
        assert_eq!(
            format(&failures),
            vec!["The field \"tags\" has a value of \"[\"a\",2]\" which is not one of the valid types (array of string)"]
        );
    }

    #[test]
    fn test_empty() {
        assert!(format(&[]).is_empty());
    }
}
