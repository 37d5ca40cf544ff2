//! Dot-path writes into JSON trees
//!
//! `content.title.line1` addresses a leaf through nested mappings. Missing
//! levels (absent or null) are created as empty mappings; anything else in the
//! way refuses the write instead of overwriting it.

use serde_json::{Map, Value};
use thiserror::Error;

/// Why a path write was not applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("'{segment}' is not a mapping (found {found})")]
    NotAMapping { segment: String, found: &'static str },

    #[error("'{0}' cannot be changed")]
    Immutable(String),

    #[error("{0}")]
    Schema(String),
}

/// Set `value` at `dot_path` inside `root`
pub fn set_by_path(root: &mut Value, dot_path: &str, value: Value) -> Result<(), PathError> {
    if dot_path.is_empty() {
        return Err(PathError::Empty);
    }

    let segments: Vec<&str> = dot_path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PathError::EmptySegment(dot_path.to_string()));
    }

    let (leaf, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Err(PathError::Empty),
    };

    let mut node = root;
    let mut walked = String::new();
    for segment in parents {
        let map = as_mapping(node, &walked)?;
        node = map.entry(segment.to_string()).or_insert(Value::Null);

        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);
    }

    let map = as_mapping(node, &walked)?;
    map.insert(leaf.to_string(), value);
    Ok(())
}

fn as_mapping<'a>(node: &'a mut Value, walked: &str) -> Result<&'a mut Map<String, Value>, PathError> {
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => Ok(map),
        other => Err(PathError::NotAMapping {
            segment: if walked.is_empty() { "<root>".to_string() } else { walked.to_string() },
            found: kind_name(other),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

/// Whether `encoded` reproduces `edited`. Every key of `edited` must be
/// present in `encoded`, even when its value is null. A key only `encoded`
/// has must be null. Numbers compare by value (`5` == `5.0`).
pub fn tree_matches(encoded: &Value, edited: &Value) -> bool {
    match (encoded, edited) {
        (Value::Object(left), Value::Object(right)) => {
            right
                .iter()
                .all(|(key, value)| left.get(key).is_some_and(|kept| tree_matches(kept, value)))
                && left
                    .iter()
                    .all(|(key, value)| right.contains_key(key) || value.is_null())
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| tree_matches(l, r))
        }
        (Value::Number(left), Value::Number(right)) => left == right || left.as_f64() == right.as_f64(),
        _ => encoded == edited,
    }
}
