//! deepObject-style query string flattening.
//!
//! List endpoints take nested filter objects such as
//! `filter[phone_number][contains]=555`. Params structs are serialized with
//! serde and flattened into bracketed key/value pairs:
//!
//! - nested objects become `parent[child]`
//! - arrays of scalars are joined with commas
//! - arrays of objects become `parent[index][child]`
//! - `null` (unset optionals) is dropped

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{Error, Result, ValidationError};

/// Flatten a serializable params struct into query pairs.
///
/// The value must serialize to a JSON object (or `null`, which yields no pairs).
pub fn flatten_query<T: Serialize + ?Sized>(params: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params).map_err(Error::Serialization)?;
    let mut pairs = Vec::new();
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, value) in map {
                flatten_into(&mut pairs, key, value);
            }
        }
        other => {
            return Err(ValidationError::new(format!(
                "query parameters must be an object, got {}",
                kind_of(&other)
            ))
            .into())
        }
    }
    Ok(pairs)
}

fn flatten_into(pairs: &mut Vec<(String, String)>, key: String, value: Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => flatten_object(pairs, &key, map),
        Value::Array(items) => {
            if items.iter().all(is_scalar) {
                let joined: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
                if !joined.is_empty() {
                    pairs.push((key, joined.join(",")));
                }
            } else {
                for (idx, item) in items.into_iter().enumerate() {
                    flatten_into(pairs, format!("{key}[{idx}]"), item);
                }
            }
        }
        scalar => {
            if let Some(s) = scalar_to_string(&scalar) {
                pairs.push((key, s));
            }
        }
    }
}

fn flatten_object(pairs: &mut Vec<(String, String)>, prefix: &str, map: Map<String, Value>) {
    for (child, value) in map {
        flatten_into(pairs, format!("{prefix}[{child}]"), value);
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
