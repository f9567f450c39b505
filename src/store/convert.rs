//! Structural conversion between JSON trees and config values

use super::value::{widen_f32, Value};
use crate::error::{KvconfError, Result};
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

impl Value {
    /// Convert a parsed JSON tree into a value.
    ///
    /// `path` names the location of `json` and ends up in the error when a
    /// number cannot be represented by any of the supported numeric types.
    pub fn from_json(path: &str, json: &JsonValue) -> Result<Value> {
        Ok(match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Number(n) => number_to_value(path, n)?,
            JsonValue::Array(items) => Value::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Value::from_json(&format!("{path}[{i}]"), item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            JsonValue::Object(object) => Value::Map(
                object
                    .iter()
                    .map(|(key, item)| {
                        Value::from_json(&format!("{path}.{key}"), item).map(|v| (key.clone(), v))
                    })
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Check that the value, including everything nested in it, can be
    /// exported to JSON and read back. Only non-finite floats fail.
    pub fn validate(&self, path: &str) -> Result<()> {
        match self {
            Value::Float(v) if !v.is_finite() => {
                Err(KvconfError::invalid_value(path, "non-finite float"))
            }
            Value::List(list) => list
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| item.validate(&format!("{path}[{i}]"))),
            Value::Map(map) => map
                .iter()
                .try_for_each(|(key, item)| item.validate(&format!("{path}.{key}"))),
            _ => Ok(()),
        }
    }

    /// Convert back into a JSON tree.
    ///
    /// Stores reject non-finite floats; one built by hand exports as `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::from(*i),
            Value::Long(l) => JsonValue::from(*l),
            Value::Float(v) => Number::from_f64(widen_f32(*v))
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::List(list) => JsonValue::Array(list.iter().map(Value::to_json).collect()),
            Value::Null => JsonValue::Null,
        }
    }
}

fn number_to_value(path: &str, n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(match i32::try_from(i) {
            Ok(small) => Value::Integer(small),
            Err(_) => Value::Long(i),
        });
    }

    if n.is_u64() {
        return Err(KvconfError::invalid_value(
            path,
            format!("integer {n} exceeds the 64-bit signed range"),
        ));
    }

    match n.as_f64().map(|f| f as f32) {
        Some(f) if f.is_finite() => Ok(Value::Float(f)),
        _ => Err(KvconfError::invalid_value(
            path,
            format!("number {n} does not fit in a 32-bit float"),
        )),
    }
}

/// Convert every member of a JSON object, keeping document order.
///
/// Nothing is returned unless every member converts.
pub fn convert_object(object: &JsonMap<String, JsonValue>) -> Result<IndexMap<String, Value>> {
    object
        .iter()
        .map(|(key, json)| Value::from_json(key, json).map(|value| (key.clone(), value)))
        .collect()
}

/// Convert a JSON tree whose root must be an object.
pub fn convert_structured(tree: &JsonValue) -> Result<IndexMap<String, Value>> {
    match tree {
        JsonValue::Object(object) => convert_object(object),
        other => Err(KvconfError::invalid_value(
            "<root>",
            format!("expected a JSON object, found {}", json_kind(other)),
        )),
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
