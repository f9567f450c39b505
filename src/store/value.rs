//! Value model for config entries
//!
//! This module defines the tagged value type stored in a [`ValueStore`],
//! the type tags used for type checks, and the [`FromValue`] trait backing
//! the typed getters.
//!
//! [`ValueStore`]: crate::store::ValueStore

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single config value.
///
/// `Null` is the null-marker. Putting it under a top-level key removes the
/// key; inside nested maps and lists it is kept as an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Float(f32),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
    Null,
}

/// Runtime type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Boolean,
    Integer,
    Long,
    Float,
    Map,
    List,
    Null,
}

impl ValueType {
    /// Name used in error messages and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::Boolean => "Boolean",
            ValueType::Integer => "Integer",
            ValueType::Long => "Long",
            ValueType::Float => "Float",
            ValueType::Map => "Map",
            ValueType::List => "List",
            ValueType::Null => "Null",
        }
    }

    /// Parse a type name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" | "str" => Some(ValueType::String),
            "boolean" | "bool" => Some(ValueType::Boolean),
            "integer" | "int" | "i32" => Some(ValueType::Integer),
            "long" | "i64" => Some(ValueType::Long),
            "float" | "f32" => Some(ValueType::Float),
            "map" | "object" => Some(ValueType::Map),
            "list" | "array" => Some(ValueType::List),
            "null" => Some(ValueType::Null),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Map(_) => ValueType::Map,
            Value::List(_) => ValueType::List,
            Value::Null => ValueType::Null,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Exact type check; there is no widening between numeric variants.
    #[inline]
    pub fn is_type(&self, ty: ValueType) -> bool {
        self.value_type() == ty
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Null => f.write_str("null"),
            Value::Map(_) | Value::List(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i32(*i),
            Value::Long(l) => serializer.serialize_i64(*l),
            Value::Float(v) => serializer.serialize_f64(widen_f32(*v)),
            Value::Map(map) => map.serialize(serializer),
            Value::List(list) => list.serialize(serializer),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

/// Widen an `f32` through its shortest decimal form, so `0.1f32` exports
/// as `0.1` rather than `0.10000000149011612`.
pub(crate) fn widen_f32(v: f32) -> f64 {
    v.to_string().parse().unwrap_or_else(|_| f64::from(v))
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(value: HashMap<String, Value>) -> Self {
        Value::Map(value.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Exact-type extraction from a [`Value`]
pub trait FromValue: Sized {
    /// Type name reported when extraction fails
    fn expected() -> &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn expected() -> &'static str {
        "Value"
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    fn expected() -> &'static str {
        ValueType::String.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn expected() -> &'static str {
        ValueType::Boolean.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn expected() -> &'static str {
        ValueType::Integer.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn expected() -> &'static str {
        ValueType::Long.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn expected() -> &'static str {
        ValueType::Float.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for BTreeMap<String, Value> {
    fn expected() -> &'static str {
        ValueType::Map.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Map(map) => Some(map.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<Value> {
    fn expected() -> &'static str {
        ValueType::List.name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(list) => Some(list.clone()),
            _ => None,
        }
    }
}
