//! The Value type - the store's primitive representation.
//!
//! Everything a setting persists ends up as one of these. There is no null:
//! the store cannot hold one, and "no value" is expressed by absence of the
//! key instead.

use std::collections::BTreeMap;
use std::fmt;

/// A primitive value that can be read from or written to a Store.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering (important for comparison and persistence)
/// - Includes `Bytes` for binary blobs
/// - Uses `i64` for integers and `f64` for everything else numeric
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
}

/// The native representation of a [`Value`], used in diagnostics.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    String,
    Bytes,
    Array,
    Map,
}

impl ValueKind {
    /// A short lowercase name for the representation.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// The native representation of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Check if this value is a number (integer or float).
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Look up a field of a map value.
    ///
    /// Returns `None` for missing fields and for non-map values.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(field),
            _ => None,
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;

    #[test]
    fn kind_names() {
        assert_eq!(Value::from(true).kind().name(), "bool");
        assert_eq!(Value::from(42i64).kind().name(), "integer");
        assert_eq!(Value::from(2.5).kind().name(), "float");
        assert_eq!(Value::from("x").kind().name(), "string");
        assert_eq!(Value::from(vec![1u8, 2]).kind().name(), "bytes");
        assert_eq!(Value::array().kind().name(), "array");
        assert_eq!(Value::map().kind().to_string(), "map");
    }

    #[test]
    fn integers_widen_to_floats() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(3.5).as_i64(), None);
        assert!(Value::Integer(3).is_number());
        assert!(!Value::from("3").is_number());
    }

    #[test]
    fn map_field_lookup() {
        let value = Value::Map(btree! {
            "name".to_string() => Value::from("Alice"),
            "age".to_string() => Value::from(30i64),
        });

        assert_eq!(value.get("name").and_then(Value::as_str), Some("Alice"));
        assert_eq!(value.get("age").and_then(Value::as_i64), Some(30));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::from("not a map").get("name"), None);
    }

    #[test]
    fn bytes_are_distinct_from_arrays() {
        let bytes = Value::from(vec![1u8, 2, 3]);
        let array = Value::from(vec![Value::from(1i64), Value::from(2i64)]);

        assert_eq!(bytes.as_bytes(), Some(&[1u8, 2, 3][..]));
        assert!(!bytes.is_array());
        assert!(array.is_array());
        assert_eq!(array.as_bytes(), None);
    }
}
