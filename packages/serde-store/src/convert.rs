//! Conversions between Value and serde_json::Value.
//!
//! `serde_json::Value` is the intermediate document the codec serializes
//! into. It is richer than the store in one way (it has null) and poorer in
//! another (it has no byte blobs), so both directions need a policy.

use scoped_defaults_core_store::Value;

use crate::EncodeError;

/// Convert our Value to serde_json::Value.
///
/// Byte blobs become sequences of byte-valued numbers, which is the shape
/// serde expects when deserializing `Vec<u8>`. Non-finite floats have no
/// JSON form and become null.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Bytes(b) => serde_json::Value::Array(
            b.into_iter()
                .map(|byte| serde_json::Value::Number(byte.into()))
                .collect(),
        ),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert serde_json::Value to our Value.
///
/// Returns `Ok(None)` for a top-level null. Null map entries are dropped,
/// so an absent optional field stays absent. Null sequence elements cannot
/// be dropped without shifting indices and are rejected.
pub fn json_to_value(json: serde_json::Value) -> Result<Option<Value>, EncodeError> {
    let value = match json {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_u64() {
                return Err(EncodeError::IntegerOutOfRange {
                    value: n.to_string(),
                });
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                return Err(EncodeError::IntegerOutOfRange {
                    value: n.to_string(),
                });
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            let mut items = Vec::with_capacity(arr.len());
            for (index, item) in arr.into_iter().enumerate() {
                match json_to_value(item)? {
                    Some(value) => items.push(value),
                    None => return Err(EncodeError::NullElement { index }),
                }
            }
            Value::Array(items)
        }
        serde_json::Value::Object(map) => {
            let mut fields = std::collections::BTreeMap::new();
            for (key, item) in map {
                if let Some(value) = json_to_value(item)? {
                    fields.insert(key, value);
                }
            }
            Value::Map(fields)
        }
    };
    Ok(Some(value))
}
