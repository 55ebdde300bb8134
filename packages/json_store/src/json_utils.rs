//! On-disk JSON form of store values.
//!
//! JSON has no byte blobs, so `Value::Bytes` is written as a single-key
//! object `{"$bytes": "<base64>"}`. A map that would read back as a tag
//! (its only key is `$bytes` or `$map`) is escaped as `{"$map": {...}}`.
//! Everything else maps one to one. Nulls never appear in values written by
//! this crate; when reading a document written by something else, null
//! entries are skipped.

use std::collections::BTreeMap;

use base64::Engine;
use serde_json::value::Value as JsonValue;

use scoped_defaults_core_store::Value;

/// Object key marking an encoded byte blob.
pub const BYTES_TAG: &str = "$bytes";

/// Object key wrapping a map that would otherwise look like a tag.
pub const MAP_TAG: &str = "$map";

/// Convert a store value to its on-disk JSON form.
pub fn to_disk(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Bytes(b) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(b);
            let mut tagged = serde_json::Map::with_capacity(1);
            tagged.insert(BYTES_TAG.to_string(), JsonValue::String(encoded));
            JsonValue::Object(tagged)
        }
        Value::Array(arr) => JsonValue::Array(arr.iter().map(to_disk).collect()),
        Value::Map(map) => {
            let object = JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), to_disk(v)))
                    .collect(),
            );
            if looks_like_tag(map) {
                let mut escaped = serde_json::Map::with_capacity(1);
                escaped.insert(MAP_TAG.to_string(), object);
                JsonValue::Object(escaped)
            } else {
                object
            }
        }
    }
}

fn looks_like_tag(map: &BTreeMap<String, Value>) -> bool {
    map.len() == 1 && (map.contains_key(BYTES_TAG) || map.contains_key(MAP_TAG))
}

/// Convert an on-disk JSON value back to a store value.
///
/// Returns `Ok(None)` for null. Fails on numbers the store cannot hold and
/// on a `$bytes` tag whose payload is not valid base64.
pub fn from_disk(json: &JsonValue) -> Result<Option<Value>, String> {
    let value = match json {
        JsonValue::Null => return Ok(None),
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(f)) if !n.is_u64() => Value::Float(f),
            _ => return Err(format!("number {} is out of range", n)),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(arr) => {
            let mut items = Vec::with_capacity(arr.len());
            for item in arr {
                if let Some(value) = from_disk(item)? {
                    items.push(value);
                }
            }
            Value::Array(items)
        }
        JsonValue::Object(map) => match map.get(MAP_TAG) {
            Some(JsonValue::Object(escaped)) if map.len() == 1 => fields_from_disk(escaped)?,
            _ => match decode_bytes_tag(map)? {
                Some(bytes) => Value::Bytes(bytes),
                None => fields_from_disk(map)?,
            },
        },
    };
    Ok(Some(value))
}

fn fields_from_disk(map: &serde_json::Map<String, JsonValue>) -> Result<Value, String> {
    let mut fields = BTreeMap::new();
    for (key, item) in map {
        if let Some(value) = from_disk(item)? {
            fields.insert(key.clone(), value);
        }
    }
    Ok(Value::Map(fields))
}

fn decode_bytes_tag(map: &serde_json::Map<String, JsonValue>) -> Result<Option<Vec<u8>>, String> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some(JsonValue::String(encoded)) = map.get(BYTES_TAG) else {
        return Ok(None);
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map(Some)
        .map_err(|e| format!("invalid {} payload: {}", BYTES_TAG, e))
}
