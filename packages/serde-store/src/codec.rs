//! The settings codec.
//!
//! Serializers that produce a record-rooted document cannot emit a bare
//! scalar or sequence at the top level. Every value is therefore wrapped as
//! the single `contents` field of a synthetic [`Container`] record before
//! serialization, and that field is pulled back out of the resulting
//! document. Decoding runs the same trick in reverse: the raw value is
//! placed under `contents` and the whole container is deserialized.
//!
//! The wrap is what lets `true`, `42` or `vec!["a", "b"]` be stored under a
//! key-path exactly like a struct would be.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use scoped_defaults_core_store::Value;

use crate::convert::{json_to_value, value_to_json};
use crate::float_check::{check_finite, CheckError};
use crate::{DecodeError, EncodeError};

/// Name of the single field of the synthetic container.
const CONTENTS: &str = "contents";

#[derive(Serialize)]
struct Container<'a, T: ?Sized> {
    contents: &'a T,
}

#[derive(Deserialize)]
struct OwnedContainer<T> {
    contents: T,
}

/// Encode a value into the store's primitive representation.
///
/// # Returns
///
/// * `Ok(Some(value))` - The raw value to hand to the store.
/// * `Ok(None)` - The value encodes to nothing (e.g. `None`).
/// * `Err(EncodeError)` - The value has no primitive representation.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Option<Value>, EncodeError> {
    check_finite(value).map_err(|error| match error {
        CheckError::NonFinite(f) => EncodeError::NonFiniteFloat {
            value: f.to_string(),
        },
        CheckError::Custom(message) => EncodeError::serialize::<T>(message),
    })?;

    let document = serde_json::to_value(Container { contents: value })
        .map_err(EncodeError::serialize::<T>)?;

    let serde_json::Value::Object(mut fields) = document else {
        return Err(EncodeError::serialize::<T>("container did not serialize to a record"));
    };

    match fields.remove(CONTENTS) {
        Some(json) => json_to_value(json),
        None => Ok(None),
    }
}

/// Encode a value and make sure it decodes back into `T`.
///
/// Nulls nested in records are dropped during encoding, which is what
/// keeps `None` fields absent. A unit field is serialized as null too and
/// would silently disappear; this catches that before anything is stored.
pub fn encode_checked<T>(value: &T) -> Result<Option<Value>, EncodeError>
where
    T: Serialize + DeserializeOwned,
{
    let Some(raw) = encode(value)? else {
        return Ok(None);
    };
    decode::<T>(&raw).map_err(EncodeError::lossy::<T>)?;
    Ok(Some(raw))
}

/// Decode a raw store value into `T`.
pub fn decode<T: DeserializeOwned>(raw: &Value) -> Result<T, DecodeError> {
    let mut fields = serde_json::Map::with_capacity(1);
    fields.insert(CONTENTS.to_string(), value_to_json(raw.clone()));

    let container: OwnedContainer<T> =
        serde_json::from_value(serde_json::Value::Object(fields)).map_err(DecodeError::new::<T>)?;
    Ok(container.contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Inner {
        value: i32,
        label: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Outer {
        inner: Inner,
        items: Vec<String>,
        ratio: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Theme {
        Light,
        Dark,
        Custom { accent: String },
    }

    fn roundtrip<T>(value: T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let raw = encode(&value).unwrap().expect("value should be present");
        let recovered: T = decode(&raw).unwrap();
        assert_eq!(recovered, value);
    }

    #[test]
    fn bare_scalars_are_unwrapped() {
        assert_eq!(encode(&true).unwrap(), Some(Value::Bool(true)));
        assert_eq!(encode(&42i32).unwrap(), Some(Value::Integer(42)));
        assert_eq!(encode(&1.5f64).unwrap(), Some(Value::Float(1.5)));
        assert_eq!(encode("hello").unwrap(), Some(Value::from("hello")));
    }

    #[test]
    fn bare_sequences_are_unwrapped() {
        let raw = encode(&vec!["a", "b"]).unwrap().unwrap();
        assert_eq!(
            raw,
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
        assert!(raw.get(CONTENTS).is_none());
    }

    #[test]
    fn records_keep_their_fields() {
        let raw = encode(&Inner {
            value: 7,
            label: Some("seven".to_string()),
        })
        .unwrap()
        .unwrap();

        assert_eq!(
            raw,
            Value::Map(btree! {
                "value".to_string() => Value::Integer(7),
                "label".to_string() => Value::from("seven"),
            })
        );
    }

    #[test]
    fn roundtrip_scalars() {
        roundtrip(true);
        roundtrip(-17i64);
        roundtrip(65_535u16);
        roundtrip(0.25f64);
        roundtrip("a string".to_string());
        roundtrip('x');
    }

    #[test]
    fn roundtrip_sequences_and_maps() {
        roundtrip(vec![1, 2, 3]);
        roundtrip(Vec::<String>::new());
        roundtrip(vec![vec![true], vec![false, true]]);

        let mut map = HashMap::new();
        map.insert("a".to_string(), 1u8);
        map.insert("b".to_string(), 2u8);
        roundtrip(map);

        roundtrip(BTreeMap::<String, Vec<f64>>::new());
    }

    #[test]
    fn roundtrip_nested_records() {
        roundtrip(Outer {
            inner: Inner {
                value: 99,
                label: None,
            },
            items: vec!["a".to_string(), "b".to_string()],
            ratio: 0.5,
        });
    }

    #[test]
    fn roundtrip_enums_and_options() {
        roundtrip(Theme::Dark);
        roundtrip(Theme::Custom {
            accent: "#ff0000".to_string(),
        });
        roundtrip(Some(3));
        roundtrip((1, "two".to_string()));
    }

    #[test]
    fn byte_blobs_decode_into_byte_vectors() {
        let raw = Value::Bytes(vec![0, 1, 254, 255]);
        let recovered: Vec<u8> = decode(&raw).unwrap();
        assert_eq!(recovered, vec![0, 1, 254, 255]);
    }

    #[test]
    fn absent_values_encode_to_nothing() {
        assert_eq!(encode(&None::<i32>).unwrap(), None);
        assert_eq!(encode(&()).unwrap(), None);
    }

    #[test]
    fn unsupported_values_fail_to_encode() {
        assert!(matches!(
            encode(&u64::MAX),
            Err(EncodeError::IntegerOutOfRange { .. })
        ));
        assert_eq!(
            encode(&vec![Some(1), None]),
            Err(EncodeError::NullElement { index: 1 })
        );

        let mut tuple_keys = HashMap::new();
        tuple_keys.insert((1, 2), "pair");
        assert!(matches!(
            encode(&tuple_keys),
            Err(EncodeError::Serialize { .. })
        ));
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Gain {
        label: String,
        ratio: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Marker {
        tag: String,
        unit: (),
    }

    #[test]
    fn non_finite_floats_fail_to_encode() {
        assert!(matches!(
            encode(&f64::NAN),
            Err(EncodeError::NonFiniteFloat { .. })
        ));
        let gain = Gain {
            label: "nan".to_string(),
            ratio: f64::INFINITY,
        };
        assert_eq!(
            encode(&gain),
            Err(EncodeError::NonFiniteFloat {
                value: "inf".to_string()
            })
        );
        assert!(matches!(
            encode(&Some(f32::NAN)),
            Err(EncodeError::NonFiniteFloat { .. })
        ));
    }

    #[test]
    fn checked_encoding_rejects_lossy_records() {
        let marker = Marker {
            tag: "x".to_string(),
            unit: (),
        };
        // Plain encoding drops the unit field without complaint.
        assert_eq!(
            encode(&marker).unwrap(),
            Some(Value::Map(btree! {
                "tag".to_string() => Value::from("x"),
            }))
        );
        assert!(matches!(
            encode_checked(&marker),
            Err(EncodeError::Lossy { .. })
        ));
    }

    #[test]
    fn checked_encoding_passes_faithful_values() {
        let raw = encode_checked(&Inner {
            value: 1,
            label: None,
        })
        .unwrap();
        assert_eq!(
            raw,
            Some(Value::Map(btree! {
                "value".to_string() => Value::Integer(1),
            }))
        );
        assert_eq!(encode_checked(&None::<u8>).unwrap(), None);
    }

    #[test]
    fn mismatched_shapes_fail_to_decode() {
        let result: Result<bool, _> = decode(&Value::from("yes"));
        let error = result.unwrap_err();
        assert_eq!(error.expected, "bool");

        let result: Result<Outer, _> = decode(&Value::Integer(1));
        assert!(result.is_err());

        let result: Result<u8, _> = decode(&Value::Integer(300));
        assert!(result.is_err());
    }
}
