//! Types the store represents natively.

use std::collections::BTreeMap;

use scoped_defaults_core_store::{Value, ValueKind};

/// A type with a direct store representation.
///
/// Primitive-mode accessors skip the codec: they check the stored value's
/// representation and convert it directly.
pub trait Primitive: Sized {
    /// Name of the expected representation, used in diagnostics.
    const EXPECTED: &'static str;

    /// Convert a stored value, or `None` if its representation does not match.
    fn from_raw(raw: &Value) -> Option<Self>;

    fn into_raw(self) -> Value;
}

impl Primitive for bool {
    const EXPECTED: &'static str = "bool";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_bool()
    }

    fn into_raw(self) -> Value {
        Value::Bool(self)
    }
}

impl Primitive for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_i64()
    }

    fn into_raw(self) -> Value {
        Value::Integer(self)
    }
}

impl Primitive for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_i64().and_then(|i| i32::try_from(i).ok())
    }

    fn into_raw(self) -> Value {
        Value::Integer(self.into())
    }
}

impl Primitive for u32 {
    const EXPECTED: &'static str = "integer";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_i64().and_then(|i| u32::try_from(i).ok())
    }

    fn into_raw(self) -> Value {
        Value::Integer(self.into())
    }
}

// Numbers are one representation in the store; integers read as floats.
impl Primitive for f64 {
    const EXPECTED: &'static str = "float";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_f64()
    }

    fn into_raw(self) -> Value {
        Value::Float(self)
    }
}

impl Primitive for String {
    const EXPECTED: &'static str = "string";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_str().map(str::to_string)
    }

    fn into_raw(self) -> Value {
        Value::String(self)
    }
}

// The codec has no blob form: `set` stores a `Vec<u8>` as an array of
// byte-valued integers. Those arrays read back here too, but
// `set_primitive` always writes a blob.
impl Primitive for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Bytes(bytes) => Some(bytes.clone()),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_i64().and_then(|i| u8::try_from(i).ok()))
                .collect(),
            _ => None,
        }
    }

    fn into_raw(self) -> Value {
        Value::Bytes(self)
    }
}

impl Primitive for Vec<Value> {
    const EXPECTED: &'static str = "array";

    fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Array(items) => Some(items.clone()),
            _ => None,
        }
    }

    fn into_raw(self) -> Value {
        Value::Array(self)
    }
}

impl Primitive for BTreeMap<String, Value> {
    const EXPECTED: &'static str = "map";

    fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Map(fields) => Some(fields.clone()),
            _ => None,
        }
    }

    fn into_raw(self) -> Value {
        Value::Map(self)
    }
}

impl Primitive for Value {
    const EXPECTED: &'static str = "any";

    fn from_raw(raw: &Value) -> Option<Self> {
        Some(raw.clone())
    }

    fn into_raw(self) -> Value {
        self
    }
}

/// Convert `raw`, reporting the found representation on mismatch.
pub(crate) fn cast<V: Primitive>(raw: &Value) -> Result<V, ValueKind> {
    V::from_raw(raw).ok_or_else(|| raw.kind())
}
