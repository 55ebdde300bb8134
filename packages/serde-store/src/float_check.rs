//! A serializer that only looks for non-finite floats.
//!
//! `serde_json` turns NaN and the infinities into null without complaint,
//! and a null inside a record is indistinguishable from an absent optional
//! field once it reaches the store. Walking the value first catches them
//! while the float is still a float.

use serde::ser::{self, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CheckError {
    #[error("non-finite float {0}")]
    NonFinite(f64),

    #[error("{0}")]
    Custom(String),
}

impl ser::Error for CheckError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        CheckError::Custom(msg.to_string())
    }
}

/// Walk `value`, failing on the first NaN or infinity.
pub(crate) fn check_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), CheckError> {
    value.serialize(FloatCheck)
}

struct FloatCheck;

fn float(f: f64) -> Result<(), CheckError> {
    if f.is_finite() {
        Ok(())
    } else {
        Err(CheckError::NonFinite(f))
    }
}

impl ser::Serializer for FloatCheck {
    type Ok = ();
    type Error = CheckError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), CheckError> {
        float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), CheckError> {
        float(v)
    }

    fn serialize_char(self, _: char) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), CheckError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), CheckError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), CheckError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), CheckError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, CheckError> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, CheckError> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, CheckError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, CheckError> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, CheckError> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, CheckError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, CheckError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}

impl ser::SerializeTuple for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}

impl ser::SerializeMap for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), CheckError> {
        key.serialize(FloatCheck)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}

impl ser::SerializeStruct for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FloatCheck {
    type Ok = ();
    type Error = CheckError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), CheckError> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), CheckError> {
        Ok(())
    }
}
