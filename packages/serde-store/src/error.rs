//! Codec error types.

use thiserror::Error;

/// A value could not be converted to the store's primitive representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The serializer rejected the value.
    #[error("serialization of {type_name} failed: {message}")]
    Serialize {
        type_name: &'static str,
        message: String,
    },

    /// An unsigned integer does not fit the store's signed 64-bit integers.
    #[error("integer {value} is out of range for the store")]
    IntegerOutOfRange { value: String },

    /// NaN and the infinities have no stored form.
    #[error("non-finite float {value} has no primitive representation")]
    NonFiniteFloat { value: String },

    /// The encoded value does not decode back into its own type.
    #[error("{type_name} does not survive a round trip: {message}")]
    Lossy {
        type_name: &'static str,
        message: String,
    },

    /// A null appeared where it cannot be dropped (inside a sequence).
    #[error("null element at index {index} has no primitive representation")]
    NullElement { index: usize },

    /// The value as a whole encodes to nothing.
    #[error("{type_name} value encodes to nothing and cannot be stored")]
    Unrepresentable { type_name: &'static str },
}

impl EncodeError {
    pub fn serialize<T: ?Sized>(error: impl std::fmt::Display) -> Self {
        EncodeError::Serialize {
            type_name: std::any::type_name::<T>(),
            message: error.to_string(),
        }
    }

    pub fn lossy<T: ?Sized>(error: DecodeError) -> Self {
        EncodeError::Lossy {
            type_name: std::any::type_name::<T>(),
            message: error.message,
        }
    }

    pub fn unrepresentable<T: ?Sized>() -> Self {
        EncodeError::Unrepresentable {
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// A stored value could not be reconstructed into the expected type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {expected}: {message}")]
pub struct DecodeError {
    /// Name of the type decoding was attempted into.
    pub expected: &'static str,
    pub message: String,
}

impl DecodeError {
    pub fn new<T: ?Sized>(error: impl std::fmt::Display) -> Self {
        DecodeError {
            expected: std::any::type_name::<T>(),
            message: error.to_string(),
        }
    }
}
