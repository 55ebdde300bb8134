//! Serde Integration for scoped defaults
//!
//! This layer converts arbitrary serde types to and from the store's
//! primitive `Value` representation. It adds:
//! - `encode`/`decode`: The codec used for every structured setting
//! - `encode_checked`: Encoding that refuses values which would not read back
//! - `EncodeError`/`DecodeError`: Why a value could not cross the boundary
//! - `Value <-> serde_json::Value` conversions
//!
//! # Example
//!
//! ```rust
//! use scoped_defaults_serde_store::{decode, encode, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Window {
//!     width: u32,
//!     height: u32,
//! }
//!
//! let window = Window { width: 800, height: 600 };
//! let raw = encode(&window).unwrap().unwrap();
//! assert!(raw.is_map());
//!
//! let recovered: Window = decode(&raw).unwrap();
//! assert_eq!(recovered, window);
//!
//! // Bare scalars are fine too
//! assert_eq!(encode(&7u8).unwrap(), Some(Value::Integer(7)));
//! ```

mod codec;
mod convert;
mod error;
mod float_check;

pub use codec::{decode, encode, encode_checked};
pub use convert::{json_to_value, value_to_json};
pub use error::{DecodeError, EncodeError};

// Re-export core types for convenience
pub use scoped_defaults_core_store::{Store, Value, ValueKind};
