//! Core store layer for scoped defaults.
//!
//! This layer defines the contract with the flat key-value store underneath
//! every typed setting:
//! - `Value`: The primitive representation the store can hold
//! - `ValueKind`: The name of a value's native representation
//! - `Store`: Flat `get`/`set`/`remove` plus bulk factory-default registration
//!
//! Keys at this layer are plain dotted key-paths (`"settings.foo.bar"`).
//! Namespacing, typing and fallback live in the `scoped-defaults` crate.
//!
//! # Example
//!
//! ```rust
//! use scoped_defaults_core_store::{Store, Value};
//!
//! fn read_answer(store: &dyn Store) -> Option<i64> {
//!     match store.get("settings.answer")? {
//!         Value::Integer(i) => Some(i),
//!         _ => None,
//!     }
//! }
//! ```

mod traits;
mod value;

pub use traits::Store;
pub use value::{Value, ValueKind};
