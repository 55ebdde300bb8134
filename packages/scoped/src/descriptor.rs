//! Descriptors: typed settings bound to a scope.

use std::fmt;

use serde::Serialize;

use scoped_defaults_core_store::Value;
use scoped_defaults_serde_store::{encode, EncodeError};

use crate::scope::{validate_key, Scope};

/// A typed setting: a leaf key in a scope plus a deferred default.
///
/// The default is a producer, not a value. It is called on every read miss
/// and during factory-default aggregation, and never otherwise, so defaults
/// that are expensive or depend on the environment are evaluated lazily.
///
/// ```rust
/// use scoped_defaults::{Descriptor, Scope};
///
/// static SETTINGS: Scope = Scope::top_level("settings");
/// static ANSWER: Descriptor<i64> = Descriptor::new("answer", &SETTINGS, || 42);
///
/// assert_eq!(ANSWER.key_path(), "settings.answer");
/// assert_eq!(ANSWER.default_value(), 42);
/// ```
pub struct Descriptor<V> {
    key: &'static str,
    scope: &'static Scope,
    default: fn() -> V,
}

impl<V> Descriptor<V> {
    /// Declare a setting in `scope`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty or contains `.`. In a `static` declaration
    /// this is a compile-time error.
    pub const fn new(key: &'static str, scope: &'static Scope, default: fn() -> V) -> Self {
        validate_key(key);
        Descriptor {
            key,
            scope,
            default,
        }
    }

    /// Declare a setting in the root scope; its key-path is its key.
    pub const fn unscoped(key: &'static str, default: fn() -> V) -> Self {
        Self::new(key, &Scope::ROOT, default)
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn scope(&self) -> &'static Scope {
        self.scope
    }

    /// The full dotted key-path this setting is stored under.
    pub fn key_path(&self) -> String {
        self.scope.key_path_of(self.key)
    }

    /// Evaluate the default producer.
    pub fn default_value(&self) -> V {
        (self.default)()
    }

    /// Whether two descriptors share a leaf key.
    ///
    /// This ignores the owning scope: `settings.foo.enabled` and
    /// `settings.bar.enabled` compare equal. `PartialEq` is defined through
    /// this method.
    pub fn same_key(&self, other: &Self) -> bool {
        self.key == other.key
    }

    /// Whether two descriptors resolve to the same key-path.
    pub fn same_key_path(&self, other: &Self) -> bool {
        self.key_path() == other.key_path()
    }
}

impl<V> Clone for Descriptor<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Descriptor<V> {}

impl<V> PartialEq for Descriptor<V> {
    fn eq(&self, other: &Self) -> bool {
        self.same_key(other)
    }
}

impl<V> Eq for Descriptor<V> {}

impl<V> fmt::Debug for Descriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("key_path", &self.key_path())
            .field("type", &std::any::type_name::<V>())
            .finish()
    }
}

/// The type-erased view of a descriptor.
///
/// Aggregation needs descriptors of every value type in one list; this is
/// the only place their value type is forgotten.
pub trait AnyDefault: Send + Sync {
    /// The leaf key.
    fn key(&self) -> &'static str;

    /// The full dotted key-path.
    fn key_path(&self) -> String;

    /// Evaluate the default and encode it for the store.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The encoded default.
    /// * `Ok(None)` - The default is absent; the setting opts out of factory registration.
    /// * `Err(EncodeError)` - The default cannot be represented in the store.
    fn erased_default(&self) -> Result<Option<Value>, EncodeError>;
}

impl<V: Serialize> AnyDefault for Descriptor<V> {
    fn key(&self) -> &'static str {
        self.key
    }

    fn key_path(&self) -> String {
        Descriptor::key_path(self)
    }

    fn erased_default(&self) -> Result<Option<Value>, EncodeError> {
        encode(&self.default_value())
    }
}

impl fmt::Debug for dyn AnyDefault + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyDefault").field(&self.key_path()).finish()
    }
}
