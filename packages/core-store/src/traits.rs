//! Core trait: Store.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Value;

/// A flat, process-wide key-value store.
///
/// Keys are full dotted key-paths. Implementations are expected to be
/// internally synchronised: every method takes `&self` and may be called
/// from any number of threads at once.
///
/// Store operations do not fail from the caller's point of view. A store
/// that can fail underneath (disk, network) must degrade on its own and
/// surface failures through its own channel.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `&dyn Store` or `Box<dyn Store>`.
pub trait Store: Send + Sync {
    /// Look up the value at a key-path.
    ///
    /// # Returns
    ///
    /// * `None` - Nothing is stored and no factory default is registered.
    /// * `Some(value)` - The persisted value, else the registered factory default.
    fn get(&self, key: &str) -> Option<Value>;

    /// Persist a value at a key-path, replacing any previous value.
    fn set(&self, key: &str, value: Value);

    /// Remove the persisted value at a key-path.
    ///
    /// Removing a key that holds nothing is a no-op.
    fn remove(&self, key: &str);

    /// Register fallback values for many key-paths at once.
    ///
    /// Registered values are only visible for key-paths that have no
    /// persisted value; they never overwrite one.
    fn register_factory_defaults(&self, defaults: BTreeMap<String, Value>);
}

// Blanket implementations for references and smart pointers

impl<T: Store + ?Sized> Store for &T {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn register_factory_defaults(&self, defaults: BTreeMap<String, Value>) {
        (**self).register_factory_defaults(defaults)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn get(&self, key: &str) -> Option<Value> {
        self.as_ref().get(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.as_ref().set(key, value)
    }

    fn remove(&self, key: &str) {
        self.as_ref().remove(key)
    }

    fn register_factory_defaults(&self, defaults: BTreeMap<String, Value>) {
        self.as_ref().register_factory_defaults(defaults)
    }
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn get(&self, key: &str) -> Option<Value> {
        self.as_ref().get(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.as_ref().set(key, value)
    }

    fn remove(&self, key: &str) {
        self.as_ref().remove(key)
    }

    fn register_factory_defaults(&self, defaults: BTreeMap<String, Value>) {
        self.as_ref().register_factory_defaults(defaults)
    }
}
