//! In-memory store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use scoped_defaults_core_store::{Store, Value};

use crate::layers::Layers;

/// A store that keeps persisted values and registered defaults in memory.
///
/// # Example
///
/// ```rust
/// use scoped_defaults_json_store::InMemoryStore;
/// use scoped_defaults_core_store::{Store, Value};
/// use std::collections::BTreeMap;
///
/// let store = InMemoryStore::new();
///
/// let mut defaults = BTreeMap::new();
/// defaults.insert("settings.answer".to_string(), Value::Integer(42));
/// store.register_factory_defaults(defaults);
/// assert_eq!(store.get("settings.answer"), Some(Value::Integer(42)));
///
/// store.set("settings.answer", Value::Integer(7));
/// assert_eq!(store.get("settings.answer"), Some(Value::Integer(7)));
///
/// store.remove("settings.answer");
/// assert_eq!(store.get("settings.answer"), Some(Value::Integer(42)));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    layers: Mutex<Layers>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial persisted values.
    pub fn with_data(persisted: BTreeMap<String, Value>) -> Self {
        Self {
            layers: Mutex::new(Layers::with_persisted(persisted)),
        }
    }

    /// Snapshot of the persisted layer.
    pub fn persisted(&self) -> BTreeMap<String, Value> {
        self.lock().persisted.clone()
    }

    /// Snapshot of the registered factory defaults.
    pub fn registered(&self) -> BTreeMap<String, Value> {
        self.lock().registered.clone()
    }

    /// Whether a value was explicitly persisted at `key`.
    pub fn is_persisted(&self, key: &str) -> bool {
        self.lock().persisted.contains_key(key)
    }

    /// Drop every persisted value. Registered defaults are kept.
    pub fn clear(&self) {
        self.lock().persisted.clear();
    }

    // A panic while holding the lock cannot leave `Layers` half-updated, so
    // a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Layers> {
        self.layers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for InMemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.lock().set(key, value);
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn register_factory_defaults(&self, defaults: BTreeMap<String, Value>) {
        self.lock().register(defaults);
    }
}
