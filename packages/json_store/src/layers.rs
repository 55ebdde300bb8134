//! The two-layer lookup shared by every bundled store.

use std::collections::BTreeMap;

use scoped_defaults_core_store::Value;

/// Persisted values over registered factory defaults.
#[derive(Clone, Debug, Default)]
pub(crate) struct Layers {
    pub(crate) persisted: BTreeMap<String, Value>,
    pub(crate) registered: BTreeMap<String, Value>,
}

impl Layers {
    pub(crate) fn with_persisted(persisted: BTreeMap<String, Value>) -> Self {
        Self {
            persisted,
            registered: BTreeMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.persisted
            .get(key)
            .or_else(|| self.registered.get(key))
    }

    pub(crate) fn set(&mut self, key: &str, value: Value) {
        self.persisted.insert(key.to_string(), value);
    }

    /// Returns whether a persisted value was actually removed.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.persisted.remove(key).is_some()
    }

    pub(crate) fn register(&mut self, defaults: BTreeMap<String, Value>) {
        self.registered.extend(defaults);
    }
}
