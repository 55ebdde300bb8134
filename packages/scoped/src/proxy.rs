//! A view of a store bound to one namespace.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use scoped_defaults_core_store::{Store, Value};

use crate::diagnostic::Diagnostic;
use crate::{Defaults, Descriptor, Namespace, Primitive, Scope};

/// Typed access scoped to one namespace, mirroring the namespace tree.
///
/// ```rust
/// use scoped_defaults::{Defaults, Descriptor, Namespace, Scope, ScopedDefaults};
/// use scoped_defaults_json_store::InMemoryStore;
///
/// static SETTINGS: Scope = Scope::top_level("settings");
/// static FOO: Scope = Scope::new("foo", &SETTINGS);
/// static BAR: Descriptor<bool> = Descriptor::new("bar", &FOO, || false);
///
/// static FOO_NS: Namespace = Namespace::new(&FOO, &[&BAR], &[]);
/// static SETTINGS_NS: Namespace = Namespace::new(&SETTINGS, &[], &[&FOO_NS]);
///
/// let store = InMemoryStore::new();
/// let settings = ScopedDefaults::new(Defaults::new(&store), &SETTINGS_NS);
/// let foo = settings.child("foo").unwrap();
///
/// foo.set(&BAR, true);
/// assert!(foo.get(&BAR));
///
/// settings.reset();
/// assert!(!foo.get(&BAR));
/// ```
pub struct ScopedDefaults<'a, S: ?Sized> {
    defaults: Defaults<'a, S>,
    namespace: &'static Namespace,
}

impl<'a, S: Store + ?Sized> ScopedDefaults<'a, S> {
    pub fn new(defaults: Defaults<'a, S>, namespace: &'static Namespace) -> Self {
        Self {
            defaults,
            namespace,
        }
    }

    pub fn namespace(&self) -> &'static Namespace {
        self.namespace
    }

    pub fn scope(&self) -> &'static Scope {
        self.namespace.scope()
    }

    /// The unscoped accessor this view delegates to.
    pub fn defaults(&self) -> Defaults<'a, S> {
        self.defaults
    }

    /// The view of a declared child namespace.
    pub fn child(&self, key: &str) -> Option<Self> {
        self.namespace
            .child(key)
            .map(|namespace| Self::new(self.defaults, namespace))
    }

    pub fn get<V: DeserializeOwned>(&self, descriptor: &Descriptor<V>) -> V {
        self.defaults.get(descriptor)
    }

    pub fn get_or<V: DeserializeOwned>(
        &self,
        descriptor: &Descriptor<V>,
        fallback: impl FnOnce() -> V,
    ) -> V {
        self.defaults.get_or(descriptor, fallback)
    }

    pub fn set<V: Serialize + DeserializeOwned>(&self, descriptor: &Descriptor<V>, value: V) {
        self.defaults.set(descriptor, value)
    }

    pub fn get_primitive<V: Primitive>(&self, descriptor: &Descriptor<V>) -> V {
        self.defaults.get_primitive(descriptor)
    }

    pub fn set_primitive<V: Primitive>(&self, descriptor: &Descriptor<V>, value: V) {
        self.defaults.set_primitive(descriptor, value)
    }

    pub fn remove<V>(&self, descriptor: &Descriptor<V>) {
        self.defaults.remove(descriptor)
    }

    /// The effective raw value of every setting in this subtree.
    ///
    /// A setting's entry is what the store holds for it, else its encoded
    /// default. Settings with an absent default and nothing stored are left
    /// out; unencodable defaults are reported and left out.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        let store = self.defaults.store();
        let sink = self.defaults.sink();

        let mut snapshot = BTreeMap::new();
        for descriptor in self.namespace.descriptors() {
            let key_path = descriptor.key_path();
            if let Some(value) = store.get(&key_path) {
                snapshot.insert(key_path, value);
                continue;
            }
            match descriptor.erased_default() {
                Ok(Some(value)) => {
                    snapshot.insert(key_path, value);
                }
                Ok(None) => {}
                Err(source) => sink.report(Diagnostic::Encode { key_path, source }),
            }
        }
        snapshot
    }

    /// Remove every persisted value in this subtree.
    pub fn reset(&self) {
        let store = self.defaults.store();
        let descriptors = self.namespace.descriptors();
        tracing::debug!(
            scope = %self.scope(),
            count = descriptors.len(),
            "resetting settings"
        );
        for descriptor in descriptors {
            store.remove(&descriptor.key_path());
        }
    }
}

impl<S: ?Sized> Clone for ScopedDefaults<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for ScopedDefaults<'_, S> {}
