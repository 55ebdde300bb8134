//! Namespaces: enumerable scope trees and factory-default aggregation.

use std::collections::BTreeMap;
use std::fmt;

use scoped_defaults_core_store::{Store, Value};

use crate::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
use crate::{AnyDefault, Scope};

/// A scope together with the settings and child namespaces declared in it.
///
/// ```rust
/// use scoped_defaults::{Descriptor, Namespace, Scope};
///
/// static SETTINGS: Scope = Scope::top_level("settings");
/// static FOO: Scope = Scope::new("foo", &SETTINGS);
///
/// static ANSWER: Descriptor<i64> = Descriptor::new("answer", &SETTINGS, || 42);
/// static BAR: Descriptor<bool> = Descriptor::new("bar", &FOO, || false);
///
/// static FOO_NS: Namespace = Namespace::new(&FOO, &[&BAR], &[]);
/// static SETTINGS_NS: Namespace = Namespace::new(&SETTINGS, &[&ANSWER], &[&FOO_NS]);
///
/// let defaults = SETTINGS_NS.factory_defaults();
/// assert_eq!(defaults.len(), 2);
/// assert!(defaults.contains_key("settings.foo.bar"));
/// ```
pub struct Namespace {
    scope: &'static Scope,
    defaults: &'static [&'static dyn AnyDefault],
    children: &'static [&'static Namespace],
}

impl Namespace {
    /// Declare the settings and child namespaces of `scope`, in order.
    ///
    /// Declaration order is significant: it is the merge order of
    /// [`factory_defaults`](Namespace::factory_defaults).
    pub const fn new(
        scope: &'static Scope,
        defaults: &'static [&'static dyn AnyDefault],
        children: &'static [&'static Namespace],
    ) -> Self {
        Namespace {
            scope,
            defaults,
            children,
        }
    }

    pub fn scope(&self) -> &'static Scope {
        self.scope
    }

    /// Settings declared directly in this namespace.
    pub fn defaults(&self) -> &'static [&'static dyn AnyDefault] {
        self.defaults
    }

    pub fn children(&self) -> &'static [&'static Namespace] {
        self.children
    }

    /// The declared child whose scope has the leaf key `key`.
    pub fn child(&self, key: &str) -> Option<&'static Namespace> {
        self.children
            .iter()
            .copied()
            .find(|child| child.scope.key() == key)
    }

    /// The namespace in this subtree whose scope has the key-path `key_path`.
    pub fn find(&'static self, key_path: &str) -> Option<&'static Namespace> {
        if self.scope.key_path() == key_path {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find(key_path))
    }

    /// Every setting in this subtree, own settings first, then each child
    /// in declaration order.
    pub fn descriptors(&self) -> Vec<&'static dyn AnyDefault> {
        let mut all = Vec::new();
        self.collect_descriptors(&mut all);
        all
    }

    fn collect_descriptors(&self, all: &mut Vec<&'static dyn AnyDefault>) {
        all.extend_from_slice(self.defaults);
        for child in self.children {
            child.collect_descriptors(all);
        }
    }

    /// The flat key-path to value mapping of every default in this subtree.
    ///
    /// Own settings are merged first, then each child's mapping in
    /// declaration order. On a key-path collision the later merge wins, so
    /// a child overrides its parent and a later sibling overrides an earlier
    /// one. Settings whose default is absent are left out.
    ///
    /// Defaults that cannot be encoded are left out and reported as
    /// `tracing` warnings.
    pub fn factory_defaults(&self) -> BTreeMap<String, Value> {
        self.factory_defaults_with(&TracingSink)
    }

    /// Like [`factory_defaults`](Namespace::factory_defaults), reporting
    /// unencodable defaults to `sink`.
    pub fn factory_defaults_with(&self, sink: &dyn DiagnosticSink) -> BTreeMap<String, Value> {
        let mut mapping = BTreeMap::new();

        for descriptor in self.defaults {
            let key_path = descriptor.key_path();
            match descriptor.erased_default() {
                Ok(Some(value)) => {
                    mapping.insert(key_path, value);
                }
                Ok(None) => {}
                Err(source) => sink.report(Diagnostic::Encode { key_path, source }),
            }
        }

        for child in self.children {
            mapping.extend(child.factory_defaults_with(sink));
        }

        mapping
    }

    /// Register this subtree's factory defaults with `store`.
    ///
    /// Values already persisted in the store are unaffected.
    pub fn register<S: Store + ?Sized>(&self, store: &S) {
        self.register_with(store, &TracingSink)
    }

    /// Like [`register`](Namespace::register), reporting unencodable
    /// defaults to `sink`.
    pub fn register_with<S: Store + ?Sized>(&self, store: &S, sink: &dyn DiagnosticSink) {
        let mapping = self.factory_defaults_with(sink);
        tracing::debug!(
            scope = %self.scope,
            count = mapping.len(),
            "registering factory defaults"
        );
        store.register_factory_defaults(mapping);
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("scope", &self.scope.key_path())
            .field("defaults", &self.defaults)
            .field("children", &self.children)
            .finish()
    }
}
