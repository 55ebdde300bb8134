//! Scoped defaults: typed, namespaced settings over a flat key-value store.
//!
//! This layer sits on top of the core store and serde layers. It adds:
//! - `Scope`: Namespace nodes that derive dotted key-paths
//! - `Descriptor`: A typed setting with a lazily evaluated default
//! - `Defaults`: Fail-soft typed get/set/remove against any `Store`
//! - `Namespace`: Enumerable scope trees and factory-default registration
//! - `ScopedDefaults`: A view bound to one namespace
//! - `Diagnostic`/`DiagnosticSink`: Where degraded reads and skipped writes go
//!
//! # Example
//!
//! ```rust
//! use scoped_defaults::{Defaults, Descriptor, Namespace, Scope};
//! use scoped_defaults_json_store::InMemoryStore;
//!
//! static SETTINGS: Scope = Scope::top_level("settings");
//! static FOO: Scope = Scope::new("foo", &SETTINGS);
//!
//! static ANSWER: Descriptor<i64> = Descriptor::new("answer", &SETTINGS, || 42);
//! static BAR: Descriptor<bool> = Descriptor::new("bar", &FOO, || false);
//!
//! static FOO_NS: Namespace = Namespace::new(&FOO, &[&BAR], &[]);
//! static SETTINGS_NS: Namespace = Namespace::new(&SETTINGS, &[&ANSWER], &[&FOO_NS]);
//!
//! let store = InMemoryStore::new();
//! SETTINGS_NS.register(&store);
//!
//! let defaults = Defaults::new(&store);
//! assert_eq!(defaults.get(&ANSWER), 42);
//!
//! defaults.set(&BAR, true);
//! assert!(defaults.get(&BAR));
//!
//! defaults.remove(&BAR);
//! assert!(!defaults.get(&BAR));
//! ```

mod accessor;
mod descriptor;
mod diagnostic;
mod namespace;
mod primitive;
mod proxy;
mod scope;

pub use accessor::Defaults;
pub use descriptor::{AnyDefault, Descriptor};
pub use diagnostic::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use namespace::Namespace;
pub use primitive::Primitive;
pub use proxy::ScopedDefaults;
pub use scope::{Scope, SEPARATOR};

// Re-export lower layers for convenience
pub use scoped_defaults_core_store::{Store, Value, ValueKind};
pub use scoped_defaults_serde_store::{decode, encode, DecodeError, EncodeError};
