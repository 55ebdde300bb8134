//! Typed reads and writes against a store.

use serde::de::DeserializeOwned;
use serde::Serialize;

use scoped_defaults_core_store::Store;
use scoped_defaults_serde_store::{decode, encode_checked, EncodeError};

use crate::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
use crate::primitive::{cast, Primitive};
use crate::Descriptor;

/// Typed access to a store through descriptors.
///
/// No method returns an error. Reads fall back to the descriptor's default
/// (or a caller-supplied fallback) when nothing usable is stored; writes
/// that cannot be encoded are skipped. Every fallback caused by bad data and
/// every skipped write reports exactly one [`Diagnostic`]; a plain miss
/// reports nothing.
///
/// Two modes are available:
/// - `get`/`set` run every value through the codec and work for any serde type.
/// - `get_primitive`/`set_primitive` store [`Primitive`] values directly and
///   only check the stored representation.
///
/// ```rust
/// use scoped_defaults::{Defaults, Descriptor, Scope};
/// use scoped_defaults_json_store::InMemoryStore;
///
/// static SETTINGS: Scope = Scope::top_level("settings");
/// static RECENT: Descriptor<Vec<String>> = Descriptor::new("recent", &SETTINGS, Vec::new);
///
/// let store = InMemoryStore::new();
/// let defaults = Defaults::new(&store);
///
/// assert!(defaults.get(&RECENT).is_empty());
/// defaults.set(&RECENT, vec!["a.txt".to_string()]);
/// assert_eq!(defaults.get(&RECENT), vec!["a.txt".to_string()]);
/// ```
pub struct Defaults<'a, S: ?Sized> {
    store: &'a S,
    sink: &'a dyn DiagnosticSink,
}

impl<'a, S: Store + ?Sized> Defaults<'a, S> {
    /// Access `store`, reporting diagnostics as `tracing` warnings.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            sink: &TracingSink,
        }
    }

    /// Access `store`, reporting diagnostics to `sink`.
    pub fn with_sink(store: &'a S, sink: &'a dyn DiagnosticSink) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn sink(&self) -> &'a dyn DiagnosticSink {
        self.sink
    }

    /// Read a setting through the codec, falling back to its default.
    pub fn get<V: DeserializeOwned>(&self, descriptor: &Descriptor<V>) -> V {
        self.get_or(descriptor, || descriptor.default_value())
    }

    /// Read a setting through the codec, falling back to `fallback`.
    pub fn get_or<V: DeserializeOwned>(
        &self,
        descriptor: &Descriptor<V>,
        fallback: impl FnOnce() -> V,
    ) -> V {
        let key_path = descriptor.key_path();
        let Some(raw) = self.store.get(&key_path) else {
            return fallback();
        };

        match decode(&raw) {
            Ok(value) => value,
            Err(source) => {
                self.sink.report(Diagnostic::Decode { key_path, source });
                fallback()
            }
        }
    }

    /// Write a setting through the codec.
    ///
    /// If `value` cannot be encoded, or would not decode back into `V`,
    /// nothing is written and whatever was stored before stays in place.
    pub fn set<V: Serialize + DeserializeOwned>(&self, descriptor: &Descriptor<V>, value: V) {
        let key_path = descriptor.key_path();
        match encode_checked(&value) {
            Ok(Some(raw)) => self.store.set(&key_path, raw),
            Ok(None) => self.sink.report(Diagnostic::Encode {
                key_path,
                source: EncodeError::unrepresentable::<V>(),
            }),
            Err(source) => self.sink.report(Diagnostic::Encode { key_path, source }),
        }
    }

    /// Read a natively represented setting, falling back to its default.
    pub fn get_primitive<V: Primitive>(&self, descriptor: &Descriptor<V>) -> V {
        self.get_primitive_or(descriptor, || descriptor.default_value())
    }

    /// Read a natively represented setting, falling back to `fallback`.
    pub fn get_primitive_or<V: Primitive>(
        &self,
        descriptor: &Descriptor<V>,
        fallback: impl FnOnce() -> V,
    ) -> V {
        let key_path = descriptor.key_path();
        let Some(raw) = self.store.get(&key_path) else {
            return fallback();
        };

        match cast::<V>(&raw) {
            Ok(value) => value,
            Err(found) => {
                self.sink.report(Diagnostic::TypeMismatch {
                    key_path,
                    expected: V::EXPECTED,
                    found,
                });
                fallback()
            }
        }
    }

    /// Write a natively represented setting as is.
    pub fn set_primitive<V: Primitive>(&self, descriptor: &Descriptor<V>, value: V) {
        self.store.set(&descriptor.key_path(), value.into_raw());
    }

    /// Remove the persisted value of a setting.
    ///
    /// Reads afterwards see the registered factory default, if any, else the
    /// descriptor default. Removing an unset setting does nothing.
    pub fn remove<V>(&self, descriptor: &Descriptor<V>) {
        self.store.remove(&descriptor.key_path());
    }

    /// Whether the store holds anything (persisted or registered) for a setting.
    pub fn contains<V>(&self, descriptor: &Descriptor<V>) -> bool {
        self.store.get(&descriptor.key_path()).is_some()
    }
}

impl<S: ?Sized> Clone for Defaults<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Defaults<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingSink, Scope};
    use scoped_defaults_core_store::{Value, ValueKind};
    use scoped_defaults_json_store::InMemoryStore;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Window {
        width: u32,
        height: u32,
        title: Option<String>,
    }

    static APP: Scope = Scope::top_level("app");
    static WINDOW: Descriptor<Window> = Descriptor::new("window", &APP, || Window {
        width: 800,
        height: 600,
        title: None,
    });
    static VOLUME: Descriptor<f64> = Descriptor::new("volume", &APP, || 0.5);
    static NAME: Descriptor<String> = Descriptor::new("name", &APP, || "anon".to_string());
    static LIMIT: Descriptor<u64> = Descriptor::new("limit", &APP, || 10);
    static MAYBE: Descriptor<Option<i32>> = Descriptor::new("maybe", &APP, || Some(1));

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Gain {
        label: String,
        ratio: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Marker {
        tag: String,
        unit: (),
    }

    static BLOB: Descriptor<Vec<u8>> = Descriptor::new("blob", &APP, Vec::new);

    static GAIN: Descriptor<Gain> = Descriptor::new("gain", &APP, || Gain {
        label: "unity".to_string(),
        ratio: 1.0,
    });
    static MARKER: Descriptor<Marker> = Descriptor::new("marker", &APP, || Marker {
        tag: "none".to_string(),
        unit: (),
    });

    static MISS_CALLS: AtomicUsize = AtomicUsize::new(0);
    static COUNTED: Descriptor<i64> = Descriptor::new("counted", &APP, || {
        MISS_CALLS.fetch_add(1, Ordering::SeqCst);
        3
    });

    fn fixture() -> (InMemoryStore, RecordingSink) {
        (InMemoryStore::new(), RecordingSink::new())
    }

    #[test]
    fn miss_returns_default_without_diagnostic() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        assert_eq!(defaults.get(&WINDOW), WINDOW.default_value());
        assert_eq!(defaults.get_primitive(&VOLUME), 0.5);
        assert!(!defaults.contains(&WINDOW));
        assert!(sink.is_empty());
    }

    #[test]
    fn default_is_evaluated_once_per_miss_and_never_on_hit() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        let before = MISS_CALLS.load(Ordering::SeqCst);
        assert_eq!(defaults.get(&COUNTED), 3);
        assert_eq!(MISS_CALLS.load(Ordering::SeqCst), before + 1);

        defaults.set(&COUNTED, 9);
        assert_eq!(defaults.get(&COUNTED), 9);
        assert_eq!(MISS_CALLS.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn codec_write_then_read() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        let window = Window {
            width: 1024,
            height: 768,
            title: Some("Main".to_string()),
        };
        defaults.set(&WINDOW, window.clone());

        assert_eq!(defaults.get(&WINDOW), window);
        assert!(store.get("app.window").unwrap().is_map());
        assert!(defaults.contains(&WINDOW));
        assert!(sink.is_empty());
    }

    #[test]
    fn undecodable_value_falls_back_with_one_diagnostic() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);
        store.set("app.window", Value::from("not a window"));

        assert_eq!(defaults.get(&WINDOW), WINDOW.default_value());

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert!(matches!(
            &records[0],
            Diagnostic::Decode { key_path, .. } if key_path == "app.window"
        ));
    }

    #[test]
    fn get_or_uses_caller_fallback() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        assert_eq!(defaults.get_or(&NAME, || "guest".to_string()), "guest");
        store.set("app.name", Value::Integer(5));
        assert_eq!(defaults.get_or(&NAME, || "guest".to_string()), "guest");
        assert_eq!(sink.len(), 1);

        defaults.set(&NAME, "zoe".to_string());
        assert_eq!(defaults.get_or(&NAME, || "guest".to_string()), "zoe");
    }

    #[test]
    fn failed_encode_keeps_previous_value() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        // Nothing stored yet: the failed write leaves the default visible
        defaults.set(&LIMIT, u64::MAX);
        assert_eq!(defaults.get(&LIMIT), 10);
        assert!(!defaults.contains(&LIMIT));

        defaults.set(&LIMIT, 20);
        defaults.set(&LIMIT, u64::MAX);
        assert_eq!(defaults.get(&LIMIT), 20);

        let records = sink.take();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|d| matches!(d, Diagnostic::Encode { key_path, .. } if key_path == "app.limit")));
    }

    #[test]
    fn absent_value_is_not_written() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        defaults.set(&MAYBE, Some(5));
        assert_eq!(defaults.get(&MAYBE), Some(5));

        defaults.set(&MAYBE, None);
        assert_eq!(defaults.get(&MAYBE), Some(5));
        assert!(matches!(
            sink.take().as_slice(),
            [Diagnostic::Encode {
                source: EncodeError::Unrepresentable { .. },
                ..
            }]
        ));
    }

    #[test]
    fn non_finite_field_keeps_previous_value() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        let prior = Gain {
            label: "prior".to_string(),
            ratio: 0.5,
        };
        defaults.set(&GAIN, prior.clone());
        let stored = store.get("app.gain");

        defaults.set(
            &GAIN,
            Gain {
                label: "nan".to_string(),
                ratio: f64::NAN,
            },
        );

        assert_eq!(store.get("app.gain"), stored);
        assert!(matches!(
            sink.take().as_slice(),
            [Diagnostic::Encode {
                source: EncodeError::NonFiniteFloat { .. },
                ..
            }]
        ));
        assert_eq!(defaults.get(&GAIN), prior);
        assert!(sink.is_empty());
    }

    #[test]
    fn record_that_cannot_read_back_is_not_written() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        store.set("app.marker", Value::from("prior"));
        defaults.set(
            &MARKER,
            Marker {
                tag: "x".to_string(),
                unit: (),
            },
        );

        assert_eq!(store.get("app.marker"), Some(Value::from("prior")));
        assert!(matches!(
            sink.take().as_slice(),
            [Diagnostic::Encode {
                key_path,
                source: EncodeError::Lossy { .. },
            }] if key_path == "app.marker"
        ));
    }

    #[test]
    fn primitive_write_then_read() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        defaults.set_primitive(&VOLUME, 0.75);
        assert_eq!(store.get("app.volume"), Some(Value::Float(0.75)));
        assert_eq!(defaults.get_primitive(&VOLUME), 0.75);

        defaults.set_primitive(&NAME, "kai".to_string());
        assert_eq!(defaults.get_primitive(&NAME), "kai");
        assert!(sink.is_empty());
    }

    #[test]
    fn primitive_mismatch_falls_back_with_one_diagnostic() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);
        store.set("app.name", Value::Bool(true));

        assert_eq!(defaults.get_primitive(&NAME), "anon");
        assert_eq!(
            defaults.get_primitive_or(&NAME, || "other".to_string()),
            "other"
        );

        assert_eq!(
            sink.take(),
            vec![
                Diagnostic::TypeMismatch {
                    key_path: "app.name".to_string(),
                    expected: "string",
                    found: ValueKind::Bool,
                };
                2
            ]
        );
    }

    #[test]
    fn remove_restores_default() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        defaults.set(&NAME, "kai".to_string());
        defaults.remove(&NAME);
        assert_eq!(defaults.get(&NAME), "anon");

        // Removing an unset key is a no-op
        defaults.remove(&NAME);
        defaults.remove(&WINDOW);
        assert!(sink.is_empty());
    }

    #[test]
    fn modes_share_the_same_representation_for_scalars() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        defaults.set(&NAME, "via codec".to_string());
        assert_eq!(defaults.get_primitive(&NAME), "via codec");

        defaults.set_primitive(&NAME, "via primitive".to_string());
        assert_eq!(defaults.get(&NAME), "via primitive");
        assert!(sink.is_empty());
    }

    #[test]
    fn codec_blobs_read_in_primitive_mode() {
        let (store, sink) = fixture();
        let defaults = Defaults::with_sink(&store, &sink);

        defaults.set(&BLOB, vec![1, 2, 255]);
        assert!(matches!(store.get("app.blob"), Some(Value::Array(_))));
        assert_eq!(defaults.get_primitive(&BLOB), vec![1, 2, 255]);

        defaults.set_primitive(&BLOB, vec![7]);
        assert_eq!(store.get("app.blob"), Some(Value::Bytes(vec![7])));
        assert_eq!(defaults.get(&BLOB), vec![7]);
        assert!(sink.is_empty());
    }

    #[test]
    fn works_through_dyn_store() {
        let store = InMemoryStore::new();
        let dynamic: &dyn Store = &store;
        let defaults = Defaults::new(dynamic);

        defaults.set(&NAME, "dyn".to_string());
        assert_eq!(defaults.get(&NAME), "dyn");
        assert_eq!(Defaults::new(&store).get(&NAME), "dyn");
    }
}
