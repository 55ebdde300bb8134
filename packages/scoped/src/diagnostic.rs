//! Diagnostics for degraded reads and skipped writes.
//!
//! Accessors never return errors. When a read falls back to a default or a
//! write is skipped, one [`Diagnostic`] is handed to a [`DiagnosticSink`].

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use scoped_defaults_core_store::ValueKind;
use scoped_defaults_serde_store::{DecodeError, EncodeError};

/// Why an accessor operation degraded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// The stored value could not be decoded; the default was returned.
    #[error("ignoring '{key_path}': {source}")]
    Decode {
        key_path: String,
        #[source]
        source: DecodeError,
    },

    /// The value could not be encoded; nothing was written.
    #[error("not writing '{key_path}': {source}")]
    Encode {
        key_path: String,
        #[source]
        source: EncodeError,
    },

    /// The stored value has the wrong representation; the default was returned.
    #[error("ignoring '{key_path}' (expected '{expected}', found '{found}')")]
    TypeMismatch {
        key_path: String,
        expected: &'static str,
        found: ValueKind,
    },
}

impl Diagnostic {
    /// The key-path the diagnostic is about.
    pub fn key_path(&self) -> &str {
        match self {
            Diagnostic::Decode { key_path, .. }
            | Diagnostic::Encode { key_path, .. }
            | Diagnostic::TypeMismatch { key_path, .. } => key_path,
        }
    }

    /// A short name for the kind of failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::Decode { .. } => "decode",
            Diagnostic::Encode { .. } => "encode",
            Diagnostic::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

/// Receives diagnostics from accessors and aggregation.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Emits each diagnostic as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            key_path = diagnostic.key_path(),
            kind = diagnostic.kind(),
            "{}",
            diagnostic
        );
    }
}

/// Collects diagnostics in memory.
///
/// ```rust
/// use scoped_defaults::{Defaults, Descriptor, RecordingSink};
/// use scoped_defaults_json_store::InMemoryStore;
/// use scoped_defaults_core_store::{Store, Value};
///
/// static FLAG: Descriptor<bool> = Descriptor::unscoped("flag", || false);
///
/// let store = InMemoryStore::new();
/// store.set("flag", Value::from("not a bool"));
///
/// let sink = RecordingSink::new();
/// let defaults = Defaults::with_sink(&store, &sink);
/// assert_eq!(defaults.get(&FLAG), false);
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of everything recorded so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<T> {
    fn report(&self, diagnostic: Diagnostic) {
        self.as_ref().report(diagnostic)
    }
}
