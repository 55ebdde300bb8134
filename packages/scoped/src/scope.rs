//! Scopes: the namespace nodes key-paths are derived from.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between key-path segments.
pub const SEPARATOR: char = '.';

/// A namespace node contributing one segment to every key-path below it.
///
/// Scopes are meant to be declared once as `static` items and shared by
/// reference:
///
/// ```rust
/// use scoped_defaults::Scope;
///
/// static SETTINGS: Scope = Scope::new("settings", &Scope::ROOT);
/// static FOO: Scope = Scope::new("foo", &SETTINGS);
///
/// assert_eq!(FOO.key_path(), "settings.foo");
/// assert_eq!(Scope::ROOT.key_path(), "");
/// ```
///
/// Two scopes are equal when their key-paths are equal, whatever their
/// addresses.
#[derive(Clone, Copy)]
pub struct Scope {
    key: &'static str,
    parent: Option<&'static Scope>,
}

impl Scope {
    /// The root scope. Its empty key contributes no segment.
    pub const ROOT: Scope = Scope {
        key: "",
        parent: None,
    };

    /// Declare a scope nested in `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty or contains the separator. In a `static`
    /// declaration this is a compile-time error.
    pub const fn new(key: &'static str, parent: &'static Scope) -> Self {
        validate_key(key);
        Scope {
            key,
            parent: Some(parent),
        }
    }

    /// Declare a top-level scope, equivalent to nesting it in [`Scope::ROOT`].
    pub const fn top_level(key: &'static str) -> Self {
        Self::new(key, &Scope::ROOT)
    }

    /// The segment this scope contributes.
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn parent(&self) -> Option<&'static Scope> {
        self.parent
    }

    /// Whether this scope contributes no segment.
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// The full dotted key-path of this scope.
    pub fn key_path(&self) -> String {
        match self.parent {
            Some(parent) => join(&parent.key_path(), self.key),
            None => self.key.to_string(),
        }
    }

    /// The key-path of a leaf key declared directly in this scope.
    pub fn key_path_of(&self, key: &str) -> String {
        join(&self.key_path(), key)
    }
}

/// Join a key onto a key-path, omitting the separator after an empty path.
pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        let mut joined = String::with_capacity(path.len() + 1 + key.len());
        joined.push_str(path);
        joined.push(SEPARATOR);
        joined.push_str(key);
        joined
    }
}

/// Reject keys that would produce empty or ambiguous key-path segments.
pub(crate) const fn validate_key(key: &str) {
    let bytes = key.as_bytes();
    if bytes.is_empty() {
        panic!("key must not be empty");
    }
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == SEPARATOR as u8 {
            panic!("key must not contain '.'");
        }
        i += 1;
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.key_path() == other.key_path()
    }
}

impl Eq for Scope {}

impl Hash for Scope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_path().hash(state);
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scope").field(&self.key_path()).finish()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_path())
    }
}
