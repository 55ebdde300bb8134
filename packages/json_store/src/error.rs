//! Error types for store persistence.
//!
//! The `Store` trait is infallible. These errors come from opening or
//! explicitly saving a backing file, never from `get`/`set`/`remove`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving a store's backing file.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the backing file failed.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not valid JSON.
    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing document parsed but does not have the expected shape.
    #[error("malformed store document {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Result type alias for store persistence.
pub type Result<T> = std::result::Result<T, Error>;
