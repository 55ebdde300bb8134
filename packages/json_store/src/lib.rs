//! Store implementations for scoped defaults.
//!
//! Both stores keep two layers per key-path: a persisted value written with
//! `set`, and a registered factory default. Reads see the persisted value
//! when there is one and the registered default otherwise.
//!
//! - `InMemoryStore`: Both layers live in memory
//! - `JsonFileStore`: The persisted layer is mirrored to a JSON file

mod error;
pub mod in_memory;
pub mod json_utils;
mod layers;
pub mod local_disk;

pub use error::Error;
pub use in_memory::InMemoryStore;
pub use local_disk::{FileStoreConfig, JsonFileStore};

pub use scoped_defaults_core_store::{Store, Value};
