//! JSON file store.
//!
//! The persisted layer is mirrored to a single JSON object whose keys are
//! full key-paths. Registered factory defaults are recomputed on every
//! start and are never written to disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::value::Value as JsonValue;

use scoped_defaults_core_store::{Store, Value};

use crate::error::{Error, Result};
use crate::json_utils;
use crate::layers::Layers;

/// Configuration for a [`JsonFileStore`].
#[derive(Clone, Debug)]
pub struct FileStoreConfig {
    path: PathBuf,
    pretty: bool,
    write_through: bool,
}

impl FileStoreConfig {
    /// Defaults: compact output, save after every mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
            write_through: true,
        }
    }

    /// Write indented JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Save after every `set`/`remove`. When off, call
    /// [`JsonFileStore::save`] explicitly.
    pub fn write_through(mut self, write_through: bool) -> Self {
        self.write_through = write_through;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A store whose persisted values live in a JSON file.
///
/// The in-memory copy is authoritative while the process runs. A failed
/// write-through save is logged and retried implicitly by the next
/// mutation or an explicit [`save`](JsonFileStore::save).
pub struct JsonFileStore {
    config: FileStoreConfig,
    layers: Mutex<Layers>,
}

impl JsonFileStore {
    /// Open the store at `path` with default configuration.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(FileStoreConfig::new(path))
    }

    /// Open the store described by `config`.
    ///
    /// A missing file starts an empty store; the file is created by the
    /// first save. An unreadable or malformed file is an error.
    pub fn open_with(config: FileStoreConfig) -> Result<Self> {
        let persisted = Self::load(&config.path)?;
        log::debug!(
            "Opened {} with {} persisted values",
            config.path.display(),
            persisted.len()
        );
        Ok(Self {
            config,
            layers: Mutex::new(Layers::with_persisted(persisted)),
        })
    }

    pub fn config(&self) -> &FileStoreConfig {
        &self.config
    }

    /// Snapshot of the persisted layer.
    pub fn persisted(&self) -> BTreeMap<String, Value> {
        self.lock().persisted.clone()
    }

    /// Write the persisted layer to disk.
    pub fn save(&self) -> Result<()> {
        let layers = self.lock();
        self.write_file(&layers.persisted)
    }

    fn load(path: &Path) -> Result<BTreeMap<String, Value>> {
        log::debug!("Reading {}...", path.display());
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let document: JsonValue = serde_json::from_slice(&contents).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let JsonValue::Object(entries) = document else {
            return Err(Error::Malformed {
                path: path.to_path_buf(),
                message: "root must be an object".to_string(),
            });
        };

        let mut persisted = BTreeMap::new();
        for (key, json) in &entries {
            let value = json_utils::from_disk(json).map_err(|message| Error::Malformed {
                path: path.to_path_buf(),
                message: format!("entry '{}': {}", key, message),
            })?;
            if let Some(value) = value {
                persisted.insert(key.clone(), value);
            }
        }
        Ok(persisted)
    }

    fn write_file(&self, persisted: &BTreeMap<String, Value>) -> Result<()> {
        let path = &self.config.path;
        log::debug!("Writing {}...", path.display());

        let document = JsonValue::Object(
            persisted
                .iter()
                .map(|(k, v)| (k.clone(), json_utils::to_disk(v)))
                .collect(),
        );
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;

        let io_error = |source| Error::Io {
            path: path.clone(),
            source,
        };

        // Write next to the target and rename so readers never see a
        // truncated document.
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        fs::rename(&temp_path, path).map_err(io_error)?;
        Ok(())
    }

    fn persist_after_mutation(&self, layers: &Layers) {
        if !self.config.write_through {
            return;
        }
        if let Err(error) = self.write_file(&layers.persisted) {
            log::error!("Failed to save {}: {}", self.config.path.display(), error);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Layers> {
        self.layers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let mut layers = self.lock();
        layers.set(key, value);
        self.persist_after_mutation(&layers);
    }

    fn remove(&self, key: &str) {
        let mut layers = self.lock();
        if layers.remove(key) {
            self.persist_after_mutation(&layers);
        }
    }

    fn register_factory_defaults(&self, defaults: BTreeMap<String, Value>) {
        self.lock().register(defaults);
    }
}
