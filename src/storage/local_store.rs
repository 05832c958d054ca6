//! Local store persistence with atomic writes
//!
//! The whole store is one JSON object. Every mutation rewrites it using the
//! write-to-temp-then-rename pattern so a crash never leaves a torn file.

use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::StoreError;
use super::keys;

/// Durable key/value store shared by the session components
///
/// Cloning is cheap; all clones observe and mutate the same entries.
#[derive(Clone, Debug)]
pub struct LocalStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    /// `None` for in-memory stores
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl LocalStore {
    /// Open the store at `path`, loading existing entries
    ///
    /// A missing file yields an empty store. A file that is not a JSON
    /// object is moved aside to `<path>.corrupt` and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { path, message }) => {
                let backup = path.with_extension("json.corrupt");
                warn!("Local store at {path:?} is corrupt ({message}), moving it to {backup:?}");
                std::fs::rename(&path, &backup)?;
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        debug!("Opened local store at {path:?} with {} keys", entries.len());

        Ok(Self {
            inner: Arc::new(StoreInner {
                path: Some(path),
                entries: Mutex::new(entries),
            }),
        })
    }

    /// Create a store that is never written to disk
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: None,
                entries: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Path of the backing file, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Read and decode the value stored under `key`
    ///
    /// Returns `None` when the key is absent or its value does not decode
    /// as `T`; the latter is logged.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.entries.lock().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Ignoring undecodable local store value for '{key}': {e}");
                None
            }
        }
    }

    /// Store `value` under `key` and persist
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value)?;
        let mut entries = self.inner.entries.lock();
        entries.insert(key.to_string(), encoded);
        // Written under the lock so files land in mutation order
        self.persist(&entries)
    }

    /// Remove `key` and persist. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.inner.entries.lock();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    /// Durable client identifier, generated on first use
    ///
    /// A failure to persist a freshly generated id is logged; the id is
    /// still returned and kept in memory for this session.
    #[must_use]
    pub fn client_id(&self) -> Uuid {
        if let Some(raw) = self.get::<String>(keys::CLIENT_ID)
            && let Ok(id) = Uuid::parse_str(&raw)
        {
            return id;
        }

        let id = Uuid::new_v4();
        if let Err(e) = self.set(keys::CLIENT_ID, &id.to_string()) {
            warn!("Failed to persist client id: {e}");
        }
        debug!("Generated new client id {id}");
        id
    }

    /// Write `entries` atomically: temp file in the same directory,
    /// sync, rename over the store file
    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let Some(path) = self.inner.path.as_deref() else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(entries)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;
        temp.persist(path)
            .map_err(|e| StoreError::Persist(e.error.to_string()))?;

        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };

    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(other) => Err(StoreError::Corrupt {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {other}"),
        }),
        Err(e) => Err(StoreError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}
