//! Device-local key/value storage of string blobs.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use super::r#trait::StorageError;

const BLOB_DIR: &str = "kv";
const BLOB_EXTENSION: &str = "json";

/// Per-device key/value store (one string blob per key).
///
/// `clear` wipes every key: the "clear all local data" reset.
pub trait DeviceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

impl<D> DeviceStore for Arc<D>
where
    D: DeviceStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Keys are `[A-Za-z0-9._-]+` and may not start with a dot, so a key always
/// maps to a plain file name.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-memory device store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDeviceStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceStore for InMemoryDeviceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let map = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        map.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        map.clear();
        Ok(())
    }
}

/// File-backed device store: one `<root>/kv/<key>.json` file per key.
///
/// The `kv` directory belongs to the store alone; other files under `root`
/// are never touched. Writes go to a sibling temp file first and are renamed
/// into place, so a reader never observes a half-written blob.
#[derive(Debug, Clone)]
pub struct FileDeviceStore {
    dir: PathBuf,
}

impl FileDeviceStore {
    /// Open (and create if needed) the store directory under `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = root.into().join(BLOB_DIR);
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{BLOB_EXTENSION}")))
    }
}

impl DeviceStore for FileDeviceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{BLOB_EXTENSION}.tmp"));
        fs::write(&tmp, value).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!(key, bytes = value.len(), "device blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };
        let mut removed = 0usize;
        for entry in entries {
            let path = entry.map_err(|e| StorageError::io(&self.dir, e))?.path();
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
                removed += 1;
            }
        }
        tracing::info!(dir = %self.dir.display(), removed, "device store cleared");
        Ok(())
    }
}
