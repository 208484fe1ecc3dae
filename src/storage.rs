//! Key-value persistence for the session slices that survive a reload.
//!
//! Values are JSON strings under fixed keys, the same layout the storefront
//! has always written to browser storage. Reads go through [`load_json`],
//! which reports malformed values instead of failing the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

pub const CART_KEY: &str = "cart";
pub const ORDERS_KEY: &str = "orders";
pub const USER_NAME_KEY: &str = "userName";
pub const PROFILE_KEY: &str = "customerProfile";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },

    #[error("could not encode value for {key}: {source}")]
    Encode { key: String, #[source] source: serde_json::Error },
}

/// Reading a stored value either finds nothing, finds a value, or finds
/// something that does not decode.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("stored value for {key} is malformed: {reason}")]
    Malformed { key: String, reason: String },
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, PersistError> {
    let Some(raw) = store.get(key) else { return Ok(None) };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| PersistError::Malformed { key: key.to_string(), reason: e.to_string() })
}

pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode { key: key.to_string(), source })?;
    store.set(key, raw)
}

/// Shared in-memory map. Clones are handles onto the same map, so a store
/// rebuilt from a clone sees everything written before, like a page reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}

/// A single JSON object file holding every key. Rewritten on each change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens `path`, starting empty when the file is missing or unreadable as JSON.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "storage file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = entries.len(), "storage opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn flush(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|source| StorageError::Encode { key: "*".into(), source })?;
        fs::write(&self.path, raw).map_err(|source| StorageError::Io { path: self.path.clone(), source })
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> { self.entries.get(key).cloned() }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() { self.flush()?; }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_distinguishes_absent_and_malformed() {
        let mut store = MemoryStorage::new();
        assert!(matches!(load_json::<Vec<u32>>(&store, CART_KEY), Ok(None)));
        store.set(CART_KEY, "[1,2".into()).unwrap();
        let err = load_json::<Vec<u32>>(&store, CART_KEY).unwrap_err();
        assert!(err.to_string().contains("cart"));
        save_json(&mut store, CART_KEY, &vec![1u32, 2]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, CART_KEY).unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_memory_clones_share_entries() {
        let mut a = MemoryStorage::new();
        let b = a.clone();
        a.set(USER_NAME_KEY, "\"Asha\"".into()).unwrap();
        assert_eq!(b.get(USER_NAME_KEY).as_deref(), Some("\"Asha\""));
        a.remove(USER_NAME_KEY).unwrap();
        assert!(b.keys().is_empty());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut store = FileStorage::open(&path).unwrap();
            save_json(&mut store, ORDERS_KEY, &["#ORD-001"]).unwrap();
        }
        let store = FileStorage::open(&path).unwrap();
        assert_eq!(load_json::<Vec<String>>(&store, ORDERS_KEY).unwrap(), Some(vec!["#ORD-001".to_string()]));
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStorage::open(&path).unwrap();
        assert_eq!(store.get(CART_KEY), None);
    }
}
