//! Local key-value persistence for client state.
//!
//! Each entry is an opaque JSON blob stored under a fixed key. The file
//! backend keeps one `<key>.json` file per entry in the data directory.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Fixed keys of the persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Serialized cart lines
    Cart,
    /// Serialized session (profile + token)
    Session,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Cart => "cart",
            StorageKey::Session => "session",
        }
    }

    pub fn filename(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Stored blob is not valid for the expected type.
    DecodeError(StorageKey, serde_json::Error),
    /// Value could not be serialized.
    EncodeError(StorageKey, serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::DecodeError(key, e) => {
                write!(f, "Failed to decode stored {}: {}", key.as_str(), e)
            }
            StorageError::EncodeError(key, e) => {
                write!(f, "Failed to encode {}: {}", key.as_str(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::DecodeError(_, e) | StorageError::EncodeError(_, e) => Some(e),
        }
    }
}

/// Load/save of raw blobs by key.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` if nothing is stored under `key`.
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    fn save(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

/// Loads and decodes a JSON entry.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StorageKey,
) -> Result<Option<T>, StorageError> {
    match store.load(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::DecodeError(key, e)),
        None => Ok(None),
    }
}

/// Encodes and saves a JSON entry.
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::EncodeError(key, e))?;
    store.save(key, &raw)
}

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: StorageKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Creates the data directory if it doesn't exist.
    fn save(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        // Write to a sibling file and rename so a crash never leaves half a blob.
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::IoError(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }
}

/// In-process store, used by tests and as an offline fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&key).cloned())
    }

    fn save(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&key);
        Ok(())
    }
}
