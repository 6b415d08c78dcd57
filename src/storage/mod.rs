// ABOUTME: Durable key/value storage for the tab session blob
// The tab session reads one blob at startup and writes it on teardown

pub mod error;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::ProjectDirs;
use tracing::debug;

pub use error::StorageError;

/// Persistence collaborator. Blobs are opaque strings to the store.
pub trait TabStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    storage_path: PathBuf,
}

impl JsonFileStorage {
    /// Storage under the platform data directory.
    pub fn new() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("", "", "tab-console").ok_or(StorageError::NoStorageDir)?;
        Self::with_dir(dirs.data_dir().join("tabs"))
    }

    pub fn with_dir(storage_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(&storage_path)?;
        Ok(Self { storage_path })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.storage_path.join(format!("{key}.json"))
    }
}

impl TabStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let file = self.file_for(key);
        if !file.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(file)?))
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let file = self.file_for(key);
        fs::write(&file, blob)?;
        debug!("Saved {} bytes to {:?}", blob.len(), file);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl TabStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
