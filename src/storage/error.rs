// ABOUTME: Error types for the persisted tab session store

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage directory unavailable")]
    NoStorageDir,
}
