//! Local key/value storage for records created on this machine.
//!
//! This module provides:
//! - `KeyValueStore`: string key to string value storage
//! - `FileStore`: one JSON file per key in a data directory
//! - `MemoryStore`: process-local map for tests and throwaway sessions
//! - `LocalRockets`: the typed list of locally created rockets kept under
//!   a single namespaced key
//!
//! Values are written wholesale; there is no partial update.

pub mod file;
pub mod local;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use local::{LocalRockets, StoredRockets, LOCAL_ROCKETS_BACKUP_KEY, LOCAL_ROCKETS_KEY};
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Failed to create storage directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent string storage keyed by name.
///
/// Implementations must treat a missing key as `Ok(None)`, never as an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys double as file names, so keep them to a safe character set.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
