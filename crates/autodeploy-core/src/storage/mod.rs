//! Durable key-value storage backing the session.
//!
//! This module provides:
//! - `KeyValueStore`: the storage seam the session is persisted through
//! - `FileStore`: a single JSON file under the data directory
//! - `MemoryStore`: an in-process map, shared between clones
//!
//! Multi-key writes and removals are committed atomically so a token is
//! never persisted without its user snapshot.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage contents could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// A durable string-to-string store scoped to one profile.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write all entries in a single commit.
    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove all keys in a single commit. Missing keys are ignored.
    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError>;
}
