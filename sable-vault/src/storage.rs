//! Key-value storage boundary.
//!
//! Durable backends (OS keystores, files, databases) live outside this
//! workspace; they plug in through [`KeyValueStore`]. [`MemoryStore`] is the
//! in-process implementation used in tests and ephemeral setups.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;

/// Abstract key-value storage used by the vault.
///
/// Implementations must be safe to share across threads. Errors are
/// surfaced as [`StorageError`], never swallowed.
pub trait KeyValueStore: Send + Sync {
    /// Write a value under a key, replacing any existing value.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Read the value under a key, if present.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Check whether a key is present.
    fn contains_key(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete the value under a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key.
    fn delete_all(&self) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key)
    }

    fn contains_key(&self, key: &str) -> Result<bool, StorageError> {
        (**self).contains_key(key)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        (**self).delete_all()
    }
}

/// In-memory key-value store backed by a mutexed map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries().insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn contains_key(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries().contains_key(key))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        self.entries().clear();
        Ok(())
    }
}
