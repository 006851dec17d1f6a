// Storage abstraction - allows file-based (native), localStorage (WASM) and in-memory backends

use crate::error::CoreError;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, CoreError>;

/// Abstract device-local key-value store.
///
/// Backends only move raw strings; the typed `save`/`load` helpers encode
/// values as JSON on top of them. Calls are synchronous because both browser
/// `localStorage` and the file backend are, and every collection write must
/// land before the mutating call returns.
pub trait StorageBackend {
    /// Read the raw value stored under `key`
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the raw value stored under `key`
    fn set_raw(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove data by key
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if key exists
    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// List all keys (optional, may not be supported by all backends)
    fn list_keys(&self) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Save data with a key
    fn save<T: Serialize>(&self, key: &str, data: &T) -> StorageResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(data)?;
        self.set_raw(key, &json)
    }

    /// Load data by key. A missing key is `Ok(None)`; malformed data is an error.
    fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

/// Standard storage slots used across the storefront
pub mod keys {
    pub const CART: &str = "cart";
    pub const FAVORITES: &str = "favorites";
    pub const THEME: &str = "theme";
}

/// Process-local backend used by tests and headless hosts
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> StorageResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| CoreError::Storage(format!("Memory storage poisoned: {}", e)))
    }
}

impl StorageBackend for MemoryStorage {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!("Saving {} bytes to memory slot: {}", value.len(), key);
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }
}
