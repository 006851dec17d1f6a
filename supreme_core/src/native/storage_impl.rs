// Native file-based storage implementation

use crate::error::CoreError;
use crate::storage_trait::{StorageBackend, StorageResult};
use log::debug;
use std::fs;
use std::path::PathBuf;

/// File-based storage backend for native (CLI) mode. Each slot is one
/// `<key>.json` file under the base directory.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create a new file storage backend with the specified base directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the full path for a storage key
    fn get_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.get_path(key);
        debug!("Loading data from file: {:?}", path);

        if !path.exists() {
            debug!("File does not exist: {:?}", path);
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| CoreError::Io(format!("Failed to read file: {}", e)))?;
        Ok(Some(raw))
    }

    fn set_raw(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.get_path(key);
        debug!("Saving data to file: {:?}", path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CoreError::Io(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(&path, value)
            .map_err(|e| CoreError::Io(format!("Failed to write file: {}", e)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.get_path(key);
        debug!("Removing file: {:?}", path);

        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| CoreError::Io(format!("Failed to remove file: {}", e)))?;
        } else {
            debug!("File does not exist, nothing to remove: {:?}", path);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get_path(key).exists())
    }

    fn list_keys(&self) -> StorageResult<Vec<String>> {
        debug!("Listing keys in directory: {:?}", self.base_dir);

        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.base_dir)
            .map_err(|e| CoreError::Io(format!("Failed to read directory: {}", e)))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CoreError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();

        debug!("Found {} keys", keys.len());
        Ok(keys)
    }
}
