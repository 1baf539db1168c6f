//! Local storage kept in a JSON file.
//!
//! The file holds one JSON object of string keys to string values, the same
//! shape a browser's `localStorage` has. Every write rewrites the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kitbay_core::storage::{LocalStorage, StorageError};

/// A [`LocalStorage`] persisted to a file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: HashMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(backend(&path, &e)),
        };
        Ok(Self { path, items })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, json).map_err(|e| backend(&self.path, &e))
    }
}

fn backend(path: &Path, err: &std::io::Error) -> StorageError {
    StorageError::Backend(format!("{}: {err}", path.display()))
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let previous = self.items.insert(key.to_owned(), value);
        if let Err(e) = self.flush() {
            // Keep memory in step with the file.
            match previous {
                Some(old) => self.items.insert(key.to_owned(), old),
                None => self.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(previous) = self.items.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush() {
            self.items.insert(key.to_owned(), previous);
            return Err(e);
        }
        Ok(())
    }
}
