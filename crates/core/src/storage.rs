//! Client-resident key/value storage.
//!
//! All per-user state (cart, currency preference, checkout handoff) lives in
//! a small string key/value store owned by the client. In a browser this is
//! `localStorage`; the storefront backs it with a cookie session and the CLI
//! with a JSON file. Stores in this crate only ever talk to [`LocalStorage`].

use std::collections::HashMap;

use thiserror::Error;

/// Storage keys.
pub mod keys {
    /// JSON array of cart entries.
    pub const CART: &str = "cart";

    /// Preferred display currency (`USD`, `CAD` or `EUR`).
    pub const PREFERRED_CURRENCY: &str = "preferred-currency";

    /// Transient checkout handoff written by the cart page.
    pub const CART_CHECKOUT: &str = "cartCheckout";
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A value could not be serialized before writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store failed (file system, session, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A synchronous string key/value store.
pub trait LocalStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: LocalStorage + ?Sized> LocalStorage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-memory storage.
///
/// Tracks whether anything was written so callers holding a snapshot know
/// when it has to be flushed back to its real home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    dirty: bool,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing snapshot. The result is not dirty.
    #[must_use]
    pub fn from_items(items: HashMap<String, String>) -> Self {
        Self {
            items,
            dirty: false,
        }
    }

    /// Whether any write or delete happened since creation.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Borrow the current items.
    #[must_use]
    pub const fn items(&self) -> &HashMap<String, String> {
        &self.items
    }

    /// Consume the store and return its items.
    #[must_use]
    pub fn into_items(self) -> HashMap<String, String> {
        self.items
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value);
        self.dirty = true;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.items.remove(key).is_some() {
            self.dirty = true;
        }
        Ok(())
    }
}
