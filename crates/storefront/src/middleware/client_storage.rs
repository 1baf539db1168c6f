//! Per-client key/value storage backed by the session.
//!
//! The browser build keeps the cart, currency preference and checkout
//! handoff in `localStorage`. The server keeps the same keys in a session
//! entry and hands handlers a [`MemoryStorage`] snapshot of it.

use std::collections::HashMap;

use axum::{extract::FromRequestParts, http::request::Parts};
use kitbay_core::CurrencyCode;
use kitbay_core::cart::CartStore;
use kitbay_core::preferences;
use kitbay_core::storage::MemoryStorage;
use tower_sessions::Session;

use crate::error::AppError;

/// Session key holding the storage snapshot.
const LOCAL_STORAGE_KEY: &str = "local_storage";

/// Extractor giving a handler the client's storage.
///
/// Changes are only kept once [`ClientStorage::save`] is called.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut client: ClientStorage) -> Result<String> {
///     let count = client.cart().count();
///     client.save().await?;
///     Ok(count.to_string())
/// }
/// ```
pub struct ClientStorage {
    session: Session,
    storage: MemoryStorage,
}

impl<S> FromRequestParts<S> for ClientStorage
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let items: HashMap<String, String> = session
            .get(LOCAL_STORAGE_KEY)
            .await?
            .unwrap_or_default();

        Ok(Self {
            session,
            storage: MemoryStorage::from_items(items),
        })
    }
}

impl ClientStorage {
    /// Open the cart held in this storage.
    pub fn cart(&mut self) -> CartStore<&mut MemoryStorage> {
        CartStore::load(&mut self.storage)
    }

    /// The preferred display currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        preferences::load(&self.storage)
    }

    /// Direct access to the underlying storage.
    pub const fn storage_mut(&mut self) -> &mut MemoryStorage {
        &mut self.storage
    }

    /// Write the snapshot back to the session if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(self) -> Result<(), AppError> {
        if !self.storage.is_dirty() {
            return Ok(());
        }
        self.session
            .insert(LOCAL_STORAGE_KEY, self.storage.into_items())
            .await?;
        Ok(())
    }
}
