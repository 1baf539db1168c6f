//! Persistent, observable cart.

use std::fmt;

use rust_decimal::Decimal;

use super::{Cart, CartEntry, CartError, CartEvent};
use crate::storage::{LocalStorage, keys};
use crate::types::{CurrencyCode, ModelId};

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&CartEvent, &Cart) + Send + Sync>;

/// A cart bound to a [`LocalStorage`].
///
/// Each mutation runs against a working copy, is written to storage, and is
/// only then committed and broadcast to observers. If the write fails the
/// store is left exactly as it was.
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<S: LocalStorage> CartStore<S> {
    /// Restore the cart persisted in `storage`.
    ///
    /// Unreadable or malformed data is logged and treated as an empty cart.
    /// The restored entries are repaired with [`Cart::from_entries`].
    pub fn load(storage: S) -> Self {
        let cart = match storage.get_item(keys::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartEntry>>(&raw) {
                Ok(entries) => Cart::from_entries(entries),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed persisted cart");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted cart");
                Cart::new()
            }
        };

        Self {
            storage,
            cart,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        self.cart.entries()
    }

    /// Total number of units.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.cart.count()
    }

    #[must_use]
    pub fn has_laptop(&self) -> bool {
        self.cart.has_laptop()
    }

    #[must_use]
    pub fn subtotal(&self, currency: CurrencyCode) -> Decimal {
        self.cart.subtotal(currency)
    }

    /// Borrow the underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the underlying storage, e.g. to write the checkout
    /// handoff next to the cart.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give the storage back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Add `quantity` units of `item`. See [`Cart::add`].
    ///
    /// # Errors
    ///
    /// Returns the cart rule violation, or [`CartError::Storage`] if the
    /// result could not be persisted.
    pub fn add(&mut self, item: CartEntry, quantity: u32) -> Result<CartEvent, CartError> {
        let model = item.model_id.clone();
        let result = self.transact(|cart| cart.add(item, quantity));
        if let Err(CartError::LaptopConflict { existing }) = &result {
            tracing::info!(%model, %existing, "rejected second laptop");
        }
        result
    }

    /// Remove an entry. See [`Cart::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] or [`CartError::Storage`].
    pub fn remove(&mut self, model_id: &ModelId) -> Result<CartEvent, CartError> {
        self.transact(|cart| cart.remove(model_id))
    }

    /// Set an entry's quantity. See [`Cart::set_quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`], [`CartError::NotFound`] or
    /// [`CartError::Storage`].
    pub fn set_quantity(
        &mut self,
        model_id: &ModelId,
        quantity: u32,
    ) -> Result<CartEvent, CartError> {
        self.transact(|cart| cart.set_quantity(model_id, quantity))
    }

    /// Empty the cart and delete the persisted key.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the key could not be removed.
    pub fn clear(&mut self) -> Result<CartEvent, CartError> {
        self.transact(|cart| Ok(cart.clear()))
    }

    /// Register a callback run after every successful mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&CartEvent, &Cart) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn transact<F>(&mut self, op: F) -> Result<CartEvent, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<CartEvent, CartError>,
    {
        let mut working = self.cart.clone();
        let event = op(&mut working)?;

        if matches!(event, CartEvent::Cleared) {
            self.storage.remove_item(keys::CART)?;
        } else {
            let json = serde_json::to_string(&working).map_err(crate::storage::StorageError::from)?;
            self.storage.set_item(keys::CART, json)?;
        }

        self.cart = working;
        tracing::debug!(event = ?event, count = self.cart.count(), "cart updated");
        for (_, observer) in &self.observers {
            observer(&event, &self.cart);
        }
        Ok(event)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn laptop(model: &str) -> CartEntry {
        CartEntry::new(model, "Lenovo", "laptop", Decimal::from(1649))
    }

    fn dock(model: &str) -> CartEntry {
        CartEntry::new(model, "Lenovo", "docking station", Decimal::from(289))
    }

    fn persisted(store: &CartStore<MemoryStorage>) -> Vec<CartEntry> {
        let raw = store.storage().get_item(keys::CART).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: bool,
    }

    impl LocalStorage for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Backend("quota exceeded".to_owned()));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Backend("quota exceeded".to_owned()));
            }
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add(dock("ThinkPad Universal USB-C Dock"), 1).unwrap();
        store.add(laptop("ThinkPad X1 Carbon"), 1).unwrap();

        let saved = persisted(&store);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].model_id.as_str(), "ThinkPad X1 Carbon");

        store
            .set_quantity(&"ThinkPad Universal USB-C Dock".into(), 3)
            .unwrap();
        assert_eq!(persisted(&store)[1].quantity, 3);

        store.remove(&"ThinkPad X1 Carbon".into()).unwrap();
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_clear_removes_persisted_key() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add(dock("WD19S"), 2).unwrap();
        store.clear().unwrap();

        assert!(store.cart().is_empty());
        assert_eq!(store.count(), 0);
        assert_eq!(store.storage().get_item(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_load_restores_and_reorders() {
        let mut storage = MemoryStorage::new();
        let legacy = serde_json::json!([
            {"model": "WD19S", "brand": "Dell", "category": "docking station", "price_usd": 239, "quantity": 1},
            {"model": "XPS 13", "brand": "Dell", "category": "Laptop", "price_usd": "1,899", "quantity": 1}
        ]);
        storage.set_item(keys::CART, legacy.to_string()).unwrap();

        let store = CartStore::load(storage);
        let models: Vec<_> = store.entries().iter().map(|e| e.model_id.as_str()).collect();
        assert_eq!(models, vec!["XPS 13", "WD19S"]);
        assert_eq!(store.subtotal(CurrencyCode::USD), Decimal::from(1899 + 239));
    }

    #[test]
    fn test_load_malformed_cart_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(keys::CART, "{not json".to_owned()).unwrap();

        let store = CartStore::load(storage);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let mut store = CartStore::load(FlakyStorage::default());
        store.add(dock("WD19S"), 1).unwrap();

        store.storage_mut().fail_writes = true;
        let err = store.add(dock("WD22TB4"), 1).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(store.entries().len(), 1);

        assert!(store.clear().is_err());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_rejected_laptop_is_not_persisted() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add(laptop("ThinkPad X1 Carbon"), 1).unwrap();
        let before = store.storage().get_item(keys::CART).unwrap();

        assert!(matches!(
            store.add(laptop("ThinkPad T14s"), 1),
            Err(CartError::LaptopConflict { .. })
        ));
        assert_eq!(store.storage().get_item(keys::CART).unwrap(), before);
    }

    #[test]
    fn test_observers_receive_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = CartStore::load(MemoryStorage::new());

        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |event, cart| {
            sink.lock().unwrap().push((event.notice(), cart.count()));
        });

        store.add(dock("WD19S"), 1).unwrap();
        store.add(dock("WD19S"), 1).unwrap();
        let _ = store.remove(&"missing".into());

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.clear().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("WD19S added to cart".to_owned(), 1),
                ("WD19S quantity updated in cart".to_owned(), 2),
            ]
        );
    }
}
