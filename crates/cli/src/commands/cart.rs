//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! kitbay cart add "XPS 13"
//! kitbay cart add WD19S --quantity 2
//! kitbay cart set WD19S 1
//! kitbay cart remove WD19S
//! kitbay cart list --currency CAD
//! kitbay cart clear
//! ```

use std::fmt::Write as _;

use kitbay_core::cart::CartStore;
use kitbay_core::catalog::{Catalog, to_cart_entry};
use kitbay_core::pricing::PricedLine;
use kitbay_core::storage::LocalStorage;
use kitbay_core::{CurrencyCode, ModelId, Price, preferences};

use super::CliError;

/// Render the cart in `currency`, or the saved preference.
pub fn list<S: LocalStorage>(storage: S, currency: Option<CurrencyCode>) -> String {
    let currency = currency.unwrap_or_else(|| preferences::load(&storage));
    let store = CartStore::load(storage);

    if store.cart().is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for entry in store.entries() {
        let _ = writeln!(
            out,
            "{:>3} x {:<36} {:>12}",
            entry.quantity,
            entry.title(),
            Price::new(entry.line_total(currency), currency).display_cents()
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        store.count(),
        Price::new(store.subtotal(currency), currency).display_cents()
    );
    out
}

/// Add a catalog product.
///
/// # Errors
///
/// Returns an error for unknown products, a second laptop, or a failed write.
pub fn add<S: LocalStorage>(
    storage: S,
    catalog: &Catalog,
    model: &str,
    quantity: u32,
) -> Result<String, CliError> {
    let product = catalog
        .find(model)
        .ok_or_else(|| CliError::UnknownProduct(model.to_string()))?;

    let mut store = CartStore::load(storage);
    let event = store.add(to_cart_entry(product), quantity)?;
    tracing::info!(model = %product.model, quantity, "added to cart");
    Ok(event.notice())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the model is not in the cart or the write fails.
pub fn remove<S: LocalStorage>(storage: S, model: &str) -> Result<String, CliError> {
    let mut store = CartStore::load(storage);
    Ok(store.remove(&ModelId::new(model))?.notice())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the model is not in the cart, the quantity is zero,
/// or the write fails.
pub fn set<S: LocalStorage>(storage: S, model: &str, quantity: u32) -> Result<String, CliError> {
    let mut store = CartStore::load(storage);
    Ok(store.set_quantity(&ModelId::new(model), quantity)?.notice())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn clear<S: LocalStorage>(storage: S) -> Result<String, CliError> {
    let mut store = CartStore::load(storage);
    Ok(store.clear()?.notice())
}
