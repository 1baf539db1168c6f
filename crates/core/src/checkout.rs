//! Handoff from the cart page to the checkout page.
//!
//! The cart page writes a [`CheckoutHandoff`] under
//! [`keys::CART_CHECKOUT`]; the checkout page takes it exactly once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartEntry};
use crate::de;
use crate::pricing::{OrderTotals, ShippingMethod};
use crate::storage::{LocalStorage, StorageError, keys};
use crate::types::{CurrencyCode, ShippingType};

/// What the cart page passes to checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutHandoff {
    pub items: Vec<CartEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    /// USD fee for `shipping_method`, kept in the stored JSON for readers
    /// of the `cartCheckout` key. Totals are always derived from the method.
    #[serde(deserialize_with = "de::decimal")]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
}

impl CheckoutHandoff {
    /// Snapshot `cart` for checkout. Blank cost centers are dropped.
    #[must_use]
    pub fn from_cart(cart: &Cart, cost_center: Option<String>, method: ShippingMethod) -> Self {
        Self {
            items: cart.entries().to_vec(),
            cost_center: cost_center
                .map(|c| c.trim().to_owned())
                .filter(|c| !c.is_empty()),
            shipping_cost: method.cost(CurrencyCode::USD),
            shipping_method: method,
        }
    }
}

/// Store `handoff`, replacing any earlier one.
///
/// # Errors
///
/// Returns an error if the handoff cannot be serialized or written.
pub fn write<S: LocalStorage>(storage: &mut S, handoff: &CheckoutHandoff) -> Result<(), StorageError> {
    let json = serde_json::to_string(handoff)?;
    storage.set_item(keys::CART_CHECKOUT, json)
}

/// Read and delete the stored handoff.
///
/// Malformed data is logged, deleted, and reported as absent.
///
/// # Errors
///
/// Returns an error only if the backend fails.
pub fn take<S: LocalStorage>(storage: &mut S) -> Result<Option<CheckoutHandoff>, StorageError> {
    let Some(raw) = storage.get_item(keys::CART_CHECKOUT)? else {
        return Ok(None);
    };
    storage.remove_item(keys::CART_CHECKOUT)?;

    match serde_json::from_str::<CheckoutHandoff>(&raw) {
        Ok(mut handoff) => {
            let fee = handoff.shipping_method.cost(CurrencyCode::USD);
            if handoff.shipping_cost != fee {
                tracing::warn!(
                    stored = %handoff.shipping_cost,
                    method = %handoff.shipping_method,
                    "checkout handoff fee does not match its shipping method"
                );
                handoff.shipping_cost = fee;
            }
            Ok(Some(handoff))
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed checkout handoff");
            Ok(None)
        }
    }
}

/// Figures shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub shipping_method: ShippingMethod,
    pub item_count: u32,
    pub totals: OrderTotals,
}

impl CheckoutSummary {
    #[must_use]
    pub fn compute(
        items: &[CartEntry],
        method: ShippingMethod,
        shipping_type: ShippingType,
        location: &str,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            shipping_method: method,
            item_count: items
                .iter()
                .fold(0_u32, |sum, item| sum.saturating_add(item.quantity)),
            totals: OrderTotals::for_lines(items, currency, shipping_type, location, method),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(
            CartEntry::new("XPS 13", "Dell", "laptop", Decimal::from(1000)).with_cad_price(Decimal::from(1399)),
            1,
        )
        .unwrap();
        cart.add(CartEntry::new("WD19S", "Dell", "docking station", Decimal::from(239)), 2)
            .unwrap();
        cart
    }

    #[test]
    fn test_handoff_is_consumed_once() {
        let mut storage = MemoryStorage::new();
        let handoff =
            CheckoutHandoff::from_cart(&cart(), Some(" CC-1042 ".to_owned()), ShippingMethod::Express);
        write(&mut storage, &handoff).unwrap();

        let taken = take(&mut storage).unwrap().unwrap();
        assert_eq!(taken, handoff);
        assert_eq!(taken.cost_center.as_deref(), Some("CC-1042"));
        assert_eq!(taken.shipping_cost, Decimal::from(14));

        assert!(take(&mut storage).unwrap().is_none());
    }

    #[test]
    fn test_handoff_json_shape() {
        let handoff = CheckoutHandoff::from_cart(&cart(), Some(String::new()), ShippingMethod::Free);
        let json = serde_json::to_value(&handoff).unwrap();
        assert_eq!(json["shippingMethod"], "free");
        assert!(json.get("costCenter").is_none());
        assert_eq!(json["items"][0]["model"], "XPS 13");
    }

    #[test]
    fn test_accepts_numeric_shipping_cost() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                keys::CART_CHECKOUT,
                r#"{"items":[],"shippingCost":14,"shippingMethod":"express"}"#.to_owned(),
            )
            .unwrap();
        let taken = take(&mut storage).unwrap().unwrap();
        assert_eq!(taken.shipping_method, ShippingMethod::Express);
        assert_eq!(taken.shipping_cost, Decimal::from(14));
    }

    #[test]
    fn test_stale_shipping_cost_follows_method() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                keys::CART_CHECKOUT,
                r#"{"items":[],"shippingCost":"99","shippingMethod":"free"}"#.to_owned(),
            )
            .unwrap();
        let taken = take(&mut storage).unwrap().unwrap();
        assert_eq!(taken.shipping_method, ShippingMethod::Free);
        assert_eq!(taken.shipping_cost, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_handoff_is_discarded() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(keys::CART_CHECKOUT, "[1, 2".to_owned())
            .unwrap();
        assert!(take(&mut storage).unwrap().is_none());
        assert_eq!(storage.get_item(keys::CART_CHECKOUT).unwrap(), None);
    }

    #[test]
    fn test_summary() {
        let cart = cart();
        let summary = CheckoutSummary::compute(
            cart.entries(),
            ShippingMethod::Express,
            ShippingType::Office,
            "Edmonton",
            CurrencyCode::CAD,
        );
        assert_eq!(summary.item_count, 3);
        // 1399 + 2 * round(239 * 1.35) = 1399 + 2 * 323
        assert_eq!(summary.totals.subtotal, Decimal::from(2045));
        assert_eq!(summary.totals.tax, Decimal::new(10225, 2));
        assert_eq!(summary.totals.shipping_cost, Decimal::from(19));
        assert_eq!(summary.totals.total, Decimal::new(216_625, 2));
    }
}
