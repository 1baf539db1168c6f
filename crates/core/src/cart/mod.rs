//! Shopping cart.
//!
//! [`Cart`] holds the ordered entry list and enforces the cart rules:
//!
//! - at most one entry whose category is `laptop`,
//! - laptop entries always come before everything else; a new accessory is
//!   appended, and reordering never shuffles entries within a group,
//! - one entry per model; adding an existing model increases its quantity.
//!
//! [`CartStore`] wraps a cart with persistence and change notification.

mod store;

pub use store::{CartStore, SubscriptionId};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::de;
use crate::pricing::{self, PricedLine};
use crate::storage::StorageError;
use crate::types::{CurrencyCode, ModelId};

/// Category tag that is limited to one entry per cart.
pub const LAPTOP_CATEGORY: &str = "laptop";

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// A laptop is already in the cart.
    #[error(
        "You can only have one laptop in your cart. Please remove the existing laptop before adding a new one."
    )]
    LaptopConflict {
        /// The laptop already in the cart.
        existing: ModelId,
    },

    /// No entry with this model.
    #[error("{0} is not in the cart")]
    NotFound(ModelId),

    /// Quantities start at 1.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// The cart could not be written to storage.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

/// One product line in the cart.
///
/// Field names on the wire match the persisted `cart` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "model")]
    pub model_id: ModelId,
    #[serde(rename = "brand", default)]
    pub brand_name: String,
    #[serde(rename = "category", default)]
    pub category_tag: String,
    #[serde(rename = "price_usd", deserialize_with = "de::decimal")]
    pub unit_price_usd: Decimal,
    #[serde(
        rename = "price_cad",
        default,
        deserialize_with = "de::option_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price_cad: Option<Decimal>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Suggested alongside another item (e.g. a compatible dock).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recommended: bool,
}

const fn default_quantity() -> u32 {
    1
}

impl CartEntry {
    /// Create an entry with quantity 1 and no optional fields.
    #[must_use]
    pub fn new(
        model_id: impl Into<ModelId>,
        brand_name: impl Into<String>,
        category_tag: impl Into<String>,
        unit_price_usd: Decimal,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            brand_name: brand_name.into(),
            category_tag: category_tag.into(),
            unit_price_usd,
            unit_price_cad: None,
            quantity: 1,
            display_name: None,
            description: None,
            card_description: None,
            image: None,
            recommended: false,
        }
    }

    /// Set the CAD override price.
    #[must_use]
    pub const fn with_cad_price(mut self, price: Decimal) -> Self {
        self.unit_price_cad = Some(price);
        self
    }

    /// Whether this entry counts against the one-laptop rule.
    #[must_use]
    pub fn is_laptop(&self) -> bool {
        self.category_tag.eq_ignore_ascii_case(LAPTOP_CATEGORY)
    }

    /// Display name, falling back to the model.
    #[must_use]
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.model_id.as_str())
    }
}

impl PricedLine for CartEntry {
    fn unit_price_usd(&self) -> Decimal {
        self.unit_price_usd
    }

    fn unit_price_cad(&self) -> Option<Decimal> {
        self.unit_price_cad
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A successful cart change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// A new entry was inserted.
    Added { model_id: ModelId, quantity: u32 },
    /// An existing entry was added again.
    QuantityIncreased { model_id: ModelId, quantity: u32 },
    /// A quantity was set explicitly.
    QuantityUpdated { model_id: ModelId, quantity: u32 },
    /// An entry was deleted.
    Removed { model_id: ModelId },
    /// Every entry was deleted.
    Cleared,
}

impl CartEvent {
    /// Short notice for the user, e.g. `"U2723QE added to cart"`.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Added { model_id, .. } => format!("{model_id} added to cart"),
            Self::QuantityIncreased { model_id, .. } => {
                format!("{model_id} quantity updated in cart")
            }
            Self::QuantityUpdated { model_id, .. } => format!("{model_id} quantity updated"),
            Self::Removed { model_id } => format!("{model_id} removed from cart"),
            Self::Cleared => "Cart cleared".to_owned(),
        }
    }
}

/// Ordered cart entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from untrusted entries (e.g. restored from storage).
    ///
    /// Repairs anything the cart rules forbid: zero quantities become 1,
    /// repeated models are merged, laptops after the first are dropped and
    /// laptops are moved to the front.
    #[must_use]
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let mut cart = Self::new();
        for mut entry in entries {
            entry.quantity = entry.quantity.max(1);

            if let Some(existing) = cart.position(&entry.model_id) {
                if let Some(slot) = cart.entries.get_mut(existing) {
                    slot.quantity = slot.quantity.saturating_add(entry.quantity);
                }
                continue;
            }

            if entry.is_laptop() && cart.has_laptop() {
                tracing::warn!(
                    model = %entry.model_id,
                    "dropping extra laptop from restored cart"
                );
                continue;
            }

            cart.entries.push(entry);
        }
        cart.reorder();
        cart
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Consume the cart and return its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by model.
    #[must_use]
    pub fn get(&self, model_id: &ModelId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.model_id == model_id)
    }

    /// The laptop in the cart, if any.
    #[must_use]
    pub fn laptop(&self) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.is_laptop())
    }

    #[must_use]
    pub fn has_laptop(&self) -> bool {
        self.laptop().is_some()
    }

    /// Total number of units (sum of quantities, not entries).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |sum, e| sum.saturating_add(e.quantity))
    }

    /// Sum of line totals in `currency`.
    #[must_use]
    pub fn subtotal(&self, currency: CurrencyCode) -> Decimal {
        pricing::subtotal(&self.entries, currency)
    }

    /// Add `quantity` units of `item`.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is 0
    /// - [`CartError::LaptopConflict`] if `item` is a laptop and the cart
    ///   already holds one (even the same model)
    pub fn add(&mut self, item: CartEntry, quantity: u32) -> Result<CartEvent, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if item.is_laptop() {
            if let Some(existing) = self.laptop() {
                return Err(CartError::LaptopConflict {
                    existing: existing.model_id.clone(),
                });
            }
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.model_id == item.model_id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return Ok(CartEvent::QuantityIncreased {
                model_id: entry.model_id.clone(),
                quantity: entry.quantity,
            });
        }

        let model_id = item.model_id.clone();
        let is_laptop = item.is_laptop();
        let entry = CartEntry { quantity, ..item };
        if is_laptop {
            self.entries.insert(0, entry);
        } else {
            self.entries.push(entry);
        }

        Ok(CartEvent::Added { model_id, quantity })
    }

    /// Delete the entry for `model_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if there is no such entry.
    pub fn remove(&mut self, model_id: &ModelId) -> Result<CartEvent, CartError> {
        let index = self
            .position(model_id)
            .ok_or_else(|| CartError::NotFound(model_id.clone()))?;
        self.entries.remove(index);
        Ok(CartEvent::Removed {
            model_id: model_id.clone(),
        })
    }

    /// Set the quantity of an existing entry.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is 0
    /// - [`CartError::NotFound`] if there is no such entry
    pub fn set_quantity(
        &mut self,
        model_id: &ModelId,
        quantity: u32,
    ) -> Result<CartEvent, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.model_id == model_id)
            .ok_or_else(|| CartError::NotFound(model_id.clone()))?;
        entry.quantity = quantity;
        self.reorder();
        Ok(CartEvent::QuantityUpdated {
            model_id: model_id.clone(),
            quantity,
        })
    }

    /// Delete every entry.
    pub fn clear(&mut self) -> CartEvent {
        self.entries.clear();
        CartEvent::Cleared
    }

    fn position(&self, model_id: &ModelId) -> Option<usize> {
        self.entries.iter().position(|e| &e.model_id == model_id)
    }

    /// Stable partition: laptops first.
    fn reorder(&mut self) {
        let (laptops, others): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries)
                .into_iter()
                .partition(CartEntry::is_laptop);
        self.entries = laptops;
        self.entries.extend(others);
    }
}
