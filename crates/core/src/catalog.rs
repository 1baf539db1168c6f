//! Product catalog and the suggestion heuristics built on it.
//!
//! The catalog is read-only reference data. Suggestions follow catalog order,
//! so the same cart always yields the same list.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartEntry};
use crate::de;
use crate::types::ModelId;

/// Default number of products shown next to the one being compared.
pub const DEFAULT_COMPARE_LIMIT: usize = 2;

/// Default number of cart suggestions.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

/// URL slug for a category, e.g. `Docking Station` becomes
/// `docking-station`.
#[must_use]
pub fn category_slug(category: &str) -> String {
    category
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// One category with the number of products in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// A labelled value on the product detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spec {
    pub label: &'static str,
    pub value: String,
}

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate model in catalog: {0}")]
    DuplicateModel(ModelId),
}

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub manufacturer: String,
    pub model: ModelId,
    pub category: String,
    #[serde(deserialize_with = "de::decimal")]
    pub price_usd: Decimal,
    #[serde(
        default,
        deserialize_with = "de::option_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_cad: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Model of the compatible docking station (laptops only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dock: Option<String>,
}

impl Product {
    /// Image path, derived from manufacturer and model when not set.
    #[must_use]
    pub fn image_path(&self) -> String {
        self.image.clone().unwrap_or_else(|| {
            let model: String = self
                .model
                .as_str()
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_");
            format!("/images/{}_{model}.png", self.manufacturer.to_lowercase())
        })
    }

    /// Description, falling back to "manufacturer model".
    #[must_use]
    pub fn summary(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.manufacturer, self.model))
    }

    /// Whether this is a docking station.
    #[must_use]
    pub fn is_dock(&self) -> bool {
        self.category.to_lowercase().contains("dock")
    }

    /// Whether this product is the docking station named by `dock`.
    ///
    /// Dock names in laptop records are written loosely, so a match is an
    /// exact name, a name containing `dock`, or `dock` containing the last
    /// word of this product's model.
    /// A blank `dock` matches nothing.
    #[must_use]
    pub fn matches_dock(&self, dock: &str) -> bool {
        let dock = dock.trim();
        if dock.is_empty() {
            return false;
        }
        let model = self.model.as_str();
        if model == dock || model.contains(dock) {
            return true;
        }
        model
            .split_whitespace()
            .next_back()
            .is_some_and(|last| dock.contains(last))
    }

    /// Specification rows for the detail page. Optional fields are left out
    /// when absent.
    #[must_use]
    pub fn specs(&self) -> Vec<Spec> {
        let mut specs = vec![
            Spec {
                label: "Brand",
                value: self.manufacturer.clone(),
            },
            Spec {
                label: "Model",
                value: self.model.to_string(),
            },
            Spec {
                label: "Category",
                value: self.category.clone(),
            },
        ];
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            specs.push(Spec {
                label: "Description",
                value: description.to_owned(),
            });
        }
        if let Some(dock) = self.dock_name() {
            specs.push(Spec {
                label: "Compatible dock",
                value: dock.to_owned(),
            });
        }
        specs
    }

    /// The compatible dock named in this record, if any.
    #[must_use]
    pub fn dock_name(&self) -> Option<&str> {
        self.dock.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

/// Build a cart entry (quantity 1) from a catalog product.
#[must_use]
pub fn to_cart_entry(product: &Product) -> CartEntry {
    let summary = product.summary();
    CartEntry {
        unit_price_cad: product.price_cad,
        display_name: product.display_name.clone(),
        description: Some(summary.clone()),
        card_description: Some(summary),
        image: Some(product.image_path()),
        ..CartEntry::new(
            product.model.clone(),
            product.manufacturer.clone(),
            product.category.clone(),
            product.price_usd,
        )
    }
}

/// The product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting repeated models.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateModel`] for the first repeated model.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.model.as_str()) {
                return Err(CatalogError::DuplicateModel(product.model.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the JSON is invalid or has duplicates.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by exact model.
    #[must_use]
    pub fn find(&self, model: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.model.as_str() == model)
    }

    /// Products in `category`, ignoring case.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Categories in order of first appearance, grouped ignoring case.
    #[must_use]
    pub fn categories(&self) -> Vec<CategorySummary> {
        let mut categories: Vec<CategorySummary> = Vec::new();
        for product in &self.products {
            let slug = category_slug(&product.category);
            if let Some(existing) = categories.iter_mut().find(|c| c.slug == slug) {
                existing.count += 1;
            } else {
                categories.push(CategorySummary {
                    name: product.category.clone(),
                    slug,
                    count: 1,
                });
            }
        }
        categories
    }

    /// Category name for a URL slug.
    #[must_use]
    pub fn category_for_slug(&self, slug: &str) -> Option<&str> {
        let slug = slug.to_lowercase();
        self.products
            .iter()
            .find(|p| category_slug(&p.category) == slug)
            .map(|p| p.category.as_str())
    }

    /// Products to show next to `model` on the comparison page: other
    /// products in the same category first, then anything else.
    ///
    /// Returns an empty list when `model` is not in the catalog.
    #[must_use]
    pub fn compare_candidates(&self, model: &str, limit: usize) -> Vec<&Product> {
        let Some(selected) = self.find(model) else {
            return Vec::new();
        };
        let others = || self.products.iter().filter(|p| p.model != selected.model);
        others()
            .filter(|p| p.category == selected.category)
            .chain(others().filter(|p| p.category != selected.category))
            .take(limit)
            .collect()
    }

    /// Suggestions for the cart page.
    ///
    /// Compatible docks for products in the cart come first. Without any,
    /// products not already in the cart that share a brand or category with
    /// a cart entry are suggested instead.
    #[must_use]
    pub fn recommendations(&self, cart: &Cart, limit: usize) -> Vec<&Product> {
        let docks = self.compatible_docks(cart);
        if !docks.is_empty() {
            return docks.into_iter().take(limit).collect();
        }

        let brands: HashSet<&str> = cart.entries().iter().map(|e| e.brand_name.as_str()).collect();
        let categories: HashSet<&str> = cart
            .entries()
            .iter()
            .map(|e| e.category_tag.as_str())
            .collect();

        self.products
            .iter()
            .filter(|p| cart.get(&p.model).is_none())
            .filter(|p| {
                brands.contains(p.manufacturer.as_str()) || categories.contains(p.category.as_str())
            })
            .take(limit)
            .collect()
    }

    fn compatible_docks(&self, cart: &Cart) -> Vec<&Product> {
        let mut docks: Vec<&Product> = Vec::new();
        for entry in cart.entries() {
            let Some(dock) = self.find(entry.model_id.as_str()).and_then(Product::dock_name)
            else {
                continue;
            };
            let found = self
                .products
                .iter()
                .filter(|p| p.is_dock())
                .find(|p| p.matches_dock(dock));
            if let Some(found) = found {
                if !docks.iter().any(|d| d.model == found.model) {
                    docks.push(found);
                }
            } else {
                tracing::debug!(laptop = %entry.model_id, dock, "no catalog match for dock");
            }
        }
        docks
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"manufacturer": "Lenovo", "model": "ThinkPad X1 Carbon Gen 12", "category": "laptop",
         "price_usd": "1,899", "price_cad": 2549, "dock": "ThinkPad Thunderbolt 4 Dock"},
        {"manufacturer": "Apple", "model": "MacBook Pro 14", "category": "laptop",
         "price_usd": 1999, "dock": "CalDigit TS4"},
        {"manufacturer": "Dell", "model": "U2723QE", "category": "monitor", "price_usd": 579},
        {"manufacturer": "Lenovo", "model": "Lenovo ThinkPad Thunderbolt 4 Dock", "category": "docking station",
         "price_usd": 289},
        {"manufacturer": "CalDigit", "model": "Thunderbolt Station TS4", "category": "docking station",
         "price_usd": 399.99},
        {"manufacturer": "Jabra", "model": "Evolve2 65", "category": "headset", "price_usd": 229}
    ]"#;

    fn catalog() -> Catalog {
        Catalog::from_json(CATALOG).unwrap()
    }

    fn models(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.model.to_string()).collect()
    }

    fn cart_of(catalog: &Catalog, models: &[&str]) -> Cart {
        let mut cart = Cart::new();
        for model in models {
            cart.add(to_cart_entry(catalog.find(model).unwrap()), 1).unwrap();
        }
        cart
    }

    #[test]
    fn test_duplicate_models_rejected() {
        let json = r#"[
            {"manufacturer": "Dell", "model": "U2723QE", "category": "monitor", "price_usd": 579},
            {"manufacturer": "Dell", "model": "U2723QE", "category": "monitor", "price_usd": 579}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateModel(_))
        ));
    }

    #[test]
    fn test_compare_candidates_prefer_same_category() {
        let catalog = catalog();
        assert_eq!(
            models(&catalog.compare_candidates("Evolve2 65", 2)),
            vec!["ThinkPad X1 Carbon Gen 12", "MacBook Pro 14"]
        );
        assert_eq!(
            models(&catalog.compare_candidates("Thunderbolt Station TS4", 2)),
            vec!["Lenovo ThinkPad Thunderbolt 4 Dock", "ThinkPad X1 Carbon Gen 12"]
        );
        assert!(catalog.compare_candidates("unknown", 2).is_empty());
    }

    #[test]
    fn test_recommends_compatible_docks() {
        let catalog = catalog();
        let cart = cart_of(&catalog, &["ThinkPad X1 Carbon Gen 12", "U2723QE"]);
        assert_eq!(
            models(&catalog.recommendations(&cart, 3)),
            vec!["Lenovo ThinkPad Thunderbolt 4 Dock"]
        );
    }

    #[test]
    fn test_dock_matches_by_last_word() {
        let catalog = catalog();
        let cart = cart_of(&catalog, &["MacBook Pro 14"]);
        assert_eq!(
            models(&catalog.recommendations(&cart, 3)),
            vec!["Thunderbolt Station TS4"]
        );
    }

    #[test]
    fn test_blank_dock_matches_nothing() {
        for dock in ["", "  "] {
            let json = serde_json::json!([
                {"manufacturer": "Framework", "model": "Laptop 13", "category": "laptop",
                 "price_usd": 1049, "dock": dock},
                {"manufacturer": "CalDigit", "model": "Thunderbolt Station TS4",
                 "category": "docking station", "price_usd": 399.99}
            ]);
            let catalog = Catalog::from_json(&json.to_string()).unwrap();
            assert_eq!(catalog.find("Laptop 13").unwrap().dock_name(), None);
            assert!(!catalog.find("Thunderbolt Station TS4").unwrap().matches_dock(dock));

            let cart = cart_of(&catalog, &["Laptop 13"]);
            assert!(catalog.recommendations(&cart, 3).is_empty());
        }
    }

    #[test]
    fn test_falls_back_to_brand_and_category() {
        let catalog = catalog();
        let cart = cart_of(&catalog, &["U2723QE", "Evolve2 65"]);
        assert!(catalog.recommendations(&cart, 3).is_empty());

        let mut cart = Cart::new();
        cart.add(CartEntry::new("P2422H", "Dell", "monitor", Decimal::from(229)), 1)
            .unwrap();
        assert_eq!(models(&catalog.recommendations(&cart, 3)), vec!["U2723QE"]);
    }

    #[test]
    fn test_to_cart_entry_fills_defaults() {
        let catalog = catalog();
        let entry = to_cart_entry(catalog.find("ThinkPad X1 Carbon Gen 12").unwrap());
        assert!(entry.is_laptop());
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.unit_price_usd, Decimal::from(1899));
        assert_eq!(entry.unit_price_cad, Some(Decimal::from(2549)));
        assert_eq!(
            entry.image.as_deref(),
            Some("/images/lenovo_thinkpad_x1_carbon_gen_12.png")
        );
        assert_eq!(
            entry.description.as_deref(),
            Some("Lenovo ThinkPad X1 Carbon Gen 12")
        );
    }

    #[test]
    fn test_by_category() {
        let catalog = catalog();
        assert_eq!(catalog.by_category("Docking Station").count(), 2);
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_categories_and_slugs() {
        let catalog = catalog();
        let summary: Vec<(String, usize)> = catalog
            .categories()
            .into_iter()
            .map(|c| (c.slug, c.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("laptop".to_owned(), 2),
                ("monitor".to_owned(), 1),
                ("docking-station".to_owned(), 2),
                ("headset".to_owned(), 1),
            ]
        );
        assert_eq!(category_slug(" Keyboard and  Mouse "), "keyboard-and-mouse");
        assert_eq!(catalog.category_for_slug("Docking-Station"), Some("docking station"));
        assert_eq!(catalog.category_for_slug("webcam"), None);
    }

    #[test]
    fn test_specs() {
        let catalog = catalog();
        let labels = |model: &str| -> Vec<&'static str> {
            catalog.find(model).unwrap().specs().iter().map(|s| s.label).collect()
        };
        assert_eq!(
            labels("ThinkPad X1 Carbon Gen 12"),
            vec!["Brand", "Model", "Category", "Compatible dock"]
        );
        assert_eq!(labels("U2723QE"), vec!["Brand", "Model", "Category"]);
    }
}
