//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Catalog
//! GET  /                       - Categories and recent orders
//! GET  /category/{slug}        - Products in a category
//! GET  /product/{model}        - Product detail and specifications
//!
//! # Cart (HTMX fragments for mutations)
//! GET  /cart                   - Cart page with recommendations
//! POST /cart/add               - Add a catalog product (409 on a second laptop)
//! POST /cart/update            - Set a line quantity
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge fragment
//! POST /cart/checkout          - Hand the cart to checkout
//!
//! # Checkout
//! GET  /checkout               - Checkout summary (consumes the handoff)
//!
//! # Currency
//! POST /currency               - Set the display currency
//! POST /currency/toggle        - Cycle USD -> CAD -> EUR
//!
//! # Orders
//! GET  /orders                 - Order history
//! GET  /orders/track/{id}      - Tracking timeline
//!
//! # Compare
//! GET  /compare/{model}        - Side-by-side comparison
//!
//! # JSON API
//! GET  /api/cart               - Cart entries and totals
//! GET  /api/tax                - Tax rate and amount for a shipment
//! GET  /api/offices            - Office table
//! GET  /api/orders/{id}        - Order, totals and timeline
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod compare;
pub mod currency;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use kitbay_core::catalog::Product;
use kitbay_core::pricing;
use kitbay_core::{CurrencyCode, Price};
use rust_decimal::Decimal;

use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Header values shared by every full page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext {
    pub currency: CurrencyCode,
    pub cart_count: u32,
}

impl PageContext {
    /// Read the currency and cart badge from the client's storage.
    pub fn load(client: &mut ClientStorage) -> Self {
        let cart_count = client.cart().count();
        Self {
            currency: client.currency(),
            cart_count,
        }
    }

    #[must_use]
    pub const fn currency_code(&self) -> &'static str {
        self.currency.code()
    }

    #[must_use]
    pub const fn next_currency_code(&self) -> &'static str {
        self.currency.next().code()
    }
}

/// Format an amount the way every page shows money: whole units with the
/// currency symbol.
#[must_use]
pub fn money(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display_whole()
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
pub async fn health() -> &'static str {
    "ok"
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/checkout", post(cart::checkout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/track/{id}", get(orders::track))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(api::cart))
        .route("/tax", get(api::tax))
        .route("/offices", get(api::offices))
        .route("/orders/{id}", get(api::order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(products::home))
        .route("/category/{slug}", get(products::category))
        .route("/product/{model}", get(products::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show))
        .route("/currency", post(currency::set))
        .route("/currency/toggle", post(currency::toggle))
        .nest("/orders", order_routes())
        .route("/compare/{model}", get(compare::show))
        .nest("/api", api_routes())
}

/// Catalog product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub model: String,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub summary: String,
    pub image: String,
    pub price: String,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode) -> Self {
        let explicit = match currency {
            CurrencyCode::CAD => product.price_cad,
            CurrencyCode::USD | CurrencyCode::EUR => None,
        };
        Self {
            model: product.model.to_string(),
            title: product
                .display_name
                .clone()
                .unwrap_or_else(|| product.model.to_string()),
            brand: product.manufacturer.clone(),
            category: product.category.clone(),
            summary: product.summary(),
            image: product.image_path(),
            price: money(pricing::convert(product.price_usd, currency, explicit), currency),
        }
    }
}
