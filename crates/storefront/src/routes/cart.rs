//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the client's storage under the `cart` key.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use kitbay_core::cart::{Cart, CartEntry};
use kitbay_core::catalog::{DEFAULT_RECOMMENDATION_LIMIT, to_cart_entry};
use kitbay_core::checkout::CheckoutHandoff;
use kitbay_core::pricing::{PricedLine, ShippingMethod};
use kitbay_core::tax::office_locations;
use kitbay_core::{CurrencyCode, ModelId, ShippingType};
use serde::Deserialize;
use tracing::instrument;

use super::{PageContext, ProductView, money};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub model: String,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub is_laptop: bool,
}

impl CartItemView {
    #[must_use]
    pub fn new(entry: &CartEntry, currency: CurrencyCode) -> Self {
        Self {
            model: entry.model_id.to_string(),
            title: entry.title().to_string(),
            brand: entry.brand_name.clone(),
            category: entry.category_tag.clone(),
            description: entry
                .card_description
                .clone()
                .or_else(|| entry.description.clone()),
            image: entry.image.clone(),
            quantity: entry.quantity,
            price: money(entry.unit_price(currency), currency),
            line_price: money(entry.line_total(currency), currency),
            is_laptop: entry.is_laptop(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub has_laptop: bool,
}

impl CartView {
    /// Build the view of `cart` in `currency`.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .entries()
                .iter()
                .map(|entry| CartItemView::new(entry, currency))
                .collect(),
            subtotal: money(cart.subtotal(currency), currency),
            item_count: cart.count(),
            has_laptop: cart.has_laptop(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub model: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub model: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub model: String,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub shipping_type: ShippingType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    pub cost_center: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub recommendations: Vec<ProductView>,
    pub offices: Vec<&'static str>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Respond with the cart items fragment and tell the page the cart changed.
fn items_fragment(cart: &Cart, currency: CurrencyCode) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::new(cart, currency),
        },
    )
        .into_response()
}

/// Display cart page.
#[instrument(skip(state, client))]
pub async fn show(State(state): State<AppState>, mut client: ClientStorage) -> impl IntoResponse {
    let page = PageContext::load(&mut client);
    let store = client.cart();

    let recommendations = state
        .catalog()
        .recommendations(store.cart(), DEFAULT_RECOMMENDATION_LIMIT)
        .into_iter()
        .map(|product| ProductView::new(product, page.currency))
        .collect();

    CartShowTemplate {
        page,
        cart: CartView::new(store.cart(), page.currency),
        recommendations,
        offices: office_locations().iter().map(|office| office.name).collect(),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the new count badge with an HTMX trigger so other elements
/// refresh. A second laptop is rejected with 409.
#[instrument(skip(state, client))]
pub async fn add(
    State(state): State<AppState>,
    mut client: ClientStorage,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find(form.model.trim())
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.model)))?;

    let (event, count) = {
        let mut store = client.cart();
        let event = store.add(to_cart_entry(product), form.quantity.unwrap_or(1))?;
        (event, store.count())
    };
    client.save().await?;

    add_breadcrumb("cart", &event.notice(), Some(&[("model", product.model.as_str())]));
    tracing::info!(model = %product.model, count, "added to cart");

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(client))]
pub async fn update(mut client: ClientStorage, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let currency = client.currency();
    let cart = {
        let mut store = client.cart();
        store.set_quantity(&ModelId::new(form.model), form.quantity)?;
        store.cart().clone()
    };
    client.save().await?;

    Ok(items_fragment(&cart, currency))
}

/// Remove item from cart (HTMX).
#[instrument(skip(client))]
pub async fn remove(
    mut client: ClientStorage,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let currency = client.currency();
    let (event, cart) = {
        let mut store = client.cart();
        let event = store.remove(&ModelId::new(form.model))?;
        (event, store.cart().clone())
    };
    client.save().await?;

    add_breadcrumb("cart", &event.notice(), None);
    Ok(items_fragment(&cart, currency))
}

/// Empty the cart (HTMX).
#[instrument(skip(client))]
pub async fn clear(mut client: ClientStorage) -> Result<Response> {
    let currency = client.currency();
    client.cart().clear()?;
    client.save().await?;

    tracing::info!("cart cleared");
    Ok(items_fragment(&Cart::new(), currency))
}

/// Get cart count badge (HTMX).
#[instrument(skip(client))]
pub async fn count(mut client: ClientStorage) -> impl IntoResponse {
    CartCountTemplate {
        count: client.cart().count(),
    }
}

/// Hand the cart to the checkout page.
///
/// Writes the checkout handoff and redirects; an empty cart goes back to
/// the cart page.
#[instrument(skip(client))]
pub async fn checkout(mut client: ClientStorage, Form(form): Form<CheckoutForm>) -> Result<Response> {
    let handoff = {
        let store = client.cart();
        if store.cart().is_empty() {
            return Ok(Redirect::to("/cart").into_response());
        }
        CheckoutHandoff::from_cart(store.cart(), form.cost_center, form.shipping_method)
    };
    kitbay_core::checkout::write(client.storage_mut(), &handoff)?;
    client.save().await?;

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("shipping_type", &form.shipping_type.to_string())
        .append_pair("location", &form.location)
        .finish();

    tracing::info!(items = handoff.items.len(), method = %handoff.shipping_method, "checkout started");
    Ok(Redirect::to(&format!("/checkout?{query}")).into_response())
}
