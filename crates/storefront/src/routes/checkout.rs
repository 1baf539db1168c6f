//! Checkout page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use kitbay_core::ShippingType;
use kitbay_core::checkout::{self, CheckoutSummary};
use kitbay_core::tax;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::cart::CartItemView;
use super::{PageContext, money};
use crate::error::Result;
use crate::filters;
use crate::middleware::ClientStorage;

/// Where the order ships.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub shipping_type: ShippingType,
    #[serde(default)]
    pub location: String,
}

/// Checkout summary display data.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub item_count: u32,
    pub shipping_method: String,
    pub shipping_type: String,
    pub location: String,
    pub tax_rate: String,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub items: Vec<CartItemView>,
    pub cost_center: Option<String>,
    pub summary: SummaryView,
}

/// Show the checkout summary.
///
/// The handoff is consumed on first view; without one the visitor goes back
/// to the cart.
#[instrument(skip(client))]
pub async fn show(mut client: ClientStorage, Query(query): Query<CheckoutQuery>) -> Result<Response> {
    let page = PageContext::load(&mut client);
    let handoff = checkout::take(client.storage_mut())?;
    client.save().await?;

    let Some(handoff) = handoff else {
        tracing::debug!("no checkout handoff, back to cart");
        return Ok(Redirect::to("/cart").into_response());
    };

    let currency = page.currency;
    let summary = CheckoutSummary::compute(
        &handoff.items,
        handoff.shipping_method,
        query.shipping_type,
        &query.location,
        currency,
    );
    let rate = tax::rate_for(query.shipping_type, &query.location) * Decimal::ONE_HUNDRED;

    let totals = summary.totals;
    Ok(CheckoutTemplate {
        page,
        items: handoff
            .items
            .iter()
            .map(|item| CartItemView::new(item, currency))
            .collect(),
        cost_center: handoff.cost_center,
        summary: SummaryView {
            item_count: summary.item_count,
            shipping_method: summary.shipping_method.to_string(),
            shipping_type: query.shipping_type.to_string(),
            location: query.location,
            tax_rate: format!("{}%", rate.normalize()),
            subtotal: money(totals.subtotal, currency),
            tax: money(totals.tax, currency),
            shipping: money(totals.shipping_cost, currency),
            total: money(totals.total, currency),
        },
    }
    .into_response())
}
