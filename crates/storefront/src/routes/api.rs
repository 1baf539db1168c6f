//! JSON API.
//!
//! Amounts are exact decimals serialized as strings; pages round them for
//! display, this API does not.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitbay_core::cart::CartEntry;
use kitbay_core::orders::Order;
use kitbay_core::orders::tracking::{self, Carrier, TrackingStep};
use kitbay_core::pricing::{ShippingMethod, TotalsByCurrency};
use kitbay_core::tax::{self, OfficeLocation};
use kitbay_core::{CurrencyCode, OrderId, ShippingType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Shipment parameters shared by the cart and tax endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ShipmentQuery {
    #[serde(default)]
    pub shipping_type: ShippingType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartEntry>,
    pub count: u32,
    pub has_laptop: bool,
    pub currency: CurrencyCode,
    pub totals: TotalsByCurrency,
}

/// Cart entries with totals in every currency.
#[instrument(skip(client))]
pub async fn cart(mut client: ClientStorage, Query(query): Query<ShipmentQuery>) -> Json<CartResponse> {
    let currency = client.currency();
    let store = client.cart();
    let items = store.entries().to_vec();
    let totals = TotalsByCurrency::for_lines(
        &items,
        query.shipping_type,
        &query.location,
        query.shipping_method,
    );

    Json(CartResponse {
        count: store.count(),
        has_laptop: store.has_laptop(),
        items,
        currency,
        totals,
    })
}

/// Tax query parameters.
#[derive(Debug, Deserialize)]
pub struct TaxQuery {
    #[serde(default)]
    pub shipping_type: ShippingType,
    #[serde(default)]
    pub location: String,
    pub subtotal: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResponse {
    pub shipping_type: ShippingType,
    pub location: String,
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<&'static OfficeLocation>,
}

/// Rate, and tax when a subtotal is given, for a shipment.
#[instrument]
pub async fn tax(Query(query): Query<TaxQuery>) -> Result<Json<TaxResponse>> {
    let subtotal = query
        .subtotal
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<Decimal>()
                .map_err(|_| AppError::BadRequest(format!("invalid subtotal {raw}")))
        })
        .transpose()?;

    let office = match query.shipping_type {
        ShippingType::Office => tax::office_location(&query.location),
        ShippingType::Residential => None,
    };

    Ok(Json(TaxResponse {
        shipping_type: query.shipping_type,
        rate: tax::rate_for(query.shipping_type, &query.location),
        tax: subtotal.map(|amount| tax::tax(amount, query.shipping_type, &query.location)),
        subtotal,
        location: query.location,
        office,
    }))
}

/// Every office with its tax rate.
pub async fn offices() -> Json<&'static [OfficeLocation]> {
    Json(tax::office_locations())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order: Order,
    pub totals: TotalsByCurrency,
    pub timeline: Vec<TrackingStep>,
    pub approver: &'static str,
    pub carrier: Carrier,
    pub tracking_number: String,
}

/// One order with totals and its tracking timeline.
#[instrument(skip(state))]
pub async fn order(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = OrderId::new(id);
    let Some(order) = state.orders().order(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("order {id} not found") })),
        )
            .into_response();
    };

    Json(OrderResponse {
        totals: order.totals_by_currency(),
        timeline: tracking::project(&order),
        approver: tracking::approver_for(&order.id),
        carrier: Carrier::for_order(&order.id),
        tracking_number: tracking::tracking_number(&order.id),
        order,
    })
    .into_response()
}
