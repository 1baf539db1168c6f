//! Order history and tracking pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitbay_core::orders::tracking::{self, Carrier, TrackingStep};
use kitbay_core::orders::{DISPLAY_DATE_FORMAT, Order, OrderItem};
use kitbay_core::pricing::PricedLine;
use kitbay_core::{CurrencyCode, OrderId, ShippingType};
use tracing::instrument;

use super::{PageContext, money};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Order line display data for templates.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub model: String,
    pub title: String,
    pub brand: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl OrderItemView {
    fn new(item: &OrderItem, currency: CurrencyCode) -> Self {
        Self {
            model: item.model_id.to_string(),
            title: item.title().to_string(),
            brand: item.brand_name.clone(),
            description: item
                .card_description
                .clone()
                .unwrap_or_else(|| item.description.clone()),
            image: item.image.clone(),
            quantity: item.quantity,
            price: money(item.unit_price(currency), currency),
            line_price: money(item.line_total(currency), currency),
        }
    }
}

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub order_number: String,
    pub order_date: String,
    pub ordered_by: String,
    pub ordered_for: String,
    pub ship_to: String,
    pub status: &'static str,
    pub badge: String,
    pub item_count: u32,
    pub items: Vec<OrderItemView>,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

impl OrderView {
    pub(crate) fn new(order: &Order, currency: CurrencyCode) -> Self {
        let totals = order.totals(currency);
        let address = &order.shipping_address;
        Self {
            id: order.id.to_string(),
            order_number: order.order_number.clone(),
            order_date: order.display_date(),
            ordered_by: order.ordered_by.clone(),
            ordered_for: order.ordered_for.clone(),
            ship_to: match address.shipping_type {
                ShippingType::Office => format!("{} office", address.address),
                ShippingType::Residential => address.address.clone(),
            },
            status: order.status.as_str(),
            badge: order.badge(),
            item_count: order.item_count(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView::new(item, currency))
                .collect(),
            subtotal: money(totals.subtotal, currency),
            tax: money(totals.tax, currency),
            shipping: money(totals.shipping_cost, currency),
            total: money(totals.total, currency),
        }
    }
}

/// Timeline step display data for templates.
#[derive(Debug, Clone)]
pub struct StepView {
    pub label: &'static str,
    pub description: String,
    pub completed: bool,
    pub current: bool,
    pub date: Option<String>,
}

impl From<TrackingStep> for StepView {
    fn from(step: TrackingStep) -> Self {
        Self {
            label: step.label,
            description: step.description,
            completed: step.completed,
            current: step.current,
            date: step
                .date
                .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string()),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderView>,
}

/// Tracking page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/track.html")]
pub struct OrderTrackTemplate {
    pub page: PageContext,
    pub order: OrderView,
    pub steps: Vec<StepView>,
    pub approver: &'static str,
    pub carrier: String,
    pub tracking_number: String,
}

/// Unknown order page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/not_found.html")]
pub struct OrderNotFoundTemplate {
    pub page: PageContext,
    pub id: String,
}

/// Order history, newest first.
#[instrument(skip(state, client))]
pub async fn index(State(state): State<AppState>, mut client: ClientStorage) -> impl IntoResponse {
    tokio::time::sleep(state.config().orders_min_delay).await;

    let page = PageContext::load(&mut client);
    let orders = state
        .orders()
        .orders()
        .iter()
        .map(|order| OrderView::new(order, page.currency))
        .collect();

    OrdersIndexTemplate { page, orders }
}

/// Tracking timeline for one order.
#[instrument(skip(state, client))]
pub async fn track(
    State(state): State<AppState>,
    mut client: ClientStorage,
    Path(id): Path<String>,
) -> Response {
    tokio::time::sleep(state.config().orders_min_delay).await;

    let page = PageContext::load(&mut client);
    let order_id = OrderId::new(id);
    let Some(order) = state.orders().order(&order_id) else {
        tracing::info!(order_id = %order_id, "order not found");
        return (
            StatusCode::NOT_FOUND,
            OrderNotFoundTemplate {
                page,
                id: order_id.into_inner(),
            },
        )
            .into_response();
    };

    OrderTrackTemplate {
        page,
        order: OrderView::new(&order, page.currency),
        steps: tracking::project(&order)
            .into_iter()
            .map(StepView::from)
            .collect(),
        approver: tracking::approver_for(&order.id),
        carrier: Carrier::for_order(&order.id).to_string(),
        tracking_number: tracking::tracking_number(&order.id),
    }
    .into_response()
}
