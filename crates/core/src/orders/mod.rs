//! Order history.
//!
//! Orders are read-only records served by an [`OrderSource`]. Their
//! displayed status is projected rather than stored: see [`StatusAssignment`]
//! and [`tracking::project`].

pub mod tracking;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;
use crate::pricing::{OrderTotals, PricedLine, ShippingMethod, TotalsByCurrency};
use crate::types::{CurrencyCode, ModelId, OrderId, OrderStatus, ShippingType};

/// Format used when showing order dates, e.g. `Dec 1, 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// Where an order ships to. For office shipments `address` is the office
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(rename = "type")]
    pub shipping_type: ShippingType,
    pub address: String,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "model")]
    pub model_id: ModelId,
    #[serde(rename = "brand")]
    pub brand_name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "price_usd", deserialize_with = "de::decimal")]
    pub unit_price_usd: Decimal,
    #[serde(
        rename = "price_cad",
        default,
        deserialize_with = "de::option_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price_cad: Option<Decimal>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_description: Option<String>,
}

impl OrderItem {
    #[must_use]
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.model_id.as_str())
    }
}

impl PricedLine for OrderItem {
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

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    #[serde(deserialize_with = "de::date")]
    pub order_date: NaiveDate,
    pub ordered_by: String,
    pub ordered_for: String,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    #[serde(
        default,
        deserialize_with = "de::option_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_date: Option<NaiveDate>,
    pub items: Vec<OrderItem>,
    /// Total as recorded when the order was placed (USD).
    #[serde(deserialize_with = "de::decimal")]
    pub total: Decimal,
}

impl Order {
    /// Totals in `currency`. Orders always ship free.
    #[must_use]
    pub fn totals(&self, currency: CurrencyCode) -> OrderTotals {
        OrderTotals::for_lines(
            &self.items,
            currency,
            self.shipping_address.shipping_type,
            &self.shipping_address.address,
            ShippingMethod::Free,
        )
    }

    /// Totals in every currency.
    #[must_use]
    pub fn totals_by_currency(&self) -> TotalsByCurrency {
        TotalsByCurrency::for_lines(
            &self.items,
            self.shipping_address.shipping_type,
            &self.shipping_address.address,
            ShippingMethod::Free,
        )
    }

    /// Total number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Badge text, with the delivery date for delivered orders.
    #[must_use]
    pub fn badge(&self) -> String {
        match (self.status, self.delivery_date) {
            (OrderStatus::OrderDelivered, Some(date)) => format!(
                "{} on {}",
                self.status.badge_text(),
                date.format(DISPLAY_DATE_FORMAT)
            ),
            _ => self.status.badge_text().to_owned(),
        }
    }

    #[must_use]
    pub fn display_date(&self) -> String {
        self.order_date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// How the displayed status of an order is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusAssignment {
    /// Use the status stored on the order.
    #[default]
    AsRecorded,
    /// Show every order with the same status.
    Fixed(OrderStatus),
    /// Older orders are further along.
    ByAge,
    /// Larger orders are further along.
    ByValue,
}

impl StatusAssignment {
    /// Status to display for `order` on `today`.
    #[must_use]
    pub fn assign(self, order: &Order, today: NaiveDate) -> OrderStatus {
        match self {
            Self::AsRecorded => order.status,
            Self::Fixed(status) => status,
            Self::ByAge => {
                let days = (today - order.order_date).num_days();
                match days {
                    14.. => OrderStatus::OrderDelivered,
                    7.. => OrderStatus::OrderShipped,
                    3.. => OrderStatus::OrderSentToVendor,
                    _ => OrderStatus::PendingApproval,
                }
            }
            Self::ByValue => {
                if order.total >= Decimal::from(1000) {
                    OrderStatus::OrderDelivered
                } else if order.total >= Decimal::from(500) {
                    OrderStatus::OrderShipped
                } else if order.total >= Decimal::from(200) {
                    OrderStatus::OrderSentToVendor
                } else {
                    OrderStatus::PendingApproval
                }
            }
        }
    }
}

impl std::str::FromStr for StatusAssignment {
    type Err = String;

    /// `none` or `as-recorded`, `by-age`, `by-value`, or a status name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "as-recorded" => Ok(Self::AsRecorded),
            "by-age" => Ok(Self::ByAge),
            "by-value" => Ok(Self::ByValue),
            other => other
                .parse::<OrderStatus>()
                .map(Self::Fixed)
                .map_err(|_| format!("invalid status assignment: {other}")),
        }
    }
}

/// Provides orders for display.
pub trait OrderSource {
    /// Every order, newest first.
    fn orders(&self) -> Vec<Order>;

    /// One order by id.
    fn order(&self, id: &OrderId) -> Option<Order>;
}

/// A fixed list of orders with a [`StatusAssignment`] applied on read.
#[derive(Debug, Clone, Default)]
pub struct StaticOrderSource {
    orders: Vec<Order>,
    assignment: StatusAssignment,
}

impl StaticOrderSource {
    #[must_use]
    pub fn new(mut orders: Vec<Order>) -> Self {
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Self {
            orders,
            assignment: StatusAssignment::AsRecorded,
        }
    }

    /// Parse a JSON array of orders.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the JSON does not describe orders.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    #[must_use]
    pub const fn with_assignment(mut self, assignment: StatusAssignment) -> Self {
        self.assignment = assignment;
        self
    }

    #[must_use]
    pub const fn assignment(&self) -> StatusAssignment {
        self.assignment
    }

    fn project(&self, order: &Order, today: NaiveDate) -> Order {
        Order {
            status: self.assignment.assign(order, today),
            ..order.clone()
        }
    }
}

impl OrderSource for StaticOrderSource {
    fn orders(&self) -> Vec<Order> {
        let today = Utc::now().date_naive();
        self.orders.iter().map(|o| self.project(o, today)).collect()
    }

    fn order(&self, id: &OrderId) -> Option<Order> {
        let today = Utc::now().date_naive();
        self.orders
            .iter()
            .find(|o| &o.id == id)
            .map(|o| self.project(o, today))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ORDERS: &str = r#"[
        {
            "id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890",
            "orderNumber": "100234",
            "orderDate": "Nov 20, 2024",
            "orderedBy": "Eve Adams",
            "orderedFor": "Frank Miller",
            "shippingAddress": {"type": "office", "address": "Montreal"},
            "status": "order-delivered",
            "deliveryDate": "Dec 15, 2024",
            "items": [
                {"model": "XPS 13", "brand": "Dell", "image": "/images/dell_xps_13.png",
                 "description": "13-inch laptop", "price_usd": "1,000", "quantity": 1,
                 "category": "laptop"}
            ],
            "total": 1149.75
        },
        {
            "id": "ffe0-22",
            "orderNumber": "100301",
            "orderDate": "2024-12-01",
            "orderedBy": "John Doe",
            "orderedFor": "Jane Smith",
            "shippingAddress": {"type": "residential", "address": "123 Main St"},
            "status": "pending-approval",
            "items": [
                {"model": "Evolve2 65", "brand": "Jabra", "price_usd": 229, "price_cad": 299,
                 "quantity": 2}
            ],
            "total": 491.20
        }
    ]"#;

    pub(crate) fn orders() -> Vec<Order> {
        serde_json::from_str(ORDERS).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_order_json_shape() {
        let orders = orders();
        assert_eq!(orders[0].order_date, day(2024, 11, 20));
        assert_eq!(orders[0].delivery_date, Some(day(2024, 12, 15)));
        assert_eq!(orders[1].shipping_address.shipping_type, ShippingType::Residential);

        let json = serde_json::to_value(&orders[1]).unwrap();
        assert_eq!(json["orderDate"], "2024-12-01");
        assert_eq!(json["shippingAddress"]["type"], "residential");
        assert!(json.get("deliveryDate").is_none());
    }

    #[test]
    fn test_totals_use_shipping_destination() {
        let orders = orders();
        let usd = orders[0].totals(CurrencyCode::USD);
        assert_eq!(usd.subtotal, Decimal::from(1000));
        assert_eq!(usd.tax, Decimal::new(14975, 2));
        assert_eq!(usd.shipping_cost, Decimal::ZERO);
        assert_eq!(usd.total, Decimal::new(114_975, 2));

        let cad = orders[1].totals(CurrencyCode::CAD);
        assert_eq!(cad.subtotal, Decimal::from(598));
        // 598 * 0.0725 = 43.355
        assert_eq!(cad.tax, Decimal::new(4336, 2));

        let all = orders[1].totals_by_currency();
        assert_eq!(all.get(CurrencyCode::CAD), &cad);
    }

    #[test]
    fn test_badge_includes_delivery_date() {
        let orders = orders();
        assert_eq!(orders[0].badge(), "Order delivered on Dec 15, 2024");
        assert_eq!(orders[1].badge(), "Pending approval");
        assert_eq!(orders[1].display_date(), "Dec 1, 2024");
    }

    #[test]
    fn test_assign_by_age() {
        let order = &orders()[1];
        let at = |d| StatusAssignment::ByAge.assign(order, d);
        assert_eq!(at(day(2024, 12, 2)), OrderStatus::PendingApproval);
        assert_eq!(at(day(2024, 12, 4)), OrderStatus::OrderSentToVendor);
        assert_eq!(at(day(2024, 12, 8)), OrderStatus::OrderShipped);
        assert_eq!(at(day(2024, 12, 15)), OrderStatus::OrderDelivered);
    }

    #[test]
    fn test_assign_by_value() {
        let mut order = orders()[1].clone();
        let today = day(2024, 12, 1);
        for (total, expected) in [
            (199, OrderStatus::PendingApproval),
            (200, OrderStatus::OrderSentToVendor),
            (500, OrderStatus::OrderShipped),
            (1000, OrderStatus::OrderDelivered),
        ] {
            order.total = Decimal::from(total);
            assert_eq!(StatusAssignment::ByValue.assign(&order, today), expected);
        }
    }

    #[test]
    fn test_static_source_applies_override() {
        let source = StaticOrderSource::from_json(ORDERS)
            .unwrap()
            .with_assignment(StatusAssignment::Fixed(OrderStatus::PendingApproval));

        let all = source.orders();
        assert_eq!(all.len(), 2);
        // newest first
        assert_eq!(all[0].order_number, "100301");
        assert!(all.iter().all(|o| o.status == OrderStatus::PendingApproval));

        let id = OrderId::new("a1b2c3d4-e5f6-7890-abcd-ef1234567890");
        assert_eq!(
            source.order(&id).unwrap().status,
            OrderStatus::PendingApproval
        );
        assert!(source.order(&OrderId::new("missing")).is_none());
    }

    #[test]
    fn test_parse_status_assignment() {
        assert_eq!(
            "none".parse::<StatusAssignment>().unwrap(),
            StatusAssignment::AsRecorded
        );
        assert_eq!(
            "order-shipped".parse::<StatusAssignment>().unwrap(),
            StatusAssignment::Fixed(OrderStatus::OrderShipped)
        );
        assert_eq!(
            "by-value".parse::<StatusAssignment>().unwrap(),
            StatusAssignment::ByValue
        );
        assert!("sometimes".parse::<StatusAssignment>().is_err());
    }
}
