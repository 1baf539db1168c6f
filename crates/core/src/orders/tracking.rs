//! Tracking timeline for an order.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::Order;
use crate::types::{OrderId, OrderStatus};

/// People who approve hardware orders.
pub const APPROVERS: [&str; 5] = [
    "Sarah Johnson",
    "Michael Chen",
    "Emily Rodriguez",
    "David Thompson",
    "Lisa Anderson",
];

/// One step of the four-step lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub status: OrderStatus,
    pub label: &'static str,
    pub description: String,
    /// Strictly before the order's current status.
    pub completed: bool,
    pub current: bool,
    /// Set for completed and current steps only.
    pub date: Option<NaiveDate>,
}

/// Build the timeline for `order` from its (already assigned) status.
///
/// Step `i` is dated `order_date + i` days once it has been reached.
#[must_use]
pub fn project(order: &Order) -> Vec<TrackingStep> {
    let current = order.status.index();
    let approver = approver_for(&order.id);

    OrderStatus::ALL
        .iter()
        .enumerate()
        .map(|(index, &status)| {
            let reached = index <= current;
            TrackingStep {
                status,
                label: status.label(),
                description: step_description(status, approver),
                completed: index < current,
                current: index == current,
                date: reached
                    .then(|| {
                        u64::try_from(index)
                            .ok()
                            .and_then(|days| order.order_date.checked_add_days(Days::new(days)))
                    })
                    .flatten(),
            }
        })
        .collect()
}

fn step_description(status: OrderStatus, approver: &str) -> String {
    match status {
        OrderStatus::PendingApproval => {
            format!("Your order is being reviewed for approval by {approver}")
        }
        OrderStatus::OrderSentToVendor => {
            "Order has been approved and sent to the vendor".to_owned()
        }
        OrderStatus::OrderShipped => "Your order is on its way".to_owned(),
        OrderStatus::OrderDelivered => "Your order has been delivered".to_owned(),
    }
}

/// 32-bit rolling hash (`h = h * 31 + unit`) over the UTF-16 code units.
fn id_hash(id: &str) -> i32 {
    id.encode_utf16().fold(0_i32, |h, unit| {
        h.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Approver for an order. The same id always gets the same person.
#[must_use]
pub fn approver_for(id: &OrderId) -> &'static str {
    let hash = id_hash(id.as_str()).unsigned_abs();
    let slot = usize::try_from(hash).unwrap_or_default() % APPROVERS.len();
    APPROVERS.get(slot).copied().unwrap_or_default()
}

/// Shipping carrier shown on the tracking page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Carrier {
    #[serde(rename = "UPS")]
    Ups,
    #[serde(rename = "FedEx")]
    FedEx,
}

impl Carrier {
    /// Carrier for an order, chosen from the id hash.
    #[must_use]
    pub fn for_order(id: &OrderId) -> Self {
        if id_hash(id.as_str()) & 1 == 0 {
            Self::Ups
        } else {
            Self::FedEx
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ups => write!(f, "UPS"),
            Self::FedEx => write!(f, "FedEx"),
        }
    }
}

/// Tracking number: carrier plus the first 12 characters of the id with
/// dashes removed, upper-cased. `UPS-A1B2C3D4E5F6`.
#[must_use]
pub fn tracking_number(id: &OrderId) -> String {
    let short: String = id
        .as_str()
        .chars()
        .filter(|c| *c != '-')
        .take(12)
        .collect::<String>()
        .to_uppercase();
    format!("{}-{short}", Carrier::for_order(id))
}
