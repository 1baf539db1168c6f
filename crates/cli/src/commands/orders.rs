//! Order history commands.
//!
//! # Usage
//!
//! ```bash
//! kitbay orders list
//! kitbay orders list --status by-age
//! kitbay orders track a1b2c3d4-e5f6-7890-abcd-ef1234567890
//! ```

use std::fmt::Write as _;

use kitbay_core::orders::OrderSource;
use kitbay_core::orders::tracking::{self, Carrier};
use kitbay_core::{CurrencyCode, OrderId, Price};

use super::CliError;

/// One line per order, newest first.
pub fn list(source: &impl OrderSource, currency: CurrencyCode) -> String {
    let orders = source.orders();
    if orders.is_empty() {
        return "No orders.".to_string();
    }

    let mut out = String::new();
    for order in &orders {
        let _ = writeln!(
            out,
            "#{:<8} {:<13} {:<20} {:>3} item(s) {:>12}  {}",
            order.order_number,
            order.display_date(),
            order.ordered_for,
            order.item_count(),
            Price::new(order.totals(currency).total, currency).display_cents(),
            order.badge()
        );
    }
    out.trim_end().to_string()
}

/// Tracking timeline for one order.
///
/// # Errors
///
/// Returns an error if no order has this id.
pub fn track(source: &impl OrderSource, id: &str) -> Result<String, CliError> {
    let order_id = OrderId::new(id);
    let order = source
        .order(&order_id)
        .ok_or_else(|| CliError::UnknownOrder(id.to_string()))?;

    let mut out = format!(
        "Order #{} placed {} by {} for {}\nApprover: {}\nCarrier: {} {}\n",
        order.order_number,
        order.display_date(),
        order.ordered_by,
        order.ordered_for,
        tracking::approver_for(&order.id),
        Carrier::for_order(&order.id),
        tracking::tracking_number(&order.id),
    );

    for step in tracking::project(&order) {
        let marker = if step.current {
            ">"
        } else if step.completed {
            "x"
        } else {
            " "
        };
        let date = step
            .date
            .map(|d| d.format(kitbay_core::orders::DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "[{marker}] {:<22} {:<13} {}", step.label, date, step.description);
    }
    Ok(out.trim_end().to_string())
}
