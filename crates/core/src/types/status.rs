//! Status enums for orders and shipping.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Variants are declared in lifecycle order; `Ord` follows that order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    PendingApproval,
    OrderSentToVendor,
    OrderShipped,
    OrderDelivered,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::PendingApproval,
        Self::OrderSentToVendor,
        Self::OrderShipped,
        Self::OrderDelivered,
    ];

    /// Position of this status in the lifecycle (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::PendingApproval => 0,
            Self::OrderSentToVendor => 1,
            Self::OrderShipped => 2,
            Self::OrderDelivered => 3,
        }
    }

    /// Machine-readable slug, e.g. `order-sent-to-vendor`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "pending-approval",
            Self::OrderSentToVendor => "order-sent-to-vendor",
            Self::OrderShipped => "order-shipped",
            Self::OrderDelivered => "order-delivered",
        }
    }

    /// Timeline heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingApproval => "Pending Approval",
            Self::OrderSentToVendor => "Order Sent to Vendor",
            Self::OrderShipped => "Order Shipped",
            Self::OrderDelivered => "Order Delivered",
        }
    }

    /// Short text used on status badges.
    #[must_use]
    pub const fn badge_text(self) -> &'static str {
        match self {
            Self::PendingApproval => "Pending approval",
            Self::OrderSentToVendor => "Order sent to vendor",
            Self::OrderShipped => "Order shipped",
            Self::OrderDelivered => "Order delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending-approval" => Ok(Self::PendingApproval),
            "order-sent-to-vendor" => Ok(Self::OrderSentToVendor),
            "order-shipped" => Ok(Self::OrderShipped),
            "order-delivered" => Ok(Self::OrderDelivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Where an order ships to.
///
/// Office shipments are taxed at the office's rate; residential shipments
/// always use the fallback rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingType {
    Residential,
    #[default]
    Office,
}

impl std::fmt::Display for ShippingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Residential => write!(f, "residential"),
            Self::Office => write!(f, "office"),
        }
    }
}

impl std::str::FromStr for ShippingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "residential" => Ok(Self::Residential),
            "office" => Ok(Self::Office),
            _ => Err(format!("invalid shipping type: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::OrderSentToVendor).unwrap();
        assert_eq!(json, "\"order-sent-to-vendor\"");

        let parsed: OrderStatus = serde_json::from_str("\"order-delivered\"").unwrap();
        assert_eq!(parsed, OrderStatus::OrderDelivered);
    }

    #[test]
    fn test_status_order_matches_index() {
        for (i, status) in OrderStatus::ALL.iter().enumerate() {
            assert_eq!(status.index(), i);
        }
        assert!(OrderStatus::PendingApproval < OrderStatus::OrderDelivered);
    }

    #[test]
    fn test_status_from_str_roundtrips_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_shipping_type_parse() {
        assert_eq!(
            "residential".parse::<ShippingType>().unwrap(),
            ShippingType::Residential
        );
        assert_eq!("office".parse::<ShippingType>().unwrap(), ShippingType::Office);
        assert!("warehouse".parse::<ShippingType>().is_err());
    }
}
