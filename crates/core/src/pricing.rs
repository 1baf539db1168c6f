//! Currency conversion and order totals.
//!
//! Catalog prices are authored in USD, with an optional CAD override per
//! product. Other currencies are derived with fixed multipliers; there is no
//! live exchange-rate source.
//!
//! # Rounding order
//!
//! Totals are computed independently per currency, always in the same order:
//!
//! 1. each unit price is converted into the currency ([`convert`]), which
//!    rounds derived prices to whole units,
//! 2. the subtotal is the exact sum of unit price x quantity,
//! 3. tax is `round_cents(subtotal * rate)` in that currency,
//! 4. shipping is the method's flat fee in that currency,
//! 5. `total = subtotal + tax + shipping`, with no further rounding.
//!
//! Every currency therefore satisfies `total == subtotal + tax + shipping`,
//! and display code rounds the total to whole units only when rendering.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::tax;
use crate::types::{CurrencyCode, Price, ShippingType};

/// CAD per USD.
pub const CAD_PER_USD: Decimal = Decimal::from_parts(135, 0, 0, false, 2);

/// EUR per USD.
pub const EUR_PER_USD: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// Round half away from zero to 2 decimal places.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round half away from zero to whole units.
#[must_use]
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplier from USD into `currency`.
#[must_use]
pub const fn conversion_rate(currency: CurrencyCode) -> Decimal {
    match currency {
        CurrencyCode::USD => Decimal::ONE,
        CurrencyCode::CAD => CAD_PER_USD,
        CurrencyCode::EUR => EUR_PER_USD,
    }
}

/// Convert a USD amount into `target`.
///
/// An explicit currency-specific price wins. Otherwise USD amounts pass
/// through unchanged and other currencies are the rounded product of the
/// fixed multiplier.
#[must_use]
pub fn convert(amount_usd: Decimal, target: CurrencyCode, explicit: Option<Decimal>) -> Decimal {
    if let Some(amount) = explicit {
        return amount;
    }
    match target {
        CurrencyCode::USD => amount_usd,
        CurrencyCode::CAD | CurrencyCode::EUR => round_whole(amount_usd * conversion_rate(target)),
    }
}

/// `subtotal + tax + shipping`.
#[must_use]
pub fn total(subtotal: Decimal, tax: Decimal, shipping: Decimal) -> Decimal {
    subtotal + tax + shipping
}

/// Anything with a USD unit price and a quantity: cart entries, order items.
pub trait PricedLine {
    fn unit_price_usd(&self) -> Decimal;

    /// Explicit CAD price, when the catalog has one.
    fn unit_price_cad(&self) -> Option<Decimal>;

    fn quantity(&self) -> u32;

    /// Unit price in `currency`.
    fn unit_price(&self, currency: CurrencyCode) -> Decimal {
        let explicit = match currency {
            CurrencyCode::CAD => self.unit_price_cad(),
            CurrencyCode::USD | CurrencyCode::EUR => None,
        };
        convert(self.unit_price_usd(), currency, explicit)
    }

    /// Unit price x quantity in `currency`.
    fn line_total(&self, currency: CurrencyCode) -> Decimal {
        self.unit_price(currency) * Decimal::from(self.quantity())
    }
}

/// Sum of line totals in `currency`.
#[must_use]
pub fn subtotal<L: PricedLine>(lines: &[L], currency: CurrencyCode) -> Decimal {
    lines.iter().map(|line| line.line_total(currency)).sum()
}

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Free,
    Express,
}

impl ShippingMethod {
    /// Express fee in USD.
    pub const EXPRESS_FEE_USD: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

    /// Express fee in CAD.
    pub const EXPRESS_FEE_CAD: Decimal = Decimal::from_parts(19, 0, 0, false, 0);

    /// Flat fee for this method in `currency`.
    #[must_use]
    pub fn cost(self, currency: CurrencyCode) -> Decimal {
        match self {
            Self::Free => Decimal::ZERO,
            Self::Express => {
                let cad = (currency == CurrencyCode::CAD).then_some(Self::EXPRESS_FEE_CAD);
                convert(Self::EXPRESS_FEE_USD, currency, cad)
            }
        }
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Express => write!(f, "express"),
        }
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "express" => Ok(Self::Express),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

/// Subtotal, tax, shipping and total in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub currency: CurrencyCode,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Derive tax and total from a subtotal already in `currency`.
    #[must_use]
    pub fn compute(
        currency: CurrencyCode,
        subtotal: Decimal,
        shipping_type: ShippingType,
        location: &str,
        shipping_cost: Decimal,
    ) -> Self {
        let tax = tax::tax(subtotal, shipping_type, location);
        Self {
            currency,
            subtotal,
            tax,
            shipping_cost,
            total: total(subtotal, tax, shipping_cost),
        }
    }

    /// Totals for `lines` in `currency`.
    #[must_use]
    pub fn for_lines<L: PricedLine>(
        lines: &[L],
        currency: CurrencyCode,
        shipping_type: ShippingType,
        location: &str,
        shipping: ShippingMethod,
    ) -> Self {
        Self::compute(
            currency,
            subtotal(lines, currency),
            shipping_type,
            location,
            shipping.cost(currency),
        )
    }

    /// The total as a displayable price.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::new(self.total, self.currency)
    }
}

/// Totals in every supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsByCurrency {
    pub usd: OrderTotals,
    pub cad: OrderTotals,
    pub eur: OrderTotals,
}

impl TotalsByCurrency {
    /// Totals for `lines` in USD, CAD and EUR.
    #[must_use]
    pub fn for_lines<L: PricedLine>(
        lines: &[L],
        shipping_type: ShippingType,
        location: &str,
        shipping: ShippingMethod,
    ) -> Self {
        let at = |currency| OrderTotals::for_lines(lines, currency, shipping_type, location, shipping);
        Self {
            usd: at(CurrencyCode::USD),
            cad: at(CurrencyCode::CAD),
            eur: at(CurrencyCode::EUR),
        }
    }

    /// Totals for one currency.
    #[must_use]
    pub const fn get(&self, currency: CurrencyCode) -> &OrderTotals {
        match currency {
            CurrencyCode::USD => &self.usd,
            CurrencyCode::CAD => &self.cad,
            CurrencyCode::EUR => &self.eur,
        }
    }
}
