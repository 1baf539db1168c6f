//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display rounded to whole units, e.g. `$1,299` or `€1,104`.
    #[must_use]
    pub fn display_whole(&self) -> String {
        let whole = self
            .amount
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let mut digits = whole.abs();
        digits.rescale(0);
        format!(
            "{}{}{}",
            sign_of(whole),
            self.currency_code.symbol(),
            group_thousands(&digits.to_string())
        )
    }

    /// Format with two decimal places, e.g. `$149.75`.
    #[must_use]
    pub fn display_cents(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let mut abs = rounded.abs();
        abs.rescale(2);
        let text = abs.to_string();
        let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!(
            "{}{}{}.{frac}",
            sign_of(rounded),
            self.currency_code.symbol(),
            group_thousands(int_part)
        )
    }
}

fn sign_of(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_whole(), self.currency_code.code())
    }
}

/// Insert `,` separators into a string of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Currencies the storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    CAD,
    EUR,
}

impl CurrencyCode {
    /// All supported currencies, in toggle order.
    pub const ALL: [Self; 3] = [Self::USD, Self::CAD, Self::EUR];

    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::CAD => "CAD",
            Self::EUR => "EUR",
        }
    }

    /// The next currency in the USD -> CAD -> EUR -> USD cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::USD => Self::CAD,
            Self::CAD => Self::EUR,
            Self::EUR => Self::USD,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "CAD" => Ok(Self::CAD),
            "EUR" => Ok(Self::EUR),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_groups_thousands() {
        let price = Price::new(Decimal::new(129_999, 2), CurrencyCode::USD);
        assert_eq!(price.display_whole(), "$1,300");

        let price = Price::new(Decimal::new(1_104, 0), CurrencyCode::EUR);
        assert_eq!(price.display_whole(), "€1,104");
    }

    #[test]
    fn test_display_cents() {
        let price = Price::new(Decimal::new(14_975, 2), CurrencyCode::CAD);
        assert_eq!(price.display_cents(), "$149.75");

        let price = Price::new(Decimal::new(1_234_567, 0), CurrencyCode::USD);
        assert_eq!(price.display_cents(), "$1,234,567.00");
    }

    #[test]
    fn test_display_includes_code() {
        let price = Price::new(Decimal::new(135, 0), CurrencyCode::CAD);
        assert_eq!(price.to_string(), "$135 CAD");
    }

    #[test]
    fn test_currency_cycle() {
        assert_eq!(CurrencyCode::USD.next(), CurrencyCode::CAD);
        assert_eq!(CurrencyCode::CAD.next(), CurrencyCode::EUR);
        assert_eq!(CurrencyCode::EUR.next(), CurrencyCode::USD);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("cad".parse::<CurrencyCode>().unwrap(), CurrencyCode::CAD);
        assert_eq!(" EUR ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("GBP".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(CurrencyCode::USD.symbol(), "$");
        assert_eq!(CurrencyCode::CAD.symbol(), "$");
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
    }
}
