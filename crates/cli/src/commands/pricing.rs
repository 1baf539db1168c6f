//! Tax, currency and office commands.
//!
//! # Usage
//!
//! ```bash
//! kitbay tax rate --office Vancouver
//! kitbay tax rate --residential
//! kitbay tax calc 1000 --office Montreal
//! kitbay convert 100 --to CAD
//! kitbay convert 100 --to CAD --cad-price 120
//! kitbay offices
//! ```

use std::fmt::Write as _;

use kitbay_core::pricing::{self, round_cents};
use kitbay_core::tax::{self, DEFAULT_TAX_RATE};
use kitbay_core::{CurrencyCode, Price, ShippingType};
use rust_decimal::Decimal;

use super::CliError;

/// Largest amount accepted on the command line.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Parse a money amount, allowing thousands separators.
///
/// # Errors
///
/// Returns an error if `raw` is not a decimal number or its magnitude is
/// above [`MAX_AMOUNT`].
pub fn parse_amount(raw: &str) -> Result<Decimal, CliError> {
    let invalid = || CliError::InvalidArgument {
        what: "amount",
        value: raw.to_string(),
    };
    let amount: Decimal = raw.trim().replace(',', "").parse().map_err(|_| invalid())?;
    if amount.abs() > MAX_AMOUNT {
        return Err(invalid());
    }
    Ok(amount)
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn destination(shipping_type: ShippingType, location: &str) -> String {
    match shipping_type {
        ShippingType::Office => format!("{location} office"),
        ShippingType::Residential => "residential address".to_string(),
    }
}

/// Describe the tax rate for a shipment.
#[must_use]
pub fn rate(shipping_type: ShippingType, location: &str) -> String {
    let rate = tax::rate_for(shipping_type, location);
    let mut out = format!(
        "Tax rate for {}: {}",
        destination(shipping_type, location),
        percent(rate)
    );
    if shipping_type == ShippingType::Office && tax::office_location(location).is_none() {
        let _ = write!(out, " (unknown office, default {})", percent(DEFAULT_TAX_RATE));
    }
    out
}

/// Tax and total for a subtotal.
#[must_use]
pub fn calc(subtotal: Decimal, shipping_type: ShippingType, location: &str, currency: CurrencyCode) -> String {
    let tax = tax::tax(subtotal, shipping_type, location);
    let total = pricing::total(subtotal, tax, Decimal::ZERO);
    let money = |amount| Price::new(amount, currency).display_cents();
    format!(
        "Subtotal: {}\nTax ({}): {}\nTotal: {}",
        money(subtotal),
        percent(tax::rate_for(shipping_type, location)),
        money(tax),
        money(total)
    )
}

/// Convert a USD amount.
#[must_use]
pub fn convert(amount_usd: Decimal, to: CurrencyCode, cad_price: Option<Decimal>) -> String {
    let explicit = cad_price.filter(|_| to == CurrencyCode::CAD);
    let converted = pricing::convert(amount_usd, to, explicit);
    format!(
        "{} = {}",
        Price::new(amount_usd, CurrencyCode::USD).display_cents(),
        Price::new(round_cents(converted), to).display_cents()
    )
}

/// The office table.
#[must_use]
pub fn offices() -> String {
    let mut out = String::new();
    for office in tax::office_locations() {
        let _ = writeln!(
            out,
            "{:<32} {:<10} {:<24} {:<3} {:>7}",
            office.name,
            office.zip_code,
            office.region,
            office.country_code,
            percent(office.tax_rate)
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,299.50").unwrap(), Decimal::new(129_950, 2));
        assert!(parse_amount("ten").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_huge_values() {
        assert_eq!(parse_amount("1,000,000,000").unwrap(), MAX_AMOUNT);
        assert!(matches!(
            parse_amount("79228162514264337593543950335"),
            Err(CliError::InvalidArgument { what: "amount", .. })
        ));
        assert!(parse_amount("-1000000001").is_err());

        // The largest accepted amount converts and taxes without overflow
        assert_eq!(
            convert(MAX_AMOUNT, CurrencyCode::CAD, None),
            "$1,000,000,000.00 = $1,350,000,000.00"
        );
        assert!(calc(MAX_AMOUNT, ShippingType::Office, "Montreal", CurrencyCode::USD)
            .ends_with("Total: $1,149,750,000.00"));
    }

    #[test]
    fn test_rate_messages() {
        assert_eq!(
            rate(ShippingType::Office, "Vancouver"),
            "Tax rate for Vancouver office: 12%"
        );
        assert_eq!(
            rate(ShippingType::Office, "Atlantis"),
            "Tax rate for Atlantis office: 7.25% (unknown office, default 7.25%)"
        );
        assert_eq!(
            rate(ShippingType::Residential, "Vancouver"),
            "Tax rate for residential address: 7.25%"
        );
    }

    #[test]
    fn test_calc_montreal() {
        let out = calc(
            Decimal::from(1000),
            ShippingType::Office,
            "Montreal",
            CurrencyCode::USD,
        );
        assert_eq!(out, "Subtotal: $1,000.00\nTax (14.975%): $149.75\nTotal: $1,149.75");
    }

    #[test]
    fn test_convert_uses_cad_override() {
        assert_eq!(
            convert(Decimal::from(100), CurrencyCode::CAD, None),
            "$100.00 = $135.00"
        );
        assert_eq!(
            convert(Decimal::from(100), CurrencyCode::CAD, Some(Decimal::from(120))),
            "$100.00 = $120.00"
        );
        assert_eq!(
            convert(Decimal::from(100), CurrencyCode::EUR, Some(Decimal::from(120))),
            "$100.00 = €85.00"
        );
    }

    #[test]
    fn test_offices_lists_every_office() {
        assert_eq!(offices().lines().count(), tax::office_locations().len());
    }
}
