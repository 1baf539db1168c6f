//! Tax rates by shipping destination.
//!
//! Office shipments are taxed at a flat rate looked up by office name.
//! Residential shipments (and unknown offices) use [`DEFAULT_TAX_RATE`];
//! there is no per-zip lookup.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::round_cents;
use crate::types::ShippingType;

/// Build a rate from an integer mantissa and scale (`rate(725, 4)` = 0.0725).
const fn rate(mantissa: u32, scale: u32) -> Decimal {
    Decimal::from_parts(mantissa, 0, 0, false, scale)
}

/// Fallback rate for residential addresses and unknown offices (7.25%).
pub const DEFAULT_TAX_RATE: Decimal = rate(725, 4);

/// A company office that hardware can be shipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfficeLocation {
    pub name: &'static str,
    pub zip_code: &'static str,
    /// State, province or region.
    pub region: &'static str,
    pub country_code: &'static str,
    /// Combined rate as a decimal fraction (0.12 = 12%).
    pub tax_rate: Decimal,
}

const fn office(
    name: &'static str,
    zip_code: &'static str,
    region: &'static str,
    country_code: &'static str,
    tax_rate: Decimal,
) -> OfficeLocation {
    OfficeLocation {
        name,
        zip_code,
        region,
        country_code,
        tax_rate,
    }
}

/// Every office, US first, then Canada, then Europe.
pub static OFFICE_LOCATIONS: [OfficeLocation; 28] = [
    // Texas state + local
    office("Austin", "78701", "TX", "US", rate(825, 4)),
    // Washington state + local
    office("Kirkland", "98033", "WA", "US", rate(1025, 4)),
    // California state + local
    office("Los Angeles - Chatsworth", "91311", "CA", "US", rate(1025, 4)),
    office("Los Angeles - Del Rey", "90232", "CA", "US", rate(1025, 4)),
    // Florida state + local
    office("Orlando", "32801", "FL", "US", rate(650, 4)),
    office("Redwood Shores", "94065", "CA", "US", rate(1025, 4)),
    // GST only, Alberta has no PST
    office("Edmonton", "T5J 0A1", "AB", "CA", rate(5, 2)),
    // GST 5% + QST 9.975%
    office("Montreal", "H3A 0A1", "QC", "CA", rate(14975, 5)),
    // GST 5% + PST 7%
    office("Vancouver", "V6B 0A1", "BC", "CA", rate(12, 2)),
    office("Vancouver - Great Northern Way", "V5T 0A1", "BC", "CA", rate(12, 2)),
    office("Victoria", "V8W 0A1", "BC", "CA", rate(12, 2)),
    // VAT
    office("Birmingham", "B1 1AA", "England", "UK", rate(20, 2)),
    office("Brno (Tracab)", "602 00", "South Moravia", "CZ", rate(21, 2)),
    office("Bucharest", "010001", "Bucharest", "RO", rate(19, 2)),
    office("Cologne", "50667", "North Rhine-Westphalia", "DE", rate(19, 2)),
    office("Cologne (Tracab)", "50667", "North Rhine-Westphalia", "DE", rate(19, 2)),
    office("Galway", "H91", "Connacht", "IE", rate(23, 2)),
    office("Geneva", "1201", "Geneva", "CH", rate(77, 3)),
    office("Gothenburg", "411 38", "Västra Götaland", "SE", rate(25, 2)),
    office("Guildford", "GU1 1AA", "England", "UK", rate(20, 2)),
    office("Helsinki", "00100", "Uusimaa", "FI", rate(24, 2)),
    office("Lyon", "69001", "Auvergne-Rhône-Alpes", "FR", rate(20, 2)),
    office("Madrid", "28001", "Community of Madrid", "ES", rate(21, 2)),
    office("Manchester", "M1 1AA", "England", "UK", rate(20, 2)),
    office("Southam", "CV47 0AA", "England", "UK", rate(20, 2)),
    office("Stockholm", "111 22", "Stockholm", "SE", rate(25, 2)),
    office("Stockholm (Tracab)", "111 22", "Stockholm", "SE", rate(25, 2)),
    office("Warsaw", "00-001", "Masovian", "PL", rate(23, 2)),
];

/// All offices.
#[must_use]
pub fn office_locations() -> &'static [OfficeLocation] {
    &OFFICE_LOCATIONS
}

/// Find an office by name, ignoring case.
#[must_use]
pub fn office_location(name: &str) -> Option<&'static OfficeLocation> {
    let needle = name.to_lowercase();
    OFFICE_LOCATIONS
        .iter()
        .find(|office| office.name.to_lowercase() == needle)
}

/// Tax rate for a shipment.
///
/// For office shipments `location` is the office name; for residential
/// shipments it is ignored.
#[must_use]
pub fn rate_for(shipping_type: ShippingType, location: &str) -> Decimal {
    match shipping_type {
        ShippingType::Office => office_location(location).map_or_else(
            || {
                tracing::debug!(location, "unknown office, using default tax rate");
                DEFAULT_TAX_RATE
            },
            |office| office.tax_rate,
        ),
        ShippingType::Residential => DEFAULT_TAX_RATE,
    }
}

/// Tax owed on `subtotal`, rounded to 2 decimal places.
#[must_use]
pub fn tax(subtotal: Decimal, shipping_type: ShippingType, location: &str) -> Decimal {
    round_cents(subtotal * rate_for(shipping_type, location))
}
