//! Lenient deserializers for hand-authored and legacy JSON.
//!
//! Prices in catalog files and older persisted carts appear both as JSON
//! numbers and as strings with thousands separators (`"1,299.00"`). Order
//! dates appear as ISO dates or as `"Dec 1, 2024"`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;

fn parse_value<E: de::Error>(value: &serde_json::Value) -> Result<Decimal, E> {
    match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(E::custom),
        serde_json::Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            Decimal::from_str(&cleaned)
                .map_err(|e| E::custom(format!("invalid price {s:?}: {e}")))
        }
        other => Err(E::custom(format!("expected a price, found {other}"))),
    }
}

/// Decimal from a JSON number or a (possibly comma-grouped) string.
pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    parse_value(&value)
}

/// Like [`decimal`], but `null` maps to `None`.
pub fn option_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    parse_value(&value).map(Some)
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y"];

fn parse_date<E: de::Error>(raw: &str) -> Result<NaiveDate, E> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| E::custom(format!("invalid date {raw:?}")))
}

/// Calendar date in any of the accepted formats.
pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
}

/// Like [`date`], but `null` maps to `None`.
pub fn option_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_date(&raw))
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "decimal")]
        price: Decimal,
        #[serde(default, deserialize_with = "option_decimal")]
        override_price: Option<Decimal>,
    }

    #[test]
    fn test_accepts_numbers() {
        let p: Priced = serde_json::from_str(r#"{"price": 1299.99}"#).unwrap();
        assert_eq!(p.price, Decimal::new(129_999, 2));
        assert_eq!(p.override_price, None);
    }

    #[test]
    fn test_accepts_grouped_strings() {
        let p: Priced =
            serde_json::from_str(r#"{"price": "1,299", "override_price": "1,749.50"}"#).unwrap();
        assert_eq!(p.price, Decimal::from(1299));
        assert_eq!(p.override_price, Some(Decimal::new(174_950, 2)));
    }

    #[test]
    fn test_null_override_is_none() {
        let p: Priced = serde_json::from_str(r#"{"price": 5, "override_price": null}"#).unwrap();
        assert_eq!(p.override_price, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }

    #[derive(Deserialize)]
    struct Dated {
        #[serde(deserialize_with = "date")]
        ordered: NaiveDate,
        #[serde(default, deserialize_with = "option_date")]
        delivered: Option<NaiveDate>,
    }

    #[test]
    fn test_dates_in_both_formats() {
        let d: Dated =
            serde_json::from_str(r#"{"ordered": "Dec 1, 2024", "delivered": "2024-12-15"}"#)
                .unwrap();
        assert_eq!(d.ordered, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(d.delivered, NaiveDate::from_ymd_opt(2024, 12, 15));

        let d: Dated = serde_json::from_str(r#"{"ordered": "November 28, 2024"}"#).unwrap();
        assert_eq!(d.ordered, NaiveDate::from_ymd_opt(2024, 11, 28).unwrap());
        assert_eq!(d.delivered, None);

        assert!(serde_json::from_str::<Dated>(r#"{"ordered": "yesterday"}"#).is_err());
    }
}
