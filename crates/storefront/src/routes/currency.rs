//! Display currency preference.

use axum::{
    Form,
    http::{HeaderMap, header},
    response::Redirect,
};
use kitbay_core::{CurrencyCode, preferences};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::ClientStorage;

/// Set currency form data.
#[derive(Debug, Deserialize)]
pub struct CurrencyForm {
    pub currency: String,
}

/// Set the display currency and go back to the page the visitor was on.
#[instrument(skip(client, headers))]
pub async fn set(
    mut client: ClientStorage,
    headers: HeaderMap,
    Form(form): Form<CurrencyForm>,
) -> Result<Redirect> {
    let currency: CurrencyCode = form
        .currency
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unsupported currency {}", form.currency)))?;

    preferences::save(client.storage_mut(), currency)?;
    client.save().await?;

    tracing::info!(currency = currency.code(), "currency set");
    Ok(Redirect::to(&back_to(&headers)))
}

/// Cycle USD -> CAD -> EUR -> USD.
#[instrument(skip(client, headers))]
pub async fn toggle(mut client: ClientStorage, headers: HeaderMap) -> Result<Redirect> {
    let currency = preferences::toggle(client.storage_mut())?;
    client.save().await?;

    tracing::info!(currency = currency.code(), "currency toggled");
    Ok(Redirect::to(&back_to(&headers)))
}

/// Path of the referring page on this site, or the cart.
fn back_to(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map_or_else(
            || "/cart".to_string(),
            |url| match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            },
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_referer(referer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_str(referer).unwrap());
        headers
    }

    #[test]
    fn test_back_to_defaults_to_cart() {
        assert_eq!(back_to(&HeaderMap::new()), "/cart");
        assert_eq!(back_to(&headers_with_referer("not a url")), "/cart");
    }

    #[test]
    fn test_back_to_keeps_path_and_query_only() {
        assert_eq!(
            back_to(&headers_with_referer("http://localhost:3000/orders")),
            "/orders"
        );
        assert_eq!(
            back_to(&headers_with_referer("https://evil.example/compare/XPS%2013?x=1")),
            "/compare/XPS%2013?x=1"
        );
    }
}
