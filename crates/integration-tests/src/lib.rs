//! Integration tests for Kitbay.
//!
//! Each test starts its own storefront on an ephemeral port with the bundled
//! catalog and order files, then drives it over HTTP with a cookie-holding
//! client, so every test gets a fresh visitor session.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kitbay-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart pages and HTMX fragments
//! - `storefront_checkout` - Checkout handoff and currency preference
//! - `storefront_orders` - Order history and tracking
//! - `storefront_catalog` - Home, category and product pages
//! - `storefront_api` - JSON API

use std::collections::HashMap;
use std::net::SocketAddr;

use kitbay_storefront::config::{ConfigError, StorefrontConfig};
use kitbay_storefront::state::{AppState, StateError};
use reqwest::Client;
use thiserror::Error;

/// Bundled catalog shipped with the storefront.
pub const CATALOG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/data/catalog.json");

/// Bundled order history shipped with the storefront.
pub const ORDERS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/data/orders.json");

/// Errors starting a test server.
#[derive(Debug, Error)]
pub enum TestServerError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("state: {0}")]
    State(#[from] StateError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A storefront running in the background of a test.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestServer {
    /// Start a storefront with recorded order statuses and no order delay.
    ///
    /// # Errors
    ///
    /// Returns an error if the data files cannot be loaded or the port
    /// cannot be bound.
    pub async fn start() -> Result<Self, TestServerError> {
        Self::start_with(&[]).await
    }

    /// Start a storefront with extra environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the data files cannot be loaded or the port
    /// cannot be bound.
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self, TestServerError> {
        let mut vars: HashMap<String, String> = [
            ("STOREFRONT_CATALOG_PATH", CATALOG_PATH),
            ("STOREFRONT_ORDERS_PATH", ORDERS_PATH),
            ("STOREFRONT_ORDER_STATUS_OVERRIDE", "none"),
            ("STOREFRONT_ORDERS_MIN_DELAY_MS", "0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }

        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())?;
        let state = AppState::from_config(config)?;
        let app = kitbay_storefront::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self { addr, client })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(self.url(path)).send().await
    }

    /// POST a form to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Result<reqwest::Response> {
        self.client.post(self.url(path)).form(form).send().await
    }

    /// GET `path` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> reqwest::Result<serde_json::Value> {
        self.get(path).await?.json().await
    }

    /// Add a catalog product to this visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_to_cart(&self, model: &str) -> reqwest::Result<reqwest::Response> {
        self.post_form("/cart/add", &[("model", model)]).await
    }
}
