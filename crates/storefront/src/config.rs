//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>); an
//!   `https://` URL turns on secure session cookies
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON
//!   (default: crates/storefront/data/catalog.json)
//! - `STOREFRONT_ORDERS_PATH` - Order records JSON
//!   (default: crates/storefront/data/orders.json)
//! - `STOREFRONT_ORDER_STATUS_OVERRIDE` - How order statuses are shown: a
//!   status name, `by-age`, `by-value` or `none` (default: pending-approval)
//! - `STOREFRONT_ORDERS_MIN_DELAY_MS` - Minimum time the order pages take to
//!   render (default: 1200)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kitbay_core::orders::StatusAssignment;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Order records file
    pub orders_path: PathBuf,
    /// Status shown for orders
    pub status_assignment: StatusAssignment,
    /// Minimum render time for order pages
    pub orders_min_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (production, staging, ...)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let orders_min_delay_ms: u64 = env.parse("STOREFRONT_ORDERS_MIN_DELAY_MS", "1200")?;

        Ok(Self {
            host: env.parse("STOREFRONT_HOST", "127.0.0.1")?,
            port: env.parse("STOREFRONT_PORT", "3000")?,
            base_url: env.get_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
            catalog_path: env
                .get_or_default("STOREFRONT_CATALOG_PATH", "crates/storefront/data/catalog.json")
                .into(),
            orders_path: env
                .get_or_default("STOREFRONT_ORDERS_PATH", "crates/storefront/data/orders.json")
                .into(),
            status_assignment: env.parse("STOREFRONT_ORDER_STATUS_OVERRIDE", "pending-approval")?,
            orders_min_delay: Duration::from_millis(orders_min_delay_ms),
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is HTTPS (session cookies are then `Secure`).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use kitbay_core::OrderStatus;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(!config.is_secure());
        assert_eq!(
            config.status_assignment,
            StatusAssignment::Fixed(OrderStatus::PendingApproval)
        );
        assert_eq!(config.orders_min_delay, Duration::from_millis(1200));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = config_from(&[("STOREFRONT_HOST", "0.0.0.0"), ("STOREFRONT_PORT", "8080")])
            .unwrap();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = config_from(&[("STOREFRONT_BASE_URL", "https://store.kitbay.dev")]).unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_status_override_none() {
        let config = config_from(&[("STOREFRONT_ORDER_STATUS_OVERRIDE", "none")]).unwrap();
        assert_eq!(config.status_assignment, StatusAssignment::AsRecorded);
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = config_from(&[("SENTRY_DSN", ""), ("STOREFRONT_PORT", " ")]).unwrap();
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config_from(&[("STOREFRONT_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));

        assert!(config_from(&[("STOREFRONT_ORDER_STATUS_OVERRIDE", "soon")]).is_err());
        assert!(config_from(&[("STOREFRONT_ORDERS_MIN_DELAY_MS", "-5")]).is_err());
    }
}
