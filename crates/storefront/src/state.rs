//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use kitbay_core::catalog::{Catalog, CatalogError};
use kitbay_core::orders::{OrderSource, StaticOrderSource};

use crate::config::StorefrontConfig;

/// Error loading the bundled data files.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid orders file: {0}")]
    Orders(#[from] serde_json::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, the order source and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: Box<dyn OrderSource + Send + Sync>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        orders: impl OrderSource + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders: Box::new(orders),
            }),
        }
    }

    /// Load the catalog and orders named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or malformed.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = Catalog::from_json(&read(&config.catalog_path)?)?;
        let orders = StaticOrderSource::from_json(&read(&config.orders_path)?)?
            .with_assignment(config.status_assignment);

        tracing::info!(
            products = catalog.len(),
            assignment = ?config.status_assignment,
            "storefront data loaded"
        );

        Ok(Self::new(config, catalog, orders))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order source.
    #[must_use]
    pub fn orders(&self) -> &(dyn OrderSource + Send + Sync) {
        self.inner.orders.as_ref()
    }
}

fn read(path: &Path) -> Result<String, StateError> {
    std::fs::read_to_string(path).map_err(|source| StateError::Read {
        path: path.display().to_string(),
        source,
    })
}
