//! Command implementations.

pub mod cart;
pub mod orders;
pub mod pricing;
pub mod storage;

use std::path::{Path, PathBuf};

use kitbay_core::cart::CartError;
use kitbay_core::catalog::{Catalog, CatalogError};
use kitbay_core::orders::{StaticOrderSource, StatusAssignment};
use kitbay_core::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A data file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is invalid.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The orders file is invalid.
    #[error("Invalid orders file: {0}")]
    Orders(#[from] serde_json::Error),

    /// The cart rejected the change.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// The storage file could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No product with this model.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// No order with this id.
    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    /// A command-line value could not be used.
    #[error("Invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the product catalog.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed.
pub fn load_catalog(path: &Path) -> Result<Catalog, CliError> {
    let catalog = Catalog::from_json(&read(path)?)?;
    tracing::debug!(products = catalog.len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

/// Load the order history with the given status assignment.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed.
pub fn load_orders(path: &Path, assignment: StatusAssignment) -> Result<StaticOrderSource, CliError> {
    Ok(StaticOrderSource::from_json(&read(path)?)?.with_assignment(assignment))
}
