//! Display currency preference.

use crate::storage::{LocalStorage, StorageError, keys};
use crate::types::CurrencyCode;

/// Stored currency, or USD if absent or unrecognized.
///
/// Only the exact codes `USD`, `CAD` and `EUR` are accepted. A read failure
/// is logged and also gives USD.
#[must_use]
pub fn load<S: LocalStorage>(storage: &S) -> CurrencyCode {
    match storage.get_item(keys::PREFERRED_CURRENCY) {
        Ok(Some(raw)) => CurrencyCode::ALL
            .into_iter()
            .find(|c| c.code() == raw)
            .unwrap_or_else(|| {
                tracing::debug!(value = %raw, "ignoring unknown preferred currency");
                CurrencyCode::default()
            }),
        Ok(None) => CurrencyCode::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read preferred currency");
            CurrencyCode::default()
        }
    }
}

/// Persist `currency`.
///
/// # Errors
///
/// Returns an error if the backend cannot be written.
pub fn save<S: LocalStorage>(storage: &mut S, currency: CurrencyCode) -> Result<(), StorageError> {
    storage.set_item(keys::PREFERRED_CURRENCY, currency.code().to_owned())
}

/// Advance USD -> CAD -> EUR -> USD, persist, and return the new currency.
///
/// # Errors
///
/// Returns an error if the backend cannot be written.
pub fn toggle<S: LocalStorage>(storage: &mut S) -> Result<CurrencyCode, StorageError> {
    let next = load(storage).next();
    save(storage, next)?;
    Ok(next)
}
