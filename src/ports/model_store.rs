//! Model store port: Trait for the keyed store of regression artifacts.
//!
//! The store maps a normalized `<brand>#<model>` key to a fitted
//! `PriceModel`. Artifacts are read-only; the store is never written to at
//! request time.

use crate::domain::{ModelKey, PriceModel};

/// Trait for regression artifact lookup.
///
/// Implementations must validate key existence explicitly: a missing key is
/// a distinct, typed error, never a raw I/O failure leaking through.
pub trait ModelStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Check whether an artifact exists for the key.
    ///
    /// # Errors
    /// Returns error if the store itself cannot be inspected.
    fn contains(&self, key: &ModelKey) -> Result<bool, Self::Error>;

    /// Load the artifact for the key.
    ///
    /// Every call reads the backing store fresh; implementations do not
    /// cache across calls.
    ///
    /// # Errors
    /// Returns a "missing" error if no artifact exists for the key, or a
    /// format error if the artifact fails its sanity checks.
    fn load(&self, key: &ModelKey) -> Result<PriceModel, Self::Error>;
}
