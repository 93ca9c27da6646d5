//! Adapters layer: Concrete implementations of ports.
//!
//! - `fs`: filesystem-backed model store (one JSON artifact per key)
//! - `catalog`: CSV loaders for the brand/model catalog and the
//!   per-model variable summaries

pub mod catalog;
pub mod fs;

pub use catalog::CatalogError;
pub use fs::StoreError;
