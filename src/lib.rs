//! # carcost
//!
//! Terminal tool for car price estimation and ownership costs.
//!
//! Given a brand, model and vehicle attributes, carcost loads the fitted
//! regression artifact for that brand/model pair and reports a predicted
//! market price together with two finite-difference cost metrics: the cost
//! of an additional 100 km of mileage and the cost of one more month of age.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (vehicle spec, model key, regression artifact,
//!   summary statistics, price estimate)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (filesystem model store, CSV catalog)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{PriceEstimate, PriceModel, VehicleSpec};

/// Result type for carcost operations
pub type Result<T> = std::result::Result<T, CarcostError>;

/// Main error type for carcost
#[derive(Debug, thiserror::Error)]
pub enum CarcostError {
    #[error("Model store operation failed: {0}")]
    Store(#[from] adapters::StoreError),

    #[error("Catalog data unavailable: {0}")]
    Catalog(#[from] adapters::CatalogError),

    #[error("Price model rejected input: {0}")]
    Model(#[from] domain::ModelError),

    #[error("Invalid vehicle specification: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
