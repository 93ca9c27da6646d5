//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies
//! beyond serde. All types are serializable and implement strict validation.

mod artifact;
mod estimate;
mod key;
mod summary;
mod vehicle;

pub use artifact::{ModelError, PriceModel};
pub use estimate::{PriceEstimate, AGE_DELTA_YEARS, MILEAGE_DELTA_KM};
pub use key::ModelKey;
pub use summary::{CarSummary, FeatureSummary, FormDefaults, REFERENCE_YEAR};
pub use vehicle::{Country, FuelCategory, Transmission, VehicleSpec};
