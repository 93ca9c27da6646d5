//! Price estimate result types.
//!
//! The output of one form submission: the predicted price plus the two
//! finite-difference ownership-cost metrics.

use serde::{Deserialize, Serialize};

/// Mileage perturbation used for the ownership-cost estimate (km).
pub const MILEAGE_DELTA_KM: u32 = 100;

/// Age perturbation used for the depreciation estimate (one month).
pub const AGE_DELTA_YEARS: f64 = 1.0 / 12.0;

/// Result of one price estimation run.
///
/// The cost fields follow the "cost of consuming more" sign convention:
/// `base price - perturbed price`, so a positive value means the price
/// drops as the car accumulates mileage or age. They are reported without
/// sign inversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceEstimate {
    /// Predicted market price in currency units
    pub price: f64,

    /// Number of cars the regression was fitted on
    pub nobs: u64,

    /// Cost of an additional `MILEAGE_DELTA_KM` km, rounded to 2 decimals
    pub mileage_cost: f64,

    /// Cost of one additional month of age, rounded to 2 decimals
    pub age_cost: f64,
}

impl PriceEstimate {
    /// Build an estimate from the three raw predictions of one submission.
    #[must_use]
    pub fn new(price: f64, price_more_km: f64, price_older: f64, nobs: u64) -> Self {
        Self {
            price,
            nobs,
            mileage_cost: round2(price - price_more_km),
            age_cost: round2(price - price_older),
        }
    }

    /// Predicted price rounded to whole currency units for display.
    #[must_use]
    pub fn rounded_price(&self) -> i64 {
        self.price.round() as i64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
