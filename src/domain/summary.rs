//! Per-model summary statistics and form default seeding.
//!
//! The summary table carries min/max/mean per feature for every brand/model
//! pair. It exists purely to seed sensible defaults and slider bounds in the
//! spec form; the regression artifacts never read it.

use serde::{Deserialize, Serialize};

/// Reference year the age arithmetic is anchored to.
///
/// Baked into the form logic on purpose: the summaries and artifacts were
/// produced against this year, so deriving it from the current date would
/// silently shift every default.
pub const REFERENCE_YEAR: i32 = 2022;

/// Min/max/mean of one feature over the training data of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Summary statistics for one brand/model pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarSummary {
    pub age: FeatureSummary,
    pub mileage: FeatureSummary,
    pub power: FeatureSummary,
    pub fuel_consumption: FeatureSummary,
}

/// Form defaults and slider bounds derived from a `CarSummary`.
///
/// A UI convenience, not correctness-critical: the form may let the user
/// pick any value within the computed bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormDefaults {
    /// Earliest selectable registration year
    pub year_min: i32,
    /// Latest selectable registration year
    pub year_max: i32,
    /// Default registration year
    pub year: i32,
    /// Default mileage in km, rounded to the nearest 1000
    pub mileage: u32,
    /// Default power in hp
    pub power: u32,
    /// Default fuel consumption in l/100km, rounded to 1 decimal
    pub fuel_consumption: f64,
}

impl FormDefaults {
    /// Derive defaults and bounds from the per-model summary.
    #[must_use]
    pub fn from_summary(summary: &CarSummary) -> Self {
        let year_min = REFERENCE_YEAR - summary.age.max as i32 - 1;
        let year_max = REFERENCE_YEAR - summary.age.min as i32 + 1;
        let year = REFERENCE_YEAR - summary.age.mean.round() as i32;

        let mileage = ((summary.mileage.mean / 1000.0).round() * 1000.0).max(0.0) as u32;
        let power = summary.power.mean.round().max(0.0) as u32;
        let fuel_consumption = (summary.fuel_consumption.mean * 10.0).round() / 10.0;

        Self {
            year_min,
            year_max,
            year: year.clamp(year_min, year_max),
            mileage,
            power,
            fuel_consumption,
        }
    }
}
