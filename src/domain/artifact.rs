//! Fitted regression artifacts.
//!
//! A `PriceModel` is the persisted output of the offline fitting pipeline:
//! an ordinary linear model over the vehicle features, with categorical
//! factors one-hot encoded against an explicit reference level. Artifacts
//! are immutable once loaded and are never refit at request time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vehicle::VehicleSpec;

/// Numeric terms every artifact must carry.
const NUMERIC_TERMS: [&str; 3] = ["age", "mileage", "power"];

/// Categorical factors every artifact must carry a reference level for.
const CATEGORICAL_FACTORS: [&str; 3] = ["transmission", "fuel", "country"];

/// Error type for price model evaluation and validation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The artifact has no weight for a categorical level and the level is
    /// not the recorded reference level either.
    #[error("Level '{level}' of factor '{factor}' is outside the model's training domain")]
    UnsupportedLevel { factor: String, level: String },

    /// Evaluation produced a non-finite price.
    #[error("Prediction is not finite")]
    NonFinite,

    /// The artifact failed its structural sanity checks.
    #[error("Invalid price model: {0}")]
    Invalid(String),
}

/// Fitted linear regression for one brand/model pair.
///
/// Term keys are `age`, `mileage`, `power` for the numeric features and
/// `<factor>=<level>` (e.g. `country=DE`, `transmission=Manual`) for the
/// one-hot categorical weights. The reference level of each factor carries
/// an implicit weight of zero and is recorded in `reference_levels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceModel {
    pub intercept: f64,
    pub terms: BTreeMap<String, f64>,
    pub reference_levels: BTreeMap<String, String>,
    /// Number of observations the regression was fitted on.
    pub nobs: u64,
}

impl PriceModel {
    /// Structural sanity checks, run once when an artifact is loaded.
    ///
    /// # Errors
    /// Returns `ModelError::Invalid` describing the first failed check.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nobs == 0 {
            return Err(ModelError::Invalid("nobs must be > 0".into()));
        }
        if !self.intercept.is_finite() {
            return Err(ModelError::Invalid("intercept is not finite".into()));
        }
        for term in NUMERIC_TERMS {
            if !self.terms.contains_key(term) {
                return Err(ModelError::Invalid(format!("missing numeric term '{term}'")));
            }
        }
        for (term, weight) in &self.terms {
            if !weight.is_finite() {
                return Err(ModelError::Invalid(format!(
                    "weight for term '{term}' is not finite"
                )));
            }
        }
        for factor in CATEGORICAL_FACTORS {
            if !self.reference_levels.contains_key(factor) {
                return Err(ModelError::Invalid(format!(
                    "missing reference level for factor '{factor}'"
                )));
            }
        }
        Ok(())
    }

    /// Predict the market price for a vehicle spec.
    ///
    /// # Errors
    /// Returns `ModelError::UnsupportedLevel` if a categorical level of the
    /// spec was not in the artifact's training domain.
    pub fn predict(&self, spec: &VehicleSpec) -> Result<f64, ModelError> {
        let mut price = self.intercept;

        price += self.numeric_weight("age") * spec.age;
        price += self.numeric_weight("mileage") * f64::from(spec.mileage);
        price += self.numeric_weight("power") * f64::from(spec.power);

        price += self.categorical_weight("transmission", spec.transmission.label())?;
        price += self.categorical_weight("fuel", spec.fuel.label())?;
        price += self.categorical_weight("country", spec.country.code())?;

        if !price.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(price)
    }

    fn numeric_weight(&self, term: &str) -> f64 {
        // `validate()` guarantees presence; an absent term contributes nothing.
        self.terms.get(term).copied().unwrap_or(0.0)
    }

    fn categorical_weight(&self, factor: &str, level: &str) -> Result<f64, ModelError> {
        if let Some(weight) = self.terms.get(&format!("{factor}={level}")) {
            return Ok(*weight);
        }
        if self.reference_levels.get(factor).map(String::as_str) == Some(level) {
            return Ok(0.0);
        }
        Err(ModelError::UnsupportedLevel {
            factor: factor.to_string(),
            level: level.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Country, FuelCategory, Transmission};

    fn golf_model() -> PriceModel {
        let mut terms = BTreeMap::new();
        terms.insert("age".into(), -1200.0);
        terms.insert("mileage".into(), -0.05);
        terms.insert("power".into(), 85.0);
        terms.insert("transmission=Automatic".into(), 900.0);
        terms.insert("transmission=Semi-automatic".into(), 400.0);
        terms.insert("fuel=Diesel".into(), 600.0);
        terms.insert("country=DE".into(), 250.0);
        terms.insert("country=NL".into(), 410.0);

        let mut reference_levels = BTreeMap::new();
        reference_levels.insert("transmission".into(), "Manual".into());
        reference_levels.insert("fuel".into(), "Gasoline".into());
        reference_levels.insert("country".into(), "FR".into());

        PriceModel {
            intercept: 18_000.0,
            terms,
            reference_levels,
            nobs: 1420,
        }
    }

    fn golf_spec() -> VehicleSpec {
        VehicleSpec {
            age: 3.0,
            mileage: 50_000,
            power: 110,
            transmission: Transmission::Manual,
            fuel: FuelCategory::Diesel,
            country: Country::Germany,
        }
    }

    #[test]
    fn test_predict_linear_combination() {
        let model = golf_model();
        let price = model.predict(&golf_spec()).expect("predict");

        // 18000 - 1200*3 - 0.05*50000 + 85*110 + 0 (Manual ref) + 600 + 250
        let expected = 18_000.0 - 3_600.0 - 2_500.0 + 9_350.0 + 600.0 + 250.0;
        assert!((price - expected).abs() < 1e-9);
        assert!(price.is_finite());
        assert!(price >= 0.0);
    }

    #[test]
    fn test_reference_level_contributes_zero() {
        let model = golf_model();
        let mut spec = golf_spec();
        spec.country = Country::France; // reference level

        let with_ref = model.predict(&spec).expect("predict");
        spec.country = Country::Germany;
        let with_de = model.predict(&spec).expect("predict");
        assert!((with_de - with_ref - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let model = golf_model();
        let mut spec = golf_spec();
        spec.country = Country::Luxembourg; // no term, not the reference

        let err = model.predict(&spec).expect_err("must fail");
        match err {
            ModelError::UnsupportedLevel { factor, level } => {
                assert_eq!(factor, "country");
                assert_eq!(level, "LU");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_catches_structural_defects() {
        let mut model = golf_model();
        assert!(model.validate().is_ok());

        model.nobs = 0;
        assert!(model.validate().is_err());

        let mut model = golf_model();
        model.terms.remove("mileage");
        assert!(model.validate().is_err());

        let mut model = golf_model();
        model.terms.insert("age".into(), f64::NAN);
        assert!(model.validate().is_err());

        let mut model = golf_model();
        model.reference_levels.remove("fuel");
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = golf_model();
        let spec = golf_spec();
        let a = model.predict(&spec).expect("predict");
        let b = model.predict(&spec).expect("predict");
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
