//! Predictor service: the one piece of actual logic.
//!
//! Orchestrates artifact lookup and the three predictions of a submission:
//! the base price and the two finite-difference sensitivities (price change
//! for +100 km of mileage, price change for +1 month of age).

use std::sync::Arc;

use crate::domain::{
    ModelKey, PriceEstimate, PriceModel, VehicleSpec, AGE_DELTA_YEARS, MILEAGE_DELTA_KM,
};
use crate::ports::ModelStore;
use crate::CarcostError;

/// Service for price prediction over a model store.
///
/// The service holds no artifact state: every operation loads the artifact
/// fresh from the store, so a replaced artifact takes effect on the next
/// submission without any invalidation protocol.
pub struct PredictorService<S>
where
    S: ModelStore,
{
    store: Arc<S>,
}

impl<S> PredictorService<S>
where
    S: ModelStore,
    S::Error: Into<crate::adapters::StoreError>,
{
    /// Create a new predictor service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn load_model(&self, key: &ModelKey) -> Result<PriceModel, CarcostError> {
        // Existence is checked explicitly so a missing artifact is a typed
        // failure, never a raw filesystem error.
        let exists = self
            .store
            .contains(key)
            .map_err(|e| CarcostError::Store(e.into()))?;
        if !exists {
            return Err(CarcostError::Store(crate::adapters::StoreError::Missing {
                key: key.clone(),
            }));
        }
        self.store.load(key).map_err(|e| CarcostError::Store(e.into()))
    }

    /// Predict the market price for a spec.
    ///
    /// # Errors
    /// Fails if no artifact exists for `key` or the spec falls outside the
    /// artifact's training domain. Failures propagate immediately; there is
    /// no retry and no partial result.
    pub fn predict(&self, spec: &VehicleSpec, key: &ModelKey) -> Result<f64, CarcostError> {
        let model = self.load_model(key)?;
        Ok(model.predict(spec)?)
    }

    /// Price sensitivity to `delta_km` more mileage.
    ///
    /// A local finite-difference estimate, not an exact marginal cost.
    /// Positive means the price drops with more km.
    ///
    /// # Errors
    /// Same failure modes as [`predict`](Self::predict).
    pub fn sensitivity_to_mileage(
        &self,
        spec: &VehicleSpec,
        key: &ModelKey,
        delta_km: u32,
    ) -> Result<f64, CarcostError> {
        let base = self.predict(spec, key)?;
        let perturbed = self.predict(&spec.with_added_mileage(delta_km), key)?;
        Ok(base - perturbed)
    }

    /// Price sensitivity to `delta_years` more age (1/12 for one month).
    ///
    /// # Errors
    /// Same failure modes as [`predict`](Self::predict).
    pub fn sensitivity_to_age(
        &self,
        spec: &VehicleSpec,
        key: &ModelKey,
        delta_years: f64,
    ) -> Result<f64, CarcostError> {
        let base = self.predict(spec, key)?;
        let perturbed = self.predict(&spec.with_added_age(delta_years), key)?;
        Ok(base - perturbed)
    }

    /// Run one full submission: base price plus both cost deltas.
    ///
    /// Loads the artifact once and performs the three predictions
    /// sequentially on it, matching the per-submission behavior of the form.
    ///
    /// # Errors
    /// Fails if the artifact is missing or any of the three predictions is
    /// rejected; no partial estimate is returned.
    pub fn estimate(
        &self,
        spec: &VehicleSpec,
        key: &ModelKey,
    ) -> Result<PriceEstimate, CarcostError> {
        if let Err(errors) = spec.validate() {
            return Err(CarcostError::Validation(errors.join(", ")));
        }

        tracing::info!(%key, "Running price estimation");
        let model = self.load_model(key)?;

        let price = model.predict(spec)?;
        let price_more_km = model.predict(&spec.with_added_mileage(MILEAGE_DELTA_KM))?;
        let price_older = model.predict(&spec.with_added_age(AGE_DELTA_YEARS))?;

        let estimate = PriceEstimate::new(price, price_more_km, price_older, model.nobs);
        tracing::info!(
            price = estimate.rounded_price(),
            nobs = estimate.nobs,
            mileage_cost = estimate.mileage_cost,
            age_cost = estimate.age_cost,
            "Estimation complete"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fs::FsModelStore;
    use crate::domain::{Country, FuelCategory, Transmission};
    use std::collections::BTreeMap;
    use tempfile::{tempdir, TempDir};

    fn write_golf_model(dir: &std::path::Path) -> ModelKey {
        let key = ModelKey::new("VW", "Golf");

        let mut terms = BTreeMap::new();
        terms.insert("age".to_string(), -1200.0);
        terms.insert("mileage".to_string(), -0.05);
        terms.insert("power".to_string(), 85.0);
        terms.insert("transmission=Automatic".to_string(), 900.0);
        terms.insert("transmission=Semi-automatic".to_string(), 400.0);
        terms.insert("fuel=Diesel".to_string(), 600.0);
        terms.insert("country=DE".to_string(), 250.0);

        let mut reference_levels = BTreeMap::new();
        reference_levels.insert("transmission".to_string(), "Manual".to_string());
        reference_levels.insert("fuel".to_string(), "Gasoline".to_string());
        reference_levels.insert("country".to_string(), "FR".to_string());

        let model = PriceModel {
            intercept: 18_000.0,
            terms,
            reference_levels,
            nobs: 1420,
        };
        std::fs::write(
            dir.join(key.file_name()),
            serde_json::to_string(&model).expect("serialize"),
        )
        .expect("write model");
        key
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

    fn create_test_service() -> (TempDir, PredictorService<FsModelStore>, ModelKey) {
        let temp = tempdir().expect("tempdir");
        let key = write_golf_model(temp.path());
        let store = Arc::new(FsModelStore::new(temp.path()));
        (temp, PredictorService::new(store), key)
    }

    #[test]
    fn test_predict_is_finite_and_non_negative() {
        let (_temp, service, key) = create_test_service();
        let price = service.predict(&golf_spec(), &key).expect("predict");
        assert!(price.is_finite());
        assert!(price >= 0.0);
    }

    #[test]
    fn test_golf_scenario_mileage_cost() {
        let (_temp, service, key) = create_test_service();
        let spec = golf_spec();

        let p = service.predict(&spec, &key).expect("predict");
        let p2 = service
            .predict(&spec.with_added_mileage(100), &key)
            .expect("predict");
        assert!(p2 < p, "more mileage must lower the price here");

        let estimate = service.estimate(&spec, &key).expect("estimate");
        // Reported as P - P2 without sign inversion, at 2 decimals.
        assert!((estimate.mileage_cost - ((p - p2) * 100.0).round() / 100.0).abs() < 1e-9);
        assert!(estimate.mileage_cost > 0.0);
        assert_eq!(estimate.nobs, 1420);
    }

    #[test]
    fn test_sensitivities_are_deterministic() {
        let (_temp, service, key) = create_test_service();
        let spec = golf_spec();

        let a = service
            .sensitivity_to_mileage(&spec, &key, 100)
            .expect("sensitivity");
        let b = service
            .sensitivity_to_mileage(&spec, &key, 100)
            .expect("sensitivity");
        assert_eq!(a.to_bits(), b.to_bits());

        let c = service
            .sensitivity_to_age(&spec, &key, AGE_DELTA_YEARS)
            .expect("sensitivity");
        let d = service
            .sensitivity_to_age(&spec, &key, AGE_DELTA_YEARS)
            .expect("sensitivity");
        assert_eq!(c.to_bits(), d.to_bits());
    }

    #[test]
    fn test_age_sensitivity_matches_coefficient() {
        let (_temp, service, key) = create_test_service();

        // Linear model: one month of age costs exactly -coef_age / 12.
        let delta = service
            .sensitivity_to_age(&golf_spec(), &key, AGE_DELTA_YEARS)
            .expect("sensitivity");
        assert!((delta - 100.0).abs() < 1e-9); // 1200 / 12
    }

    #[test]
    fn test_missing_artifact_propagates() {
        let (_temp, service, _key) = create_test_service();
        let unknown = ModelKey::new("VW", "Phaeton");

        let err = service.estimate(&golf_spec(), &unknown).expect_err("must fail");
        assert!(matches!(
            err,
            CarcostError::Store(crate::adapters::StoreError::Missing { .. })
        ));
    }

    #[test]
    fn test_out_of_domain_level_propagates() {
        let (_temp, service, key) = create_test_service();
        let mut spec = golf_spec();
        spec.country = Country::Luxembourg; // not in the artifact

        let err = service.estimate(&spec, &key).expect_err("must fail");
        assert!(matches!(err, CarcostError::Model(_)));
    }

    #[test]
    fn test_invalid_spec_is_rejected_before_lookup() {
        let (_temp, service, key) = create_test_service();
        let mut spec = golf_spec();
        spec.power = 5;

        let err = service.estimate(&spec, &key).expect_err("must fail");
        assert!(matches!(err, CarcostError::Validation(_)));
    }
}
