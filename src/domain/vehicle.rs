//! Vehicle specification types for price prediction.
//!
//! A `VehicleSpec` is the complete feature record the regression artifacts
//! are fitted on: age, mileage, power, transmission, fuel category, country.

use serde::{Deserialize, Serialize};

/// Transmission type of the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
    SemiAutomatic,
}

impl Transmission {
    /// All transmission types in form display order.
    pub const ALL: [Transmission; 3] = [Self::Automatic, Self::Manual, Self::SemiAutomatic];

    /// Label used both for display and as the categorical level in artifacts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Manual => "Manual",
            Self::SemiAutomatic => "Semi-automatic",
        }
    }
}

impl std::fmt::Display for Transmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fuel category of the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelCategory {
    Gasoline,
    Diesel,
}

impl FuelCategory {
    /// All fuel categories in form display order.
    pub const ALL: [FuelCategory; 2] = [Self::Gasoline, Self::Diesel];

    /// Label used both for display and as the categorical level in artifacts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Diesel => "Diesel",
        }
    }
}

impl std::fmt::Display for FuelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Registration country, restricted to the 8 markets the models were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    Germany,
    Spain,
    France,
    Netherlands,
    Belgium,
    Italy,
    Austria,
    Luxembourg,
}

impl Country {
    /// All supported countries in form display order.
    pub const ALL: [Country; 8] = [
        Self::Germany,
        Self::Spain,
        Self::France,
        Self::Netherlands,
        Self::Belgium,
        Self::Italy,
        Self::Austria,
        Self::Luxembourg,
    ];

    /// ISO 3166-1 alpha-2 code, as used in the regression artifacts.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Germany => "DE",
            Self::Spain => "ES",
            Self::France => "FR",
            Self::Netherlands => "NL",
            Self::Belgium => "BE",
            Self::Italy => "IT",
            Self::Austria => "AT",
            Self::Luxembourg => "LU",
        }
    }

    /// Full country name for display.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Germany => "Germany",
            Self::Spain => "Spain",
            Self::France => "France",
            Self::Netherlands => "Netherlands",
            Self::Belgium => "Belgium",
            Self::Italy => "Italy",
            Self::Austria => "Austria",
            Self::Luxembourg => "Luxembourg",
        }
    }

    /// Resolve an ISO code to a country.
    ///
    /// # Errors
    /// Returns an error for any code outside the supported 8-entry set.
    pub fn from_code(code: &str) -> Result<Self, String> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| format!("Unsupported country code: {code}"))
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete vehicle specification used as the prediction input.
///
/// All six fields are required; there are no partial records. Age is kept
/// fractional so one-month perturbations (1/12 of a year) stay exact enough
/// for finite differences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleSpec {
    /// Age in years (fractional)
    pub age: f64,

    /// Total mileage in km
    pub mileage: u32,

    /// Engine power in hp
    pub power: u32,

    /// Transmission type
    pub transmission: Transmission,

    /// Fuel category
    pub fuel: FuelCategory,

    /// Registration country
    pub country: Country,
}

impl VehicleSpec {
    /// Validate that all fields are within the ranges the form permits.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.age.is_finite() || self.age < 0.0 {
            errors.push(format!("Age {} must be a non-negative number", self.age));
        }
        if self.mileage > 1_000_000 {
            errors.push(format!("Mileage {} km exceeds 1,000,000", self.mileage));
        }
        if !(20..=1000).contains(&self.power) {
            errors.push(format!("Power {} hp out of range [20, 1000]", self.power));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Copy of this spec with `delta_km` more mileage.
    #[must_use]
    pub fn with_added_mileage(&self, delta_km: u32) -> Self {
        Self {
            mileage: self.mileage.saturating_add(delta_km),
            ..*self
        }
    }

    /// Copy of this spec aged by `delta_years` (fractional years allowed).
    #[must_use]
    pub fn with_added_age(&self, delta_years: f64) -> Self {
        Self {
            age: self.age + delta_years,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_codes_are_bijective() {
        for country in Country::ALL {
            let round_trip = Country::from_code(country.code()).expect("code must resolve");
            assert_eq!(round_trip, country);
        }

        // Names are pairwise distinct as well.
        let mut names: Vec<_> = Country::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Country::ALL.len());
    }

    #[test]
    fn test_country_rejects_unknown_codes() {
        assert!(Country::from_code("PT").is_err());
        assert!(Country::from_code("").is_err());
        assert!(Country::from_code("de").is_err());
    }

    #[test]
    fn test_validation() {
        let valid = VehicleSpec {
            age: 3.0,
            mileage: 50_000,
            power: 110,
            transmission: Transmission::Manual,
            fuel: FuelCategory::Diesel,
            country: Country::Germany,
        };
        assert!(valid.validate().is_ok());

        let invalid = VehicleSpec {
            age: -1.0,
            power: 10,
            ..valid
        };
        let errors = invalid.validate().expect_err("must fail");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_perturbations_leave_other_fields_alone() {
        let base = VehicleSpec {
            age: 3.0,
            mileage: 50_000,
            power: 110,
            transmission: Transmission::Manual,
            fuel: FuelCategory::Diesel,
            country: Country::Germany,
        };

        let more_km = base.with_added_mileage(100);
        assert_eq!(more_km.mileage, 50_100);
        assert!((more_km.age - base.age).abs() < f64::EPSILON);

        let older = base.with_added_age(1.0 / 12.0);
        assert_eq!(older.mileage, base.mileage);
        assert!((older.age - (3.0 + 1.0 / 12.0)).abs() < 1e-12);
    }
}
