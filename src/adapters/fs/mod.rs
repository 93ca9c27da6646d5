//! Filesystem model store: one JSON artifact per normalized key.
//!
//! Artifacts live at `<dir>/<brand>#<model>.json`. Existence is checked
//! before reading so a missing artifact surfaces as `StoreError::Missing`
//! rather than a raw I/O failure, and every loaded artifact passes the
//! `PriceModel` sanity checks before it is handed out.

use std::path::{Path, PathBuf};

use crate::domain::{ModelError, ModelKey, PriceModel};
use crate::ports::ModelStore;

/// Error type for model store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No price model for '{key}'")]
    Missing { key: ModelKey },

    #[error("Failed to read artifact for '{key}': {source}")]
    Io {
        key: ModelKey,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact for '{key}': {reason}")]
    Format { key: ModelKey, reason: String },
}

/// Filesystem-backed model store.
pub struct FsModelStore {
    dir: PathBuf,
}

impl FsModelStore {
    /// Create a store over the given artifact directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The artifact directory this store reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn artifact_path(&self, key: &ModelKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl ModelStore for FsModelStore {
    type Error = StoreError;

    fn contains(&self, key: &ModelKey) -> Result<bool, StoreError> {
        Ok(self.artifact_path(key).is_file())
    }

    fn load(&self, key: &ModelKey) -> Result<PriceModel, StoreError> {
        let path = self.artifact_path(key);
        if !path.is_file() {
            return Err(StoreError::Missing { key: key.clone() });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            key: key.clone(),
            source,
        })?;

        let model: PriceModel =
            serde_json::from_str(&content).map_err(|e| StoreError::Format {
                key: key.clone(),
                reason: e.to_string(),
            })?;

        model.validate().map_err(|e: ModelError| StoreError::Format {
            key: key.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(%key, path = %path.display(), nobs = model.nobs, "Loaded price model");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn write_model(dir: &Path, key: &ModelKey, nobs: u64) {
        let mut terms = BTreeMap::new();
        terms.insert("age".to_string(), -1000.0);
        terms.insert("mileage".to_string(), -0.04);
        terms.insert("power".to_string(), 70.0);
        terms.insert("fuel=Diesel".to_string(), 500.0);
        terms.insert("country=DE".to_string(), 200.0);

        let mut reference_levels = BTreeMap::new();
        reference_levels.insert("transmission".to_string(), "Manual".to_string());
        reference_levels.insert("fuel".to_string(), "Gasoline".to_string());
        reference_levels.insert("country".to_string(), "FR".to_string());

        let model = PriceModel {
            intercept: 15_000.0,
            terms,
            reference_levels,
            nobs,
        };
        let json = serde_json::to_string_pretty(&model).expect("serialize model");
        std::fs::write(dir.join(key.file_name()), json).expect("write model");
    }

    #[test]
    fn test_load_roundtrip() {
        let temp = tempdir().expect("tempdir");
        let key = ModelKey::new("VW", "Golf");
        write_model(temp.path(), &key, 1420);

        let store = FsModelStore::new(temp.path());
        assert!(store.contains(&key).expect("contains"));

        let model = store.load(&key).expect("load");
        assert_eq!(model.nobs, 1420);
        assert!((model.intercept - 15_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_key_is_typed_not_io() {
        let temp = tempdir().expect("tempdir");
        let store = FsModelStore::new(temp.path());
        let key = ModelKey::new("VW", "Golf");

        assert!(!store.contains(&key).expect("contains"));
        match store.load(&key).expect_err("must fail") {
            StoreError::Missing { key: missing } => assert_eq!(missing, key),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalized_key_addresses_file() {
        let temp = tempdir().expect("tempdir");
        let key = ModelKey::new("Mercedes Benz", "A/B Class");
        write_model(temp.path(), &key, 311);

        assert!(temp.path().join("Mercedes_Benz#A_or_B_Class.json").is_file());

        let store = FsModelStore::new(temp.path());
        assert_eq!(store.load(&key).expect("load").nobs, 311);
    }

    #[test]
    fn test_malformed_json_is_a_format_error() {
        let temp = tempdir().expect("tempdir");
        let key = ModelKey::new("VW", "Golf");
        std::fs::write(temp.path().join(key.file_name()), "{not json").expect("write");

        let store = FsModelStore::new(temp.path());
        assert!(matches!(
            store.load(&key),
            Err(StoreError::Format { .. })
        ));
    }

    #[test]
    fn test_artifact_failing_sanity_checks_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let key = ModelKey::new("VW", "Golf");
        write_model(temp.path(), &key, 0); // nobs = 0 must fail validation

        let store = FsModelStore::new(temp.path());
        match store.load(&key).expect_err("must fail") {
            StoreError::Format { reason, .. } => assert!(reason.contains("nobs")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
