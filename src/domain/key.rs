//! Normalized lookup keys for the model store.

use serde::{Deserialize, Serialize};

/// Normalized `<brand>#<model>` key addressing one regression artifact.
///
/// Spaces become underscores in both segments; a `/` in the model name
/// becomes `_or_` so the key stays filesystem-safe. The key must match the
/// store entry exactly, there is no fuzzy lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelKey(String);

impl ModelKey {
    /// Build the normalized key for a brand/model pair.
    #[must_use]
    pub fn new(brand: &str, model: &str) -> Self {
        let brand = brand.replace(' ', "_");
        let model = model.replace(' ', "_").replace('/', "_or_");
        Self(format!("{brand}#{model}"))
    }

    /// The normalized key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the artifact for this key.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let key = ModelKey::new("Mercedes Benz", "A/B Class");
        assert_eq!(key.as_str(), "Mercedes_Benz#A_or_B_Class");
    }

    #[test]
    fn test_plain_names_pass_through() {
        let key = ModelKey::new("VW", "Golf");
        assert_eq!(key.as_str(), "VW#Golf");
        assert_eq!(key.file_name(), "VW#Golf.json");
    }

    #[test]
    fn test_same_pair_same_key() {
        assert_eq!(
            ModelKey::new("Alfa Romeo", "Giulietta"),
            ModelKey::new("Alfa Romeo", "Giulietta")
        );
    }
}
