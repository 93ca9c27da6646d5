//! CSV loaders for the two startup inputs.
//!
//! - `Catalog`: the brand/model catalog (`brand,model` columns).
//! - `SummaryTable`: per-(brand, model) variable summaries, written with two
//!   header rows (feature names, then min/max/mean) over two index columns.
//!
//! Both tables are loaded once at startup and are read-only afterwards.
//! A missing or malformed file is fatal: the form cannot be rendered
//! without them.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::{CarSummary, FeatureSummary};

/// Features the summary table must carry for every brand/model pair.
const SUMMARY_FEATURES: [&str; 4] = ["age", "mileage", "power", "fuelConsumption"];

/// Error type for catalog and summary loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: u64,
        message: String,
    },

    #[error("{path} is missing column ({feature}, {stat})")]
    MissingColumn {
        path: String,
        feature: String,
        stat: String,
    },

    #[error("{path} contains no data rows")]
    Empty { path: String },
}

/// The brand/model catalog.
///
/// Brands keep the file order (first occurrence wins); models of a brand are
/// sorted for display.
#[derive(Debug, Clone)]
pub struct Catalog {
    rows: Vec<(String, String)>,
}

impl Catalog {
    /// Load the catalog from a `brand,model` CSV file.
    ///
    /// # Errors
    /// Returns error if the file is absent, unreadable or empty.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result.map_err(|e| CatalogError::Parse {
                path: display.clone(),
                line: i as u64 + 2,
                message: e.to_string(),
            })?;

            let brand = record.get(0).unwrap_or("").trim();
            let model = record.get(1).unwrap_or("").trim();
            if brand.is_empty() || model.is_empty() {
                return Err(CatalogError::Parse {
                    path: display.clone(),
                    line: i as u64 + 2,
                    message: "expected two non-empty columns (brand, model)".into(),
                });
            }
            rows.push((brand.to_string(), model.to_string()));
        }

        if rows.is_empty() {
            return Err(CatalogError::Empty { path: display });
        }

        tracing::info!(path = %path.display(), pairs = rows.len(), "Loaded brand/model catalog");
        Ok(Self { rows })
    }

    /// Unique brands in file order.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for (brand, _) in &self.rows {
            if !seen.iter().any(|b| b == &brand.as_str()) {
                seen.push(brand.as_str());
            }
        }
        seen
    }

    /// Models of one brand, sorted.
    #[must_use]
    pub fn models_of(&self, brand: &str) -> Vec<&str> {
        let mut models: Vec<&str> = self
            .rows
            .iter()
            .filter(|(b, _)| b == brand)
            .map(|(_, m)| m.as_str())
            .collect();
        models.sort_unstable();
        models.dedup();
        models
    }
}

/// Per-(brand, model) summary statistics table.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    entries: HashMap<(String, String), CarSummary>,
}

impl SummaryTable {
    /// Load the summary table.
    ///
    /// The file has two header rows: the first names the feature of each
    /// column, the second the statistic (min/max/mean). The first two
    /// columns of every data row are the brand and model index.
    ///
    /// # Errors
    /// Returns error if the file is absent, malformed, or a required
    /// (feature, statistic) column is missing.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| CatalogError::Io {
                path: display.clone(),
                source,
            })?;

        let mut records = reader.records();
        let feature_row = Self::next_header_row(&mut records, &display, 1)?;
        let stat_row = Self::next_header_row(&mut records, &display, 2)?;

        // Map (feature, stat) -> column index. Pandas leaves feature cells
        // blank under a spanned header, so carry the last seen feature along.
        let mut columns: HashMap<(String, String), usize> = HashMap::new();
        let mut current_feature = String::new();
        for idx in 2..feature_row.len().max(stat_row.len()) {
            let feature = feature_row.get(idx).unwrap_or("").trim();
            if !feature.is_empty() {
                current_feature = feature.to_string();
            }
            let stat = stat_row.get(idx).unwrap_or("").trim();
            if !current_feature.is_empty() && !stat.is_empty() {
                columns.insert((current_feature.clone(), stat.to_string()), idx);
            }
        }

        for feature in SUMMARY_FEATURES {
            for stat in ["min", "max", "mean"] {
                if !columns.contains_key(&(feature.to_string(), stat.to_string())) {
                    return Err(CatalogError::MissingColumn {
                        path: display.clone(),
                        feature: feature.to_string(),
                        stat: stat.to_string(),
                    });
                }
            }
        }

        let mut entries = HashMap::new();
        let mut line = 2u64;
        for result in records {
            line += 1;
            let record = result.map_err(|e| CatalogError::Parse {
                path: display.clone(),
                line,
                message: e.to_string(),
            })?;

            let brand = record.get(0).unwrap_or("").trim().to_string();
            let model = record.get(1).unwrap_or("").trim().to_string();
            if brand.is_empty() || model.is_empty() {
                return Err(CatalogError::Parse {
                    path: display.clone(),
                    line,
                    message: "data row without brand/model index".into(),
                });
            }

            let value = |feature: &str, stat: &str| -> Result<f64, CatalogError> {
                let idx = columns[&(feature.to_string(), stat.to_string())];
                record
                    .get(idx)
                    .unwrap_or("")
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| CatalogError::Parse {
                        path: display.clone(),
                        line,
                        message: format!("({feature}, {stat}): {e}"),
                    })
            };

            let feature = |name: &str| -> Result<FeatureSummary, CatalogError> {
                Ok(FeatureSummary {
                    min: value(name, "min")?,
                    max: value(name, "max")?,
                    mean: value(name, "mean")?,
                })
            };

            let summary = CarSummary {
                age: feature("age")?,
                mileage: feature("mileage")?,
                power: feature("power")?,
                fuel_consumption: feature("fuelConsumption")?,
            };
            entries.insert((brand, model), summary);
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty { path: display });
        }

        tracing::info!(path = %path.display(), pairs = entries.len(), "Loaded variable summaries");
        Ok(Self { entries })
    }

    fn next_header_row(
        records: &mut csv::StringRecordsIter<'_, std::fs::File>,
        path: &str,
        line: u64,
    ) -> Result<csv::StringRecord, CatalogError> {
        match records.next() {
            Some(Ok(record)) => Ok(record),
            Some(Err(e)) => Err(CatalogError::Parse {
                path: path.to_string(),
                line,
                message: e.to_string(),
            }),
            None => Err(CatalogError::Empty {
                path: path.to_string(),
            }),
        }
    }

    /// Summary for one brand/model pair, if present.
    #[must_use]
    pub fn get(&self, brand: &str, model: &str) -> Option<&CarSummary> {
        self.entries.get(&(brand.to_string(), model.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(content.as_bytes()).expect("write file");
        path
    }

    #[test]
    fn test_catalog_brands_and_models() {
        let temp = tempdir().expect("tempdir");
        let path = write_file(
            temp.path(),
            "brands_models.csv",
            "brand,model\nVW,Golf\nVW,Passat\nBMW,320\nVW,Golf\nBMW,118\n",
        );

        let catalog = Catalog::load(&path).expect("load");
        assert_eq!(catalog.brands(), vec!["VW", "BMW"]);
        assert_eq!(catalog.models_of("VW"), vec!["Golf", "Passat"]);
        assert_eq!(catalog.models_of("BMW"), vec!["118", "320"]);
        assert!(catalog.models_of("Audi").is_empty());
    }

    #[test]
    fn test_catalog_missing_file_fails() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("nope.csv");
        assert!(matches!(
            Catalog::load(&missing),
            Err(CatalogError::Io { .. })
        ));
    }

    const SUMMARY_CSV: &str = "\
,,age,age,age,mileage,mileage,mileage,power,power,power,fuelConsumption,fuelConsumption,fuelConsumption\n\
,,min,max,mean,min,max,mean,min,max,mean,min,max,mean\n\
VW,Golf,1,12,5,1000,250000,78430,60,300,109.6,3.0,12.0,5.43\n\
BMW,320,1,9,4,500,190000,64120,120,350,181.2,4.1,11.0,6.8\n";

    #[test]
    fn test_summary_lookup() {
        let temp = tempdir().expect("tempdir");
        let path = write_file(temp.path(), "variable_summaries.csv", SUMMARY_CSV);

        let table = SummaryTable::load(&path).expect("load");
        let golf = table.get("VW", "Golf").expect("entry");
        assert!((golf.age.mean - 5.0).abs() < 1e-9);
        assert!((golf.mileage.mean - 78_430.0).abs() < 1e-9);
        assert!((golf.power.max - 300.0).abs() < 1e-9);
        assert!((golf.fuel_consumption.mean - 5.43).abs() < 1e-9);

        assert!(table.get("VW", "Polo").is_none());
    }

    #[test]
    fn test_summary_with_spanned_feature_header() {
        // Feature cells left blank under a spanned header, pandas-style.
        let csv = "\
,,age,,,mileage,,,power,,,fuelConsumption,,\n\
,,min,max,mean,min,max,mean,min,max,mean,min,max,mean\n\
VW,Golf,1,12,5,1000,250000,78430,60,300,109.6,3.0,12.0,5.43\n";
        let temp = tempdir().expect("tempdir");
        let path = write_file(temp.path(), "variable_summaries.csv", csv);

        let table = SummaryTable::load(&path).expect("load");
        assert!(table.get("VW", "Golf").is_some());
    }

    #[test]
    fn test_summary_missing_stat_column_fails() {
        let csv = "\
,,age,age,mileage,mileage,mileage,power,power,power,fuelConsumption,fuelConsumption,fuelConsumption\n\
,,min,mean,min,max,mean,min,max,mean,min,max,mean\n\
VW,Golf,1,5,1000,250000,78430,60,300,109.6,3.0,12.0,5.43\n";
        let temp = tempdir().expect("tempdir");
        let path = write_file(temp.path(), "variable_summaries.csv", csv);

        match SummaryTable::load(&path).expect_err("must fail") {
            CatalogError::MissingColumn { feature, stat, .. } => {
                assert_eq!(feature, "age");
                assert_eq!(stat, "max");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_summary_unparseable_value_fails() {
        let csv = "\
,,age,age,age,mileage,mileage,mileage,power,power,power,fuelConsumption,fuelConsumption,fuelConsumption\n\
,,min,max,mean,min,max,mean,min,max,mean,min,max,mean\n\
VW,Golf,1,12,abc,1000,250000,78430,60,300,109.6,3.0,12.0,5.43\n";
        let temp = tempdir().expect("tempdir");
        let path = write_file(temp.path(), "variable_summaries.csv", csv);

        assert!(matches!(
            SummaryTable::load(&path),
            Err(CatalogError::Parse { .. })
        ));
    }
}
