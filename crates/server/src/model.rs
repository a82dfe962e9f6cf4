//! Linear price model and the artifacts it is loaded from.
//!
//! The feature vector is `[total_sqft, bath, bhk, <one-hot location>...]`,
//! laid out exactly like `data_columns` in `columns.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const COLUMNS_FILE: &str = "columns.json";
const MODEL_FILE: &str = "model.json";
const NUMERIC_FEATURES: usize = 3;
const FALLBACK_PRICE_PER_SQFT: f64 = 0.05;

/// Locations served when no usable artifacts are present.
pub const SERVER_DEFAULT_LOCATIONS: [&str; 11] = [
    "1st Block Jayanagar",
    "1st Phase JP Nagar",
    "2nd Phase JP Nagar",
    "Electronic City",
    "Whitefield",
    "Sarjapur Road",
    "HSR Layout",
    "Koramangala",
    "Bannerghatta Road",
    "MG Road",
    "Indiranagar",
];

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{}' lists {found} columns, fewer than the three numeric features", .path.display())]
    TooFewColumns { path: PathBuf, found: usize },
    #[error("model has {coefficients} coefficients for {columns} data columns")]
    ShapeMismatch { coefficients: usize, columns: usize },
}

#[derive(Debug, Deserialize)]
struct ColumnsFile {
    data_columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LinearModelFile {
    intercept: f64,
    coefficients: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceModel {
    data_columns: Vec<String>,
    locations: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(&path).map_err(|source| ArtifactError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse { path, source })
}

impl PriceModel {
    pub fn load(artifacts_dir: &Path) -> Result<Self, ArtifactError> {
        let columns_path = artifacts_dir.join(COLUMNS_FILE);
        let columns: ColumnsFile = read_json(columns_path.clone())?;
        if columns.data_columns.len() < NUMERIC_FEATURES {
            return Err(ArtifactError::TooFewColumns {
                path: columns_path,
                found: columns.data_columns.len(),
            });
        }

        let model: LinearModelFile = read_json(artifacts_dir.join(MODEL_FILE))?;
        if model.coefficients.len() != columns.data_columns.len() {
            return Err(ArtifactError::ShapeMismatch {
                coefficients: model.coefficients.len(),
                columns: columns.data_columns.len(),
            });
        }

        let locations = columns.data_columns[NUMERIC_FEATURES..].to_vec();
        Ok(Self {
            data_columns: columns.data_columns,
            locations,
            intercept: model.intercept,
            coefficients: model.coefficients,
        })
    }

    pub fn load_or_fallback(artifacts_dir: &Path) -> Self {
        match Self::load(artifacts_dir) {
            Ok(model) => {
                info!(
                    dir = %artifacts_dir.display(),
                    locations = model.locations.len(),
                    "loaded price model artifacts"
                );
                model
            }
            Err(error) => {
                warn!(%error, "price model artifacts unavailable; serving fallback model");
                Self::fallback()
            }
        }
    }

    /// Flat per-square-foot model over the default locations.
    pub fn fallback() -> Self {
        let data_columns: Vec<String> = ["total_sqft", "bath", "bhk"]
            .into_iter()
            .map(str::to_string)
            .chain(SERVER_DEFAULT_LOCATIONS.iter().map(|name| name.to_lowercase()))
            .collect();
        let mut coefficients = vec![0.0; data_columns.len()];
        coefficients[0] = FALLBACK_PRICE_PER_SQFT;

        Self {
            data_columns,
            locations: SERVER_DEFAULT_LOCATIONS.iter().map(|name| name.to_string()).collect(),
            intercept: 0.0,
            coefficients,
        }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    fn location_column(&self, location: &str) -> Option<usize> {
        let wanted = location.trim().to_lowercase();
        self.data_columns
            .iter()
            .skip(NUMERIC_FEATURES)
            .position(|column| column.to_lowercase() == wanted)
            .map(|offset| offset + NUMERIC_FEATURES)
    }

    /// Price in Lakh rounded to two decimals, or `None` if the model
    /// produced a non-finite value. Unknown locations contribute nothing.
    pub fn predict(&self, location: &str, total_sqft: f64, bhk: i64, bath: i64) -> Option<f64> {
        let mut features = vec![0.0; self.data_columns.len()];
        features[0] = total_sqft;
        features[1] = bath as f64;
        features[2] = bhk as f64;
        match self.location_column(location) {
            Some(index) => features[index] = 1.0,
            None => debug!(%location, "location not found in model columns"),
        }

        let raw = self.intercept
            + features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        let rounded = (raw * 100.0).round() / 100.0;
        rounded.is_finite().then_some(rounded)
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
