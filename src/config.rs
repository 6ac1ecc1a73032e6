//! Analysis Configuration Module
//! Thresholds, month sets and output settings for a market analysis run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A pair of grades whose mean price difference is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeStep {
    pub from: i64,
    pub to: i64,
}

impl Default for GradeStep {
    fn default() -> Self {
        Self { from: 7, to: 8 }
    }
}

/// Settings for a single analysis run.
///
/// Every field has a default, so a config file only needs the values it
/// overrides:
///
/// ```json
/// { "min_zip_sales": 30, "top_zip_count": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lower bound of the middle-class price segment.
    /// Default: 0.25
    pub lower_quantile: f64,

    /// Upper bound of the middle-class price segment.
    /// Default: 0.75
    pub upper_quantile: f64,

    /// Zipcodes with fewer segment sales than this are left out of the
    /// geography ranking.
    /// Default: 50
    pub min_zip_sales: usize,

    /// Number of zipcodes listed and charted.
    /// Default: 5
    pub top_zip_count: usize,

    /// Default: April to July
    pub spring_summer_months: Vec<i32>,

    /// Default: November to February
    pub winter_months: Vec<i32>,

    pub grade_step: GradeStep,

    /// Identifier columns removed right after loading.
    pub drop_columns: Vec<String>,

    /// Number of bins in each distribution histogram.
    /// Default: 30
    pub histogram_bins: usize,

    /// Directory chart images are written to.
    /// Default: current directory
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lower_quantile: 0.25,
            upper_quantile: 0.75,
            min_zip_sales: 50,
            top_zip_count: 5,
            spring_summer_months: vec![4, 5, 6, 7],
            winter_months: vec![11, 12, 1, 2],
            grade_step: GradeStep::default(),
            drop_columns: vec!["id".to_string(), "id.1".to_string(), "house_id".to_string()],
            histogram_bins: 30,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if !in_unit(self.lower_quantile) || !in_unit(self.upper_quantile) {
            return Err(ConfigError::Invalid(format!(
                "quantiles must lie in [0, 1], got {} and {}",
                self.lower_quantile, self.upper_quantile
            )));
        }
        if self.lower_quantile > self.upper_quantile {
            return Err(ConfigError::Invalid(format!(
                "lower quantile {} exceeds upper quantile {}",
                self.lower_quantile, self.upper_quantile
            )));
        }

        let months = self.spring_summer_months.iter().chain(&self.winter_months);
        if let Some(bad) = months.copied().find(|m| !(1..=12).contains(m)) {
            return Err(ConfigError::Invalid(format!("month {} is outside 1-12", bad)));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1".into()));
        }
        if self.top_zip_count == 0 {
            return Err(ConfigError::Invalid("top_zip_count must be at least 1".into()));
        }
        Ok(())
    }
}
