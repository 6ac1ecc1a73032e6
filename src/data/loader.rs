//! CSV Data Loader Module
//! Handles sales CSV loading and validation using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::columns::{self, REQUIRED};
use super::processor::{DataProcessor, ProcessorError};
use super::table::HousingTable;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Unparseable price '{value}' in row {row}")]
    InvalidPrice { row: usize, value: String },
    #[error(transparent)]
    Processing(#[from] ProcessorError),
}

/// Loads a sales file into a [`HousingTable`].
pub struct DataLoader {
    drop_columns: Vec<String>,
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            drop_columns: Vec::new(),
            infer_schema_length: 10_000,
        }
    }

    /// Identifier columns removed after loading.
    pub fn with_drop_columns(mut self, names: &[String]) -> Self {
        self.drop_columns = names.to_vec();
        self
    }

    /// Load a CSV file with a header row.
    ///
    /// Any unparseable or non-finite price, or unparseable date, fails the whole load.
    pub fn load_csv(&self, file_path: &Path) -> Result<HousingTable, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::FileNotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .finish()?
            .collect()?;
        debug!("Read {} rows x {} columns", df.height(), df.width());

        let table = self.prepare(df)?;
        info!(
            "Loaded {} sales from {}",
            table.height(),
            file_path.display()
        );
        Ok(table)
    }

    /// Validate and clean an already-read frame.
    pub fn prepare(&self, df: DataFrame) -> Result<HousingTable, LoaderError> {
        for required in REQUIRED {
            if !df.get_column_names().iter().any(|c| c.as_str() == required) {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        let df = DataProcessor::drop_columns(df, &self.drop_columns)?;
        let df = Self::coerce_price(df)?;
        let df = DataProcessor::derive_month(df)?;
        Ok(HousingTable::new(df))
    }

    fn coerce_price(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        let raw = df.column(columns::PRICE)?.clone();
        let price = raw.cast(&DataType::Float64)?;

        let bad_row = price
            .f64()?
            .into_iter()
            .position(|v| v.map_or(true, |x| !x.is_finite()));
        if let Some(idx) = bad_row {
            let value = raw.get(idx)?;
            let value = if value.is_null() {
                String::new()
            } else {
                value.to_string().trim_matches('"').to_string()
            };
            return Err(LoaderError::InvalidPrice {
                row: idx + 1,
                value,
            });
        }

        df.with_column(price)?;
        Ok(df)
    }
}
