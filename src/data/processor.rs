//! Data Processor Module
//! Column cleanup and date-derived fields applied right after loading.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::columns;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unparseable date '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },
}

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y%m%dT%H%M%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Handles column cleanup and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Drop the named columns that are present; absent names are ignored.
    pub fn drop_columns(df: DataFrame, names: &[String]) -> Result<DataFrame, ProcessorError> {
        let mut df = df;
        for name in names {
            if df.get_column_names().iter().any(|c| c.as_str() == name) {
                df = df.drop(name)?;
                debug!("Dropped column '{}'", name);
            }
        }
        Ok(df)
    }

    /// Parse a sale date in any of the layouts found in sales exports.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    /// Replace the raw date column with a typed `Date` column and add the
    /// derived `month` column (1-12).
    ///
    /// Rows are numbered from 1 in errors, matching the data row after the header.
    pub fn derive_month(mut df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let raw = df.column(columns::DATE)?.cast(&DataType::String)?;
        let raw = raw.str()?;

        let mut days = Vec::with_capacity(raw.len());
        let mut months = Vec::with_capacity(raw.len());

        for (idx, value) in raw.into_iter().enumerate() {
            let date = value.and_then(Self::parse_date).ok_or_else(|| {
                ProcessorError::InvalidDate {
                    row: idx + 1,
                    value: value.unwrap_or_default().to_string(),
                }
            })?;
            days.push(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE);
            months.push(date.month() as i32);
        }

        let dates = Series::new(columns::DATE.into(), days).cast(&DataType::Date)?;
        df.with_column(dates)?;
        df.with_column(Series::new(columns::MONTH.into(), months))?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2014, 10, 13).unwrap();
        for raw in [
            "2014-10-13",
            "20141013",
            "10/13/2014",
            "2014-10-13 00:00:00",
            "2014-10-13T00:00:00",
            "2014-10-13 00:00:00.5",
            "2014-10-13T00:00:00.250",
            "20141013T000000",
            " 2014-10-13 ",
        ] {
            assert_eq!(DataProcessor::parse_date(raw), Some(expected), "layout {raw}");
        }
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(DataProcessor::parse_date("yesterday"), None);
        assert_eq!(DataProcessor::parse_date("2014-13-40"), None);
        assert_eq!(DataProcessor::parse_date(""), None);
    }

    #[test]
    fn test_derive_month() {
        let df = df!(
            "date" => ["2014-05-02", "20150114T000000", "12/31/2014"],
            "price" => [1.0f64, 2.0, 3.0]
        )
        .unwrap();

        let df = DataProcessor::derive_month(df).unwrap();
        let months: Vec<Option<i32>> = df.column("month").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(months, vec![Some(5), Some(1), Some(12)]);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_derive_month_reports_bad_row() {
        let df = df!("date" => ["2014-05-02", "not a date"]).unwrap();
        match DataProcessor::derive_month(df) {
            Err(ProcessorError::InvalidDate { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected InvalidDate, got {:?}", other.map(|d| d.shape())),
        }
    }

    #[test]
    fn test_integer_dates_are_parsed() {
        let df = df!("date" => [20140502i64]).unwrap();
        let df = DataProcessor::derive_month(df).unwrap();
        let month = df.column("month").unwrap().i32().unwrap().get(0);
        assert_eq!(month, Some(5));
    }

    #[test]
    fn test_drop_columns_ignores_absent() {
        let df = df!("id" => [1i64], "price" => [1.0f64]).unwrap();
        let names = vec!["id".to_string(), "house_id".to_string()];
        let df = DataProcessor::drop_columns(df, &names).unwrap();
        assert_eq!(df.get_column_names().len(), 1);
        assert_eq!(df.get_column_names()[0].as_str(), "price");
    }
}
