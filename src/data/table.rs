//! Housing Table Module
//! Read-only view over the loaded sales DataFrame with typed column access.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
}

/// Value a table is grouped by.
///
/// Integer keys order before text keys, so month and grade groups come out
/// in their natural order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => fmt::Display::fmt(v, f),
            GroupKey::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for GroupKey {
    fn from(value: i64) -> Self {
        GroupKey::Int(value)
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::Text(value.to_string())
    }
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Loaded sales records. Filters return new tables; the wrapped frame is
/// never modified after construction.
#[derive(Debug, Clone, Default)]
pub struct HousingTable {
    df: DataFrame,
}

impl HousingTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().iter().any(|c| c.as_str() == name)
    }

    fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.df
            .column(name)
            .map_err(|_| TableError::ColumnNotFound(name.to_string()))
    }

    /// Numeric column names in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Column values as floats, one entry per row. Nulls and NaN are `None`.
    pub fn values_f64(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let casted = self.column(name)?.cast(&DataType::Float64)?;
        let ca = casted.f64()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Column values as floats with nulls and NaN dropped.
    pub fn present_f64(&self, name: &str) -> Result<Vec<f64>, TableError> {
        Ok(self.values_f64(name)?.into_iter().flatten().collect())
    }

    /// Row-aligned pairs of two columns, skipping rows where either is missing.
    pub fn paired_f64(&self, x: &str, y: &str) -> Result<(Vec<f64>, Vec<f64>), TableError> {
        let xs = self.values_f64(x)?;
        let ys = self.values_f64(y)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|(a, b)| Some((a?, b?)))
            .unzip())
    }

    /// Grouping keys for every row. Integral floats become integer keys;
    /// everything else that is not numeric is compared as text.
    pub fn keys(&self, name: &str) -> Result<Vec<Option<GroupKey>>, TableError> {
        let column = self.column(name)?;
        let dtype = column.dtype().clone();

        if is_integer_dtype(&dtype) {
            let casted = column.cast(&DataType::Int64)?;
            return Ok(casted.i64()?.into_iter().map(|v| v.map(GroupKey::Int)).collect());
        }

        if is_numeric_dtype(&dtype) {
            let casted = column.cast(&DataType::Float64)?;
            return Ok(casted
                .f64()?
                .into_iter()
                .map(|v| {
                    v.filter(|x| !x.is_nan()).map(|x| {
                        if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
                            GroupKey::Int(x as i64)
                        } else {
                            GroupKey::Text(x.to_string())
                        }
                    })
                })
                .collect());
        }

        let casted = column.cast(&DataType::String)?;
        Ok(casted
            .str()?
            .into_iter()
            .map(|v| v.map(|s| GroupKey::Text(s.to_string())))
            .collect())
    }

    /// Rows whose value in `name` lies within `[lower, upper]`, both inclusive.
    pub fn filter_between(
        &self,
        name: &str,
        lower: f64,
        upper: f64,
    ) -> Result<HousingTable, TableError> {
        // Surface a missing column as ColumnNotFound rather than a plan error.
        self.column(name)?;

        let value = col(name).cast(DataType::Float64);
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(value.clone().gt_eq(lit(lower)).and(value.lt_eq(lit(upper))))
            .collect()?;
        Ok(HousingTable::new(filtered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HousingTable {
        let df = df!(
            "price" => [100.0f64, 200.0, 300.0, 400.0],
            "zipcode" => [98001i64, 98002, 98001, 98003],
            "grade" => [Some(7i64), Some(8), None, Some(9)],
            "city" => ["Seattle", "Kent", "Seattle", "Auburn"]
        )
        .unwrap();
        HousingTable::new(df)
    }

    #[test]
    fn test_numeric_columns_excludes_text() {
        let table = sample();
        assert_eq!(table.numeric_columns(), vec!["price", "zipcode", "grade"]);
    }

    #[test]
    fn test_keys_for_integer_and_text_columns() {
        let table = sample();
        let zips = table.keys("zipcode").unwrap();
        assert_eq!(zips[0], Some(GroupKey::Int(98001)));

        let cities = table.keys("city").unwrap();
        assert_eq!(cities[1], Some(GroupKey::Text("Kent".into())));

        let grades = table.keys("grade").unwrap();
        assert_eq!(grades[2], None);
    }

    #[test]
    fn test_keys_for_integral_floats() {
        let df = df!("grade" => [7.0f64, 7.5]).unwrap();
        let keys = HousingTable::new(df).keys("grade").unwrap();
        assert_eq!(keys, vec![Some(GroupKey::Int(7)), Some(GroupKey::Text("7.5".into()))]);
    }

    #[test]
    fn test_int_keys_order_before_text() {
        assert!(GroupKey::Int(99) < GroupKey::Text("1".into()));
        assert!(GroupKey::Int(2) < GroupKey::Int(10));
    }

    #[test]
    fn test_paired_skips_missing_rows() {
        let (grades, prices) = sample().paired_f64("grade", "price").unwrap();
        assert_eq!(grades, vec![7.0, 8.0, 9.0]);
        assert_eq!(prices, vec![100.0, 200.0, 400.0]);
    }

    #[test]
    fn test_filter_between_is_inclusive() {
        let filtered = sample().filter_between("price", 200.0, 300.0).unwrap();
        assert_eq!(filtered.present_f64("price").unwrap(), vec![200.0, 300.0]);
    }

    #[test]
    fn test_missing_column() {
        let err = sample().values_f64("sqft").unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound(name) if name == "sqft"));
    }
}
