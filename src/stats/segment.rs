//! Quantile segmentation of a table by one numeric column.

use serde::Serialize;
use tracing::{info, warn};

use super::calculator::StatsCalculator;
use crate::data::{HousingTable, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileBounds {
    pub lower: f64,
    pub upper: f64,
}

impl QuantileBounds {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Rows of a source table whose value lies within the quantile bounds.
#[derive(Debug, Clone)]
pub struct Segment {
    pub bounds: QuantileBounds,
    pub table: HousingTable,
    /// Row count of the table the bounds were computed on.
    pub source_rows: usize,
}

impl Segment {
    pub fn height(&self) -> usize {
        self.table.height()
    }

    /// Share of source rows inside the segment, in percent.
    pub fn share_pct(&self) -> f64 {
        if self.source_rows == 0 {
            return f64::NAN;
        }
        self.height() as f64 / self.source_rows as f64 * 100.0
    }
}

pub struct Segmenter;

impl Segmenter {
    /// Quantile bounds of `column` over the non-missing values of `table`.
    /// An empty column yields NaN bounds.
    pub fn bounds(
        table: &HousingTable,
        column: &str,
        lower_q: f64,
        upper_q: f64,
    ) -> Result<QuantileBounds, TableError> {
        let sorted = StatsCalculator::sorted(&table.present_f64(column)?);
        Ok(QuantileBounds {
            lower: StatsCalculator::quantile(&sorted, lower_q),
            upper: StatsCalculator::quantile(&sorted, upper_q),
        })
    }

    /// Keep rows with `lower <= value <= upper` where the bounds are the
    /// `lower_q` and `upper_q` quantiles of the whole table.
    pub fn middle(
        table: &HousingTable,
        column: &str,
        lower_q: f64,
        upper_q: f64,
    ) -> Result<Segment, TableError> {
        let bounds = Self::bounds(table, column, lower_q, upper_q)?;

        let segment_table = if bounds.lower.is_nan() || bounds.upper.is_nan() {
            warn!("No '{}' values to segment; segment is empty", column);
            table.filter_between(column, 1.0, 0.0)?
        } else {
            table.filter_between(column, bounds.lower, bounds.upper)?
        };

        info!(
            "Segment {:.2}-{:.2} quantile of '{}': {:.0} - {:.0} ({} of {} rows)",
            lower_q,
            upper_q,
            column,
            bounds.lower,
            bounds.upper,
            segment_table.height(),
            table.height()
        );

        Ok(Segment {
            bounds,
            table: segment_table,
            source_rows: table.height(),
        })
    }
}
