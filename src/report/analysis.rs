//! Market Analysis Module
//! Derives the middle-class, timing, geography, quality and profit figures
//! from a loaded sales table.

use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::data::columns::{GRADE, MONTH, PRICE, ZIPCODE};
use crate::data::{GroupKey, HousingTable, TableError};
use crate::stats::{
    Aggregate, Aggregator, DescriptiveStats, GroupStats, QuantileBounds, Segment, Segmenter,
    SortOrder, StatsCalculator,
};

#[derive(Debug, Clone, Serialize)]
pub struct MiddleClass {
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub bounds: QuantileBounds,
    pub total_houses: usize,
    pub houses: usize,
    pub share_pct: f64,
    pub price: DescriptiveStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    /// Mean price per month, in month order.
    pub monthly: Aggregate,
    pub best: Option<GroupStats>,
    pub worst: Option<GroupStats>,
    pub difference: f64,
    pub difference_pct: f64,
    pub spring_summer_mean: f64,
    pub winter_mean: f64,
    pub seasonal_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Geography {
    pub min_sales: usize,
    /// Requested length of the top list; `top` is shorter when fewer zipcodes qualify.
    pub top_count: usize,
    /// Qualifying zipcodes, highest mean first.
    pub ranked: Aggregate,
    pub top: Vec<GroupStats>,
    pub top_price: f64,
    pub bottom_price: f64,
    pub location_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeDelta {
    pub from: i64,
    pub to: i64,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quality {
    pub correlation: f64,
    /// Mean price per grade, in grade order.
    pub grades: Aggregate,
    pub grade_step: Option<GradeDelta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpectedProfit {
    pub median_price: f64,
    pub timing_gain: f64,
}

/// All figures reported for one run.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub middle_class: MiddleClass,
    pub timing: Timing,
    pub geography: Geography,
    pub quality: Quality,
    pub profit: ExpectedProfit,
}

impl MarketReport {
    /// Segment the table by price and derive every report section from the segment.
    pub fn build(table: &HousingTable, config: &AnalysisConfig) -> Result<Self, TableError> {
        let segment = Segmenter::middle(
            table,
            PRICE,
            config.lower_quantile,
            config.upper_quantile,
        )?;

        let middle_class = Self::middle_class(&segment, config)?;
        let timing = Self::timing(&segment, config)?;
        let geography = Self::geography(&segment, config)?;
        let quality = Self::quality(&segment, config)?;

        let median_price = middle_class.price.median;
        let profit = ExpectedProfit {
            median_price,
            timing_gain: median_price * timing.seasonal_pct / 100.0,
        };

        info!(
            "Report built: {} months, {} qualifying zipcodes, {} grades",
            timing.monthly.len(),
            geography.ranked.len(),
            quality.grades.len()
        );

        Ok(Self {
            middle_class,
            timing,
            geography,
            quality,
            profit,
        })
    }

    fn middle_class(segment: &Segment, config: &AnalysisConfig) -> Result<MiddleClass, TableError> {
        let prices = segment.table.present_f64(PRICE)?;
        Ok(MiddleClass {
            lower_quantile: config.lower_quantile,
            upper_quantile: config.upper_quantile,
            bounds: segment.bounds,
            total_houses: segment.source_rows,
            houses: segment.height(),
            share_pct: segment.share_pct(),
            price: StatsCalculator::compute_descriptive_stats(&prices),
        })
    }

    fn timing(segment: &Segment, config: &AnalysisConfig) -> Result<Timing, TableError> {
        let monthly = Aggregator::group_mean(&segment.table, MONTH, PRICE, None, SortOrder::Key)?;
        let best = monthly.best().cloned();
        let worst = monthly.worst().cloned();

        let (difference, difference_pct) = match (&best, &worst) {
            (Some(best), Some(worst)) => (
                best.mean - worst.mean,
                StatsCalculator::pct_change(worst.mean, best.mean),
            ),
            _ => (f64::NAN, f64::NAN),
        };

        let months = |list: &[i32]| list.iter().map(|&m| i64::from(m)).collect::<Vec<_>>();
        let spring_summer_mean = Aggregator::mean_for_keys(
            &segment.table,
            MONTH,
            PRICE,
            &months(&config.spring_summer_months),
        )?;
        let winter_mean =
            Aggregator::mean_for_keys(&segment.table, MONTH, PRICE, &months(&config.winter_months))?;

        Ok(Timing {
            monthly,
            best,
            worst,
            difference,
            difference_pct,
            spring_summer_mean,
            winter_mean,
            seasonal_pct: StatsCalculator::pct_change(winter_mean, spring_summer_mean),
        })
    }

    fn geography(segment: &Segment, config: &AnalysisConfig) -> Result<Geography, TableError> {
        let ranked = Aggregator::group_mean(
            &segment.table,
            ZIPCODE,
            PRICE,
            Some(config.min_zip_sales),
            SortOrder::MeanDescending,
        )?;

        let top_price = ranked.best().map_or(f64::NAN, |g| g.mean);
        let bottom_price = ranked.worst().map_or(f64::NAN, |g| g.mean);

        Ok(Geography {
            min_sales: config.min_zip_sales,
            top_count: config.top_zip_count,
            top: ranked.top(config.top_zip_count).to_vec(),
            top_price,
            bottom_price,
            location_pct: StatsCalculator::pct_change(bottom_price, top_price),
            ranked,
        })
    }

    fn quality(segment: &Segment, config: &AnalysisConfig) -> Result<Quality, TableError> {
        let (grades_x, prices_y) = segment.table.paired_f64(GRADE, PRICE)?;
        let correlation = StatsCalculator::pearson_correlation(&grades_x, &prices_y);

        let grades = Aggregator::group_mean(&segment.table, GRADE, PRICE, None, SortOrder::Key)?;

        let step = config.grade_step;
        let grade_step = match (
            grades.get(&GroupKey::Int(step.from)),
            grades.get(&GroupKey::Int(step.to)),
        ) {
            (Some(from), Some(to)) => Some(GradeDelta {
                from: step.from,
                to: step.to,
                delta: to.mean - from.mean,
            }),
            _ => None,
        };

        Ok(Quality {
            correlation,
            grades,
            grade_step,
        })
    }
}
