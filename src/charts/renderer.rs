//! Static Chart Renderer
//! Writes the report charts into the output directory, one PNG per chart:
//!
//! - `chart_timing.png`: mean middle-class price by month
//! - `chart_geography.png`: top zipcodes by mean price
//! - `chart_quality.png`: mean price by grade
//! - `dist_<column>.png`: boxplot + histogram for every numeric column

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::plotter::{BarChart, ChartPlotter, Orientation, PlotError, GRADE_TAN, MARKET_GREEN};
use crate::data::HousingTable;
use crate::report::MarketReport;
use crate::stats::{Aggregate, GroupStats};

pub const TIMING_CHART: &str = "chart_timing.png";
pub const GEOGRAPHY_CHART: &str = "chart_geography.png";
pub const QUALITY_CHART: &str = "chart_quality.png";

/// File name of the distribution chart for `column`.
pub fn distribution_file_name(column: &str) -> String {
    let safe: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("dist_{}.png", safe)
}

fn price_bars(groups: &[GroupStats]) -> (Vec<String>, Vec<f64>) {
    groups
        .iter()
        .map(|g| (g.key.to_string(), g.mean / 1000.0))
        .unzip()
}

pub struct ChartRenderer {
    output_dir: PathBuf,
    histogram_bins: usize,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, histogram_bins: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            histogram_bins,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render every chart. `table` is the cleaned full table the
    /// distribution charts are drawn from.
    pub fn render_all(
        &self,
        report: &MarketReport,
        table: &HousingTable,
    ) -> Result<Vec<PathBuf>, PlotError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut written = Vec::new();
        written.extend(self.render_timing(&report.timing.monthly)?);
        written.extend(self.render_geography(&report.geography.top)?);
        written.extend(self.render_quality(&report.quality.grades)?);
        written.extend(self.render_distributions(table)?);

        info!(
            "Wrote {} charts to {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    /// Bar chart of mean price (K $) per month. Skipped when there are no months.
    pub fn render_timing(&self, monthly: &Aggregate) -> Result<Option<PathBuf>, PlotError> {
        let (categories, values) = price_bars(&monthly.groups);
        self.render_bars(
            TIMING_CHART,
            BarChart {
                title: "Average Price by Month (Middle-Class)".to_string(),
                category_label: "Month".to_string(),
                value_label: "Price (K $)".to_string(),
                categories,
                values,
                color: MARKET_GREEN,
                orientation: Orientation::Vertical,
            },
        )
    }

    /// Horizontal bars of the top zipcodes, highest mean on top.
    pub fn render_geography(&self, top: &[GroupStats]) -> Result<Option<PathBuf>, PlotError> {
        let (categories, values) = price_bars(top);
        self.render_bars(
            GEOGRAPHY_CHART,
            BarChart {
                title: format!("Top {} Zipcodes - Middle Class", top.len()),
                category_label: "Zipcode".to_string(),
                value_label: "Price (K $)".to_string(),
                categories,
                values,
                color: MARKET_GREEN,
                orientation: Orientation::Horizontal,
            },
        )
    }

    pub fn render_quality(&self, grades: &Aggregate) -> Result<Option<PathBuf>, PlotError> {
        let (categories, values) = price_bars(&grades.groups);
        self.render_bars(
            QUALITY_CHART,
            BarChart {
                title: "Average Price by Grade (Middle-Class)".to_string(),
                category_label: "Grade".to_string(),
                value_label: "Price (K $)".to_string(),
                categories,
                values,
                color: GRADE_TAN,
                orientation: Orientation::Vertical,
            },
        )
    }

    fn render_bars(&self, file_name: &str, chart: BarChart) -> Result<Option<PathBuf>, PlotError> {
        if chart.values.is_empty() {
            warn!("Skipping {}: no groups to plot", file_name);
            return Ok(None);
        }

        let path = self.output_dir.join(file_name);
        ChartPlotter::draw_bar_chart(&chart, &path)?;
        info!("Chart saved: {}", path.display());
        Ok(Some(path))
    }

    /// One boxplot + histogram image per numeric column with any finite values.
    pub fn render_distributions(&self, table: &HousingTable) -> Result<Vec<PathBuf>, PlotError> {
        let mut written = Vec::new();

        for column in table.numeric_columns() {
            let values: Vec<f64> = table
                .present_f64(&column)
                .map_err(|e| PlotError::InvalidData(e.to_string()))?
                .into_iter()
                .filter(|v| v.is_finite())
                .collect();
            if values.is_empty() {
                warn!("Skipping distribution of '{}': no finite values", column);
                continue;
            }

            let path = self.output_dir.join(distribution_file_name(&column));
            ChartPlotter::draw_distribution(&column, &values, self.histogram_bins, &path)?;
            info!("Chart saved: {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SortOrder;

    #[test]
    fn test_distribution_file_name() {
        assert_eq!(distribution_file_name("price"), "dist_price.png");
        assert_eq!(distribution_file_name("sqft living"), "dist_sqft_living.png");
        assert_eq!(distribution_file_name("id.1"), "dist_id_1.png");
    }

    #[test]
    fn test_price_bars_in_thousands() {
        let groups = vec![GroupStats {
            key: 5i64.into(),
            mean: 452_000.0,
            count: 3,
        }];
        let (labels, values) = price_bars(&groups);
        assert_eq!(labels, vec!["5"]);
        assert_eq!(values, vec![452.0]);
    }

    #[test]
    fn test_empty_aggregate_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path(), 30);
        let empty = Aggregate {
            key_column: "month".into(),
            order: SortOrder::Key,
            groups: Vec::new(),
        };

        assert!(renderer.render_timing(&empty).unwrap().is_none());
        assert!(renderer.render_geography(&[]).unwrap().is_none());
        assert!(!dir.path().join(TIMING_CHART).exists());
    }

    #[test]
    fn test_infinite_column_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path(), 30);
        let df = polars::df!("sqft_lot" => [f64::INFINITY, f64::NEG_INFINITY]).unwrap();

        let written = renderer.render_distributions(&HousingTable::new(df)).unwrap();
        assert!(written.is_empty());
        assert!(!dir.path().join(distribution_file_name("sqft_lot")).exists());
    }
}
