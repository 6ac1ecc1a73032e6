//! Chart Plotter Module
//! Draws bar charts and boxplot + histogram pairs to PNG files with [`plotters`].

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::stats::{BoxSummary, HistogramBin, StatsCalculator};

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = core::result::Result<T, PlotError>;

/// Bar fill for the price charts (`#2E7D32`).
pub const MARKET_GREEN: RGBColor = RGBColor(46, 125, 50);
/// Bar fill for the grade chart (`#D4A574`).
pub const GRADE_TAN: RGBColor = RGBColor(212, 165, 116);
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const BOX_FILL: RGBColor = RGBColor(189, 215, 238);
const MEDIAN_ORANGE: RGBColor = RGBColor(237, 125, 49);

/// 10x5 inches at 150 DPI.
pub const BAR_CHART_SIZE: (u32, u32) = (1500, 750);
/// 12x3 inches at 150 DPI.
pub const DISTRIBUTION_CHART_SIZE: (u32, u32) = (1800, 450);

const BAR_MARGIN: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    /// Categories on the Y axis; the first category is drawn at the top.
    Horizontal,
}

/// One labelled value per bar.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub color: RGBColor,
    pub orientation: Orientation,
}

fn area_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::DrawingArea(e.to_string())
}

fn config_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Upper end of a value axis starting at zero, with headroom above the tallest bar.
fn value_axis_max(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn category_label(categories: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(idx) => usize::try_from(*idx)
            .ok()
            .and_then(|i| categories.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Compact tick label for axis values of any magnitude.
fn axis_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else if abs >= 100.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a bar chart and save it as a PNG file.
    pub fn draw_bar_chart(chart: &BarChart, output_path: &Path) -> Result<()> {
        if chart.values.is_empty() {
            return Err(PlotError::InvalidData("Bar chart has no values".to_string()));
        }
        if chart.values.len() != chart.categories.len() {
            return Err(PlotError::InvalidData(format!(
                "{} values for {} categories",
                chart.values.len(),
                chart.categories.len()
            )));
        }

        let root = BitMapBackend::new(output_path, BAR_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(area_err)?;

        match chart.orientation {
            Orientation::Vertical => Self::draw_vertical_bars(&root, chart)?,
            Orientation::Horizontal => Self::draw_horizontal_bars(&root, chart)?,
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_vertical_bars(root: &DrawingArea<BitMapBackend<'_>, Shift>, chart: &BarChart) -> Result<()> {
        let n = chart.values.len() as i32;
        let categories = &chart.categories;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 36))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d((0..n).into_segmented(), 0.0..value_axis_max(&chart.values))
            .map_err(config_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(categories.len())
            .x_label_formatter(&|v| category_label(categories, v))
            .x_desc(chart.category_label.as_str())
            .y_desc(chart.value_label.as_str())
            .label_style(("sans-serif", 22))
            .axis_desc_style(("sans-serif", 26))
            .draw()
            .map_err(draw_err)?;

        let bars = || chart.values.iter().enumerate().map(|(i, v)| (i as i32, *v));
        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(chart.color.filled())
                .margin(BAR_MARGIN)
                .data(bars()),
        )
        .map_err(draw_err)?;
        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(BLACK.stroke_width(1))
                .margin(BAR_MARGIN)
                .data(bars()),
        )
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_horizontal_bars(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        chart: &BarChart,
    ) -> Result<()> {
        let n = chart.values.len() as i32;
        // Segment 0 sits at the bottom; reverse so the first category is on top.
        let categories: Vec<String> = chart.categories.iter().rev().cloned().collect();
        let values: Vec<f64> = chart.values.iter().rev().copied().collect();

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 36))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(110)
            .build_cartesian_2d(0.0..value_axis_max(&values), (0..n).into_segmented())
            .map_err(config_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(categories.len())
            .y_label_formatter(&|v| category_label(&categories, v))
            .x_desc(chart.value_label.as_str())
            .y_desc(chart.category_label.as_str())
            .label_style(("sans-serif", 22))
            .axis_desc_style(("sans-serif", 26))
            .draw()
            .map_err(draw_err)?;

        let bars = || values.iter().enumerate().map(|(i, v)| (i as i32, *v));
        ctx.draw_series(
            Histogram::horizontal(&ctx)
                .style(chart.color.filled())
                .margin(BAR_MARGIN)
                .data(bars()),
        )
        .map_err(draw_err)?;
        ctx.draw_series(
            Histogram::horizontal(&ctx)
                .style(BLACK.stroke_width(1))
                .margin(BAR_MARGIN)
                .data(bars()),
        )
        .map_err(draw_err)?;
        Ok(())
    }

    /// Draw a horizontal boxplot (left) and a histogram (right) of one column.
    ///
    /// Infinite values are left out; plotters cannot lay out an unbounded axis.
    pub fn draw_distribution(
        column: &str,
        values: &[f64],
        bins: usize,
        output_path: &Path,
    ) -> Result<()> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let summary = StatsCalculator::box_summary(&finite).ok_or_else(|| {
            PlotError::InvalidData(format!("Column '{}' has no finite values", column))
        })?;
        let histogram = StatsCalculator::histogram(&finite, bins);
        if histogram.is_empty() {
            return Err(PlotError::InvalidData("Histogram needs at least one bin".to_string()));
        }

        let root = BitMapBackend::new(output_path, DISTRIBUTION_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(area_err)?;

        let (left, right) = root.split_horizontally((DISTRIBUTION_CHART_SIZE.0 / 2) as i32);
        Self::draw_boxplot(&left, column, &summary)?;
        Self::draw_histogram(&right, column, &histogram)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_boxplot(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        column: &str,
        summary: &BoxSummary,
    ) -> Result<()> {
        let lowest = summary
            .outliers
            .first()
            .copied()
            .unwrap_or(summary.whisker_low)
            .min(summary.whisker_low);
        let highest = summary
            .outliers
            .last()
            .copied()
            .unwrap_or(summary.whisker_high)
            .max(summary.whisker_high);
        let pad = if highest > lowest {
            (highest - lowest) * 0.05
        } else {
            0.5
        };

        let mut ctx = ChartBuilder::on(area)
            .caption(format!("{} - Boxplot", column), ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(10)
            .build_cartesian_2d((lowest - pad)..(highest + pad), 0.0..1.0)
            .map_err(config_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .disable_y_axis()
            .x_labels(6)
            .x_label_formatter(&|v| axis_value(*v))
            .label_style(("sans-serif", 18))
            .draw()
            .map_err(draw_err)?;

        let (box_low, box_high, mid) = (0.35, 0.65, 0.5);
        let (cap_low, cap_high) = (0.42, 0.58);

        ctx.draw_series(std::iter::once(Rectangle::new(
            [(summary.q1, box_low), (summary.q3, box_high)],
            BOX_FILL.filled(),
        )))
        .map_err(draw_err)?;

        let outline = BLACK.stroke_width(2);
        ctx.draw_series([
            Rectangle::new([(summary.q1, box_low), (summary.q3, box_high)], outline),
        ])
        .map_err(draw_err)?;

        ctx.draw_series([
            PathElement::new(vec![(summary.whisker_low, mid), (summary.q1, mid)], outline),
            PathElement::new(vec![(summary.q3, mid), (summary.whisker_high, mid)], outline),
            PathElement::new(
                vec![(summary.whisker_low, cap_low), (summary.whisker_low, cap_high)],
                outline,
            ),
            PathElement::new(
                vec![(summary.whisker_high, cap_low), (summary.whisker_high, cap_high)],
                outline,
            ),
            PathElement::new(
                vec![(summary.median, box_low), (summary.median, box_high)],
                MEDIAN_ORANGE.stroke_width(3),
            ),
        ])
        .map_err(draw_err)?;

        ctx.draw_series(
            summary
                .outliers
                .iter()
                .map(|&v| Circle::new((v, mid), 4, BLACK.stroke_width(1))),
        )
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_histogram(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        column: &str,
        bins: &[HistogramBin],
    ) -> Result<()> {
        let (start, end) = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => return Err(PlotError::InvalidData("Histogram has no bins".to_string())),
        };
        let counts: Vec<f64> = bins.iter().map(|b| b.count as f64).collect();

        let mut ctx = ChartBuilder::on(area)
            .caption(format!("{} - Histogram", column), ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(start..end, 0.0..value_axis_max(&counts))
            .map_err(config_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(6)
            .x_label_formatter(&|v| axis_value(*v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(("sans-serif", 18))
            .draw()
            .map_err(draw_err)?;

        ctx.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], STEEL_BLUE.filled())
        }))
        .map_err(draw_err)?;
        ctx.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLACK.stroke_width(1))
        }))
        .map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_axis_max() {
        assert!((value_axis_max(&[100.0, 250.0]) - 275.0).abs() < 1e-9);
        assert_eq!(value_axis_max(&[]), 1.0);
        assert_eq!(value_axis_max(&[f64::NAN, 0.0]), 1.0);
    }

    #[test]
    fn test_category_label_uses_segment_centers() {
        let categories = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(category_label(&categories, &SegmentValue::CenterOf(1)), "Feb");
        assert_eq!(category_label(&categories, &SegmentValue::CenterOf(5)), "");
        assert_eq!(category_label(&categories, &SegmentValue::CenterOf(-1)), "");
        assert_eq!(category_label(&categories, &SegmentValue::Exact(0)), "");
        assert_eq!(category_label(&categories, &SegmentValue::Last), "");
    }

    #[test]
    fn test_axis_value() {
        assert_eq!(axis_value(1_300_000.0), "1.3M");
        assert_eq!(axis_value(452_000.0), "452K");
        assert_eq!(axis_value(1_500.0), "1500");
        assert_eq!(axis_value(7.0), "7");
        assert_eq!(axis_value(0.25), "0.25");
    }

    #[test]
    fn test_mismatched_bar_chart_rejected() {
        let chart = BarChart {
            title: "t".into(),
            category_label: "c".into(),
            value_label: "v".into(),
            categories: vec!["a".into()],
            values: vec![1.0, 2.0],
            color: MARKET_GREEN,
            orientation: Orientation::Vertical,
        };
        let dir = tempfile::tempdir().unwrap();
        let err = ChartPlotter::draw_bar_chart(&chart, &dir.path().join("x.png")).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
    }

    #[test]
    fn test_non_finite_distribution_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        let err = ChartPlotter::draw_distribution(
            "sqft",
            &[f64::INFINITY, f64::NEG_INFINITY, f64::NAN],
            30,
            &path,
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_distribution_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            ChartPlotter::draw_distribution("price", &[], 30, &dir.path().join("x.png")).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
    }
}
