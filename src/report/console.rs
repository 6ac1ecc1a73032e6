//! Console Report Module
//! Writes a [`MarketReport`] as sectioned text, chart data or JSON.

use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use super::analysis::MarketReport;
use super::format::{currency, fixed, percent, thousands};
use crate::stats::{GroupStats, SortOrder};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output layout of the console report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReportFormat {
    /// Full sectioned report with currency and percent figures.
    #[default]
    Text,
    /// Compact per-group listing in thousands, as fed into charts.
    ChartData,
    Json,
}

const RULE_WIDTH: usize = 60;

fn section(out: &mut impl Write, number: Option<usize>, title: &str) -> std::io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let heading = match number {
        Some(n) => format!("{}. {}", n, title),
        None => title.to_string(),
    };
    writeln!(out, "\n{}\n{}\n{}", rule, heading, rule)
}

fn group_label(group: Option<&GroupStats>) -> String {
    group.map_or_else(|| "n/a".to_string(), |g| g.key.to_string())
}

fn group_mean(group: Option<&GroupStats>) -> String {
    group.map_or_else(|| "n/a".to_string(), |g| currency(g.mean))
}

/// `0.25` -> `"Q25"`.
fn quantile_label(q: f64) -> String {
    format!("Q{}", fixed(q * 100.0, 0))
}

pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn write(
        out: &mut impl Write,
        report: &MarketReport,
        format: ReportFormat,
    ) -> Result<(), ReportError> {
        match format {
            ReportFormat::Text => Self::write_text(out, report)?,
            ReportFormat::ChartData => Self::write_chart_data(out, report)?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, report)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn write_text(out: &mut impl Write, report: &MarketReport) -> std::io::Result<()> {
        let mc = &report.middle_class;
        let lower_label = quantile_label(mc.lower_quantile);
        let upper_label = quantile_label(mc.upper_quantile);

        section(out, Some(1), "MIDDLE-CLASS DEFINITION")?;
        writeln!(out, "{}: {}", lower_label, currency(mc.bounds.lower))?;
        writeln!(out, "{}: {}", upper_label, currency(mc.bounds.upper))?;
        writeln!(out, "Total houses: {}", mc.total_houses)?;
        writeln!(
            out,
            "Middle-Class houses: {} ({})",
            mc.houses,
            percent(mc.share_pct)
        )?;
        writeln!(
            out,
            "Mean / median price: {} / {}",
            currency(mc.price.mean),
            currency(mc.price.median)
        )?;

        let timing = &report.timing;
        section(out, Some(2), "TIMING - PRICE BY MONTH")?;
        for group in &timing.monthly.sorted(SortOrder::MeanDescending).groups {
            writeln!(out, "  {:>2}: {}", group.key, currency(group.mean))?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "Best month: {} ({})",
            group_label(timing.best.as_ref()),
            group_mean(timing.best.as_ref())
        )?;
        writeln!(
            out,
            "Worst month: {} ({})",
            group_label(timing.worst.as_ref()),
            group_mean(timing.worst.as_ref())
        )?;
        writeln!(
            out,
            "Difference: {} ({})",
            currency(timing.difference),
            percent(timing.difference_pct)
        )?;
        writeln!(out)?;
        writeln!(out, "Spring/Summer avg: {}", currency(timing.spring_summer_mean))?;
        writeln!(out, "Winter avg: {}", currency(timing.winter_mean))?;
        writeln!(out, "Seasonal difference: {}", percent(timing.seasonal_pct))?;

        let geo = &report.geography;
        section(out, Some(3), "GEOGRAPHY - TOP ZIPCODES")?;
        writeln!(
            out,
            "Top {} Zipcodes (min {} sales):",
            geo.top_count,
            geo.min_sales
        )?;
        for (rank, group) in geo.top.iter().enumerate() {
            writeln!(
                out,
                "  {}. {}: {} (n={})",
                rank + 1,
                group.key,
                currency(group.mean),
                group.count
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Top zipcode: {}", currency(geo.top_price))?;
        writeln!(out, "Bottom zipcode: {}", currency(geo.bottom_price))?;
        writeln!(out, "Location difference: {}", percent(geo.location_pct))?;

        let quality = &report.quality;
        section(out, Some(4), "QUALITY - GRADE CORRELATION")?;
        writeln!(out, "Grade-Price correlation: {}", fixed(quality.correlation, 3))?;
        writeln!(out)?;
        writeln!(out, "Price by Grade:")?;
        for group in &quality.grades.groups {
            writeln!(out, "  {:>2}: {}", group.key, currency(group.mean))?;
        }
        if let Some(step) = &quality.grade_step {
            writeln!(out)?;
            writeln!(
                out,
                "Grade {}->{} difference: {}",
                step.from,
                step.to,
                currency(step.delta)
            )?;
        }

        let profit = &report.profit;
        section(out, Some(5), "EXPECTED PROFIT (Timing + Quality)")?;
        writeln!(out, "Median Middle-Class price: {}", currency(profit.median_price))?;
        writeln!(
            out,
            "Timing gain ({}): {}",
            percent(timing.seasonal_pct),
            currency(profit.timing_gain)
        )?;

        section(out, None, "SUMMARY")?;
        writeln!(
            out,
            "Middle-Class: {} - {}",
            currency(mc.bounds.lower),
            currency(mc.bounds.upper)
        )?;
        writeln!(out, "Sample size: {} houses", mc.houses)?;
        writeln!(
            out,
            "Best timing: Month {} (+{} vs worst)",
            group_label(timing.best.as_ref()),
            percent(timing.difference_pct)
        )?;
        writeln!(
            out,
            "Top Zipcode: {} ({})",
            group_label(geo.top.first()),
            currency(geo.top_price)
        )?;
        writeln!(out, "Location impact: {}%", fixed(geo.location_pct, 0))?;
        writeln!(out, "Grade correlation: {}", fixed(quality.correlation, 2))?;
        Ok(())
    }

    fn write_chart_data(out: &mut impl Write, report: &MarketReport) -> std::io::Result<()> {
        writeln!(out, "MONTHLY (for chart):")?;
        for group in &report.timing.monthly.groups {
            writeln!(out, "  {}: {}", group.key, thousands(group.mean))?;
        }

        let geo = &report.geography;
        writeln!(out, "\nTOP ZIPCODES (for chart):")?;
        for group in &geo.ranked.groups {
            writeln!(out, "  {}: {}", group.key, thousands(group.mean))?;
        }

        writeln!(out, "\nGRADES (for chart):")?;
        for group in &report.quality.grades.groups {
            writeln!(out, "  {}: {}", group.key, thousands(group.mean))?;
        }
        writeln!(
            out,
            "Grade-Price correlation: {}",
            fixed(report.quality.correlation, 3)
        )?;

        writeln!(out, "\nZIPCODES WITH >= {} SALES:", geo.min_sales)?;
        for group in &geo.ranked.groups {
            writeln!(
                out,
                "  {}: mean {} count {}",
                group.key,
                currency(group.mean),
                group.count
            )?;
        }
        writeln!(out, "Top: {}", currency(geo.top_price))?;
        writeln!(out, "Bottom: {}", currency(geo.bottom_price))?;
        writeln!(out, "Difference: {}", percent(geo.location_pct))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::report::fixtures::sample_table;

    fn render(format: ReportFormat) -> String {
        let config = AnalysisConfig {
            min_zip_sales: 2,
            ..Default::default()
        };
        let report = MarketReport::build(&sample_table(), &config).unwrap();
        let mut buf = Vec::new();
        ConsoleReporter::write(&mut buf, &report, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_report_sections() {
        let text = render(ReportFormat::Text);
        assert!(text.contains("1. MIDDLE-CLASS DEFINITION"));
        assert!(text.contains("Q25: $168"));
        assert!(text.contains("Q75: $600"));
        assert!(text.contains("Middle-Class houses: 6 (50.0%)"));
        assert!(text.contains("Best month: 12 ($425)"));
        assert!(text.contains("Worst month: 1 ($250)"));
        assert!(text.contains("Difference: $175 (70.0%)"));
        assert!(text.contains("  1. 98002: $350 (n=3)"));
        assert!(text.contains("Location difference: 55.6%"));
        assert!(text.contains("Grade 7->8 difference: $125"));
        assert!(text.contains("Top Zipcode: 98002 ($350)"));
    }

    #[test]
    fn test_text_months_sorted_by_mean() {
        let text = render(ReportFormat::Text);
        let dec = text.find("  12: $425").unwrap();
        let jun = text.find("   6: $400").unwrap();
        assert!(dec < jun);
    }

    #[test]
    fn test_chart_data_in_thousands() {
        let text = render(ReportFormat::ChartData);
        assert!(text.starts_with("MONTHLY (for chart):\n  1: 0\n"));
        assert!(text.contains("TOP ZIPCODES (for chart):\n  98002: 0\n  98001: 0\n"));
        assert!(text.contains("ZIPCODES WITH >= 2 SALES:"));
    }

    #[test]
    fn test_json_is_parseable() {
        let json = render(ReportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["middle_class"]["houses"], 6);
        assert_eq!(value["geography"]["top"][0]["key"], 98002);
    }

    #[test]
    fn test_output_is_deterministic() {
        for format in [ReportFormat::Text, ReportFormat::ChartData, ReportFormat::Json] {
            assert_eq!(render(format), render(format));
        }
    }
}
