//! Statistics Calculator Module
//! Descriptive statistics, quantiles, correlation and chart summaries.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Descriptive statistics for one set of values.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Five-number summary plus fliers, drawn as a boxplot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub whisker_low: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

pub struct StatsCalculator;

impl StatsCalculator {
    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let sorted = Self::sorted(values);
        let std = if n > 1 { values.std_dev() } else { 0.0 };

        DescriptiveStats {
            count: n,
            mean: values.mean(),
            median: Self::quantile(&sorted, 0.5),
            std,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }

    /// Quantile `q` in `[0, 1]` using linear interpolation between order
    /// statistics (NumPy / pandas default). `sorted_values` must be ascending.
    pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation of two equally long samples.
    ///
    /// NaN when fewer than two pairs exist or either side is constant.
    pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }

        let std_x = x.std_dev();
        let std_y = y.std_dev();
        if std_x == 0.0 || std_y == 0.0 {
            return f64::NAN;
        }

        let r = x.covariance(y) / (std_x * std_y);
        if r.is_nan() {
            r
        } else {
            r.clamp(-1.0, 1.0)
        }
    }

    /// Relative change from `from` to `to` in percent.
    pub fn pct_change(from: f64, to: f64) -> f64 {
        if from == 0.0 || !from.is_finite() || !to.is_finite() {
            return f64::NAN;
        }
        (to - from) / from * 100.0
    }

    /// Boxplot summary with Tukey whiskers.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::quantile(&sorted, 0.25);
        let median = Self::quantile(&sorted, 0.5);
        let q3 = Self::quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Equal-width histogram over the value range. The last bin is closed
    /// on both ends; a constant sample gets a unit-wide range around it.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let (mut min, mut max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                end: if i + 1 == bins { max } else { min + (i + 1) as f64 * width },
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [100.0, 200.0, 300.0, 400.0];
        assert_eq!(StatsCalculator::quantile(&sorted, 0.25), 175.0);
        assert_eq!(StatsCalculator::quantile(&sorted, 0.75), 325.0);
        assert_eq!(StatsCalculator::quantile(&sorted, 0.0), 100.0);
        assert_eq!(StatsCalculator::quantile(&sorted, 1.0), 400.0);
    }

    #[test]
    fn test_quantile_edge_sizes() {
        assert!(StatsCalculator::quantile(&[], 0.5).is_nan());
        assert_eq!(StatsCalculator::quantile(&[42.0], 0.25), 42.0);
    }

    #[test]
    fn test_median_even_and_odd() {
        let even = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        let odd = StatsCalculator::compute_descriptive_stats(&[5.0, 1.0, 3.0]);
        assert_eq!(even.median, 2.5);
        assert_eq!(odd.median, 3.0);
    }

    #[test]
    fn test_descriptive_stats() {
        let stats = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert!((stats.std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_descriptive_stats_empty() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 20.0, 30.0, 40.0];
        let inv = [40.0, 30.0, 20.0, 10.0];
        assert!((StatsCalculator::pearson_correlation(&x, &y) - 1.0).abs() < 1e-12);
        assert!((StatsCalculator::pearson_correlation(&x, &inv) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_within_bounds() {
        let x = [7.0, 8.0, 7.0, 9.0, 6.0, 8.0];
        let y = [300.0, 410.0, 350.0, 390.0, 280.0, 330.0];
        let r = StatsCalculator::pearson_correlation(&x, &y);
        assert!((-1.0..=1.0).contains(&r));
        assert!(r > 0.0);
    }

    #[test]
    fn test_pearson_undefined() {
        assert!(StatsCalculator::pearson_correlation(&[1.0], &[2.0]).is_nan());
        assert!(StatsCalculator::pearson_correlation(&[7.0, 7.0, 7.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(StatsCalculator::pct_change(200.0, 250.0), 25.0);
        assert_eq!(StatsCalculator::pct_change(200.0, 150.0), -25.0);
        assert!(StatsCalculator::pct_change(0.0, 150.0).is_nan());
        assert!(StatsCalculator::pct_change(f64::NAN, 150.0).is_nan());
    }

    #[test]
    fn test_box_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.whisker_high, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn test_histogram_counts_everything() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = StatsCalculator::histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[9].end, 100.0);
        // max lands in the closed last bin
        assert_eq!(bins[9].count, 11);
    }

    #[test]
    fn test_histogram_constant_sample() {
        let bins = StatsCalculator::histogram(&[3.0, 3.0, 3.0], 4);
        assert_eq!(bins.first().unwrap().start, 2.5);
        assert_eq!(bins.last().unwrap().end, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }
}
