//! Stats module - segmentation, grouping and descriptive statistics

mod aggregate;
mod calculator;
mod segment;

pub use aggregate::{Aggregate, Aggregator, GroupStats, SortOrder};
pub use calculator::{BoxSummary, DescriptiveStats, HistogramBin, StatsCalculator};
pub use segment::{QuantileBounds, Segment, Segmenter};
