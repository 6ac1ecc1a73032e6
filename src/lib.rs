//! Housing Insights - housing sales segment analysis & static charts
//!
//! Loads a sales CSV, keeps the middle-class price segment (Q25-Q75),
//! groups it by month, zipcode and grade, and reports the results as
//! console text and PNG charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;

pub use config::{AnalysisConfig, ConfigError, GradeStep};
pub use data::{DataLoader, GroupKey, HousingTable, LoaderError, TableError};
pub use report::{ConsoleReporter, MarketReport, ReportError, ReportFormat};
