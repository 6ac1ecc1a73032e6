//! Report module - market figures and console output

mod analysis;
mod console;
pub mod format;

pub use analysis::{
    ExpectedProfit, GradeDelta, Geography, MarketReport, MiddleClass, Quality, Timing,
};
pub use console::{ConsoleReporter, ReportError, ReportFormat};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::{DataLoader, HousingTable};
    use polars::prelude::*;

    /// Twelve sales; the middle half (prices 200-500) drives every figure.
    pub(crate) fn sample_table() -> HousingTable {
        let df = df!(
            "price" => [50.0f64, 60.0, 70.0, 200.0, 300.0, 400.0, 500.0, 250.0, 350.0, 900.0, 950.0, 990.0],
            "date" => [
                "2014-01-05", "2014-02-05", "2014-03-05", "2014-05-01", "2014-05-20", "2014-06-11",
                "2014-12-02", "2015-01-15", "2014-12-24", "2014-07-07", "2014-08-08", "2014-09-09",
            ],
            "zipcode" => [98001i64, 98001, 98001, 98001, 98002, 98002, 98003, 98001, 98002, 98003, 98003, 98003],
            "grade" => [5i64, 5, 6, 7, 8, 8, 9, 7, 8, 11, 12, 12]
        )
        .unwrap();
        DataLoader::new().prepare(df).unwrap()
    }
}
