//! Data module - CSV loading and processing

mod loader;
mod processor;
mod table;

pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError};
pub use table::{GroupKey, HousingTable, TableError};

/// Column names the analysis relies on.
pub mod columns {
    pub const PRICE: &str = "price";
    pub const DATE: &str = "date";
    pub const ZIPCODE: &str = "zipcode";
    pub const GRADE: &str = "grade";
    /// Derived from `date` at load time.
    pub const MONTH: &str = "month";

    pub const REQUIRED: [&str; 4] = [PRICE, DATE, ZIPCODE, GRADE];
}
