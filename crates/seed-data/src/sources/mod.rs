//! External data resources.
//!
//! - [`CsvTable`]: CSV files whose columns are bound by header name

mod csv_files;

pub use csv_files::{CsvRow, CsvTable};
