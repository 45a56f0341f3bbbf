//! Reading billing inputs and writing statement records.

pub mod csv_loader;
pub mod json_writer;

use crate::core::{BillingInputs, BillingResult};
use crate::errors::Result;

pub use csv_loader::{read_business, read_file, read_rows, CsvInputs, CsvRow};
pub use json_writer::JsonStatements;

/// Where the inputs of a billing run come from.
pub trait InputSource {
    fn load(&self) -> Result<BillingInputs>;
}

/// Where the records of a finished run are kept.
pub trait StatementSink {
    /// Stores every cycle of `result`, returning one label per stored cycle.
    fn store(&self, result: &BillingResult) -> Result<Vec<String>>;
}
