//! # sheetcmp-csv
//!
//! CSV reader and writer for sheetcmp. A CSV file holds exactly one table; its
//! first record is the header unless [`CsvReadOptions::has_header`] is off.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;

/// Sheet name given to the single table of a CSV file
pub const CSV_SHEET_NAME: &str = "Sheet1";
