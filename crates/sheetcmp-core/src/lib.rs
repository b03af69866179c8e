//! # sheetcmp-core
//!
//! Core data structures for the sheetcmp comparison tool.
//!
//! This crate provides the fundamental types used throughout sheetcmp:
//! - [`CellValue`] - A typed cell value (integer, float, string, boolean, null, date/time)
//! - [`Column`] and [`DataType`] - Named, typed columns
//! - [`Table`] - A rectangular sheet: ordered columns plus fixed-length rows
//! - [`Workbook`] - An ordered set of named tables
//! - [`TableBuilder`] - Builds a [`Table`] from raw reader output, inferring column types
//!
//! ## Example
//!
//! ```rust
//! use sheetcmp_core::{CellValue, DataType, TableBuilder};
//!
//! let mut builder = TableBuilder::with_header(["Id", "Amount"]);
//! builder.push_row(vec![CellValue::from(1), CellValue::from(9.5)]);
//! builder.push_row(vec![CellValue::from(2), CellValue::from(3)]);
//!
//! let table = builder.finish().unwrap();
//! assert_eq!(table.shape().to_string(), "(2, 2)");
//! assert_eq!(table.dtypes(), vec![DataType::Int64, DataType::Float64]);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod infer;
pub mod table;
pub mod workbook;

// Re-exports for convenience
pub use cell::{CellAddress, CellValue, SharedString, StringPool};
pub use column::{Column, DataType};
pub use error::{Error, Result};
pub use infer::TableBuilder;
pub use table::{Shape, Table};
pub use workbook::Workbook;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
