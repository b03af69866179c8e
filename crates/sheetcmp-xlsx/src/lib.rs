//! # sheetcmp-xlsx
//!
//! XLSX (Office Open XML) reader and writer for sheetcmp.
//!
//! [`XlsxWorkbook`] opens a file and lists its sheets without parsing any cell
//! data; each sheet is parsed into a [`Table`](sheetcmp_core::Table) only when
//! asked for. [`XlsxWriter`] writes a [`Workbook`](sheetcmp_core::Workbook) of
//! tables, one sheet per table with the column names as the first row.

pub mod error;
pub mod reader;
pub mod writer;

mod serial;
mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::{XlsxReader, XlsxWorkbook};
pub use writer::XlsxWriter;
