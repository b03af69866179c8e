//! End-to-end tests for sheetcmp-xlsx.
//!
//! Reading tests build each workbook as a zip archive of hand-written parts,
//! save it to a temp directory and read it back through the public API.
//! Writing tests write a workbook and read the file back.

mod common;
mod reading;
mod writing;

pub use common::*;
