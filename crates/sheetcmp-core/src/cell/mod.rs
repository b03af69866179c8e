//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The typed value stored in a table cell
//! - [`CellAddress`] - A cell's location in a worksheet (e.g., "A1")

mod address;
mod value;

pub use address::CellAddress;
pub use value::{CellValue, SharedString, StringPool};
