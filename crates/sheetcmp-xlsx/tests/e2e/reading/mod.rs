//! Reading tests - verify that sheets become the expected tables.

mod data_types;
mod dates;
mod dimensions;
mod workbook;
