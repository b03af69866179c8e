//! Column type inference for reader output
//!
//! Readers hand over a header row and raw data rows whose lengths may vary (sparse
//! XLSX rows, short CSV records). [`TableBuilder`] squares them off with nulls,
//! names blank or repeated headers, picks one [`DataType`] per column and casts
//! every value into it.

use std::collections::HashSet;

use crate::cell::CellValue;
use crate::column::{Column, DataType};
use crate::error::Result;
use crate::table::Table;

/// Prefix for columns whose header cell is blank
pub const UNNAMED_PREFIX: &str = "__UNNAMED__";

/// Builds a [`Table`] from untyped reader rows
#[derive(Debug, Default)]
pub struct TableBuilder {
    header: Vec<CellValue>,
    rows: Vec<Vec<CellValue>>,
}

impl TableBuilder {
    /// Create a builder without a header row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given header names
    pub fn with_header<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            header: names.into_iter().map(CellValue::string).collect(),
            rows: Vec::new(),
        }
    }

    /// Set the header row from raw cell values
    pub fn set_header(&mut self, header: Vec<CellValue>) {
        self.header = header;
    }

    /// Append a raw data row
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of data rows pushed so far
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Infer column types and build the table
    pub fn finish(self) -> Result<Table> {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);

        let names = header_names(&self.header, width);

        let mut dtypes = vec![DataType::Null; width];
        for row in &self.rows {
            for (dtype, value) in dtypes.iter_mut().zip(row) {
                *dtype = dtype.supertype(value.dtype());
            }
        }

        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row.into_iter()
                    .zip(&dtypes)
                    .map(|(value, dtype)| value.cast(*dtype))
                    .collect()
            })
            .collect();

        let columns = names
            .into_iter()
            .zip(dtypes)
            .map(|(name, dtype)| Column::new(name, dtype))
            .collect();

        Table::new(columns, rows)
    }
}

fn header_names(header: &[CellValue], width: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(width);
    (0..width)
        .map(|idx| {
            let base = header
                .get(idx)
                .map(|v| v.to_string().trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("{}{}", UNNAMED_PREFIX, idx));

            let mut name = base.clone();
            let mut n = 0;
            while !seen.insert(name.clone()) {
                name = format!("{}_duplicated_{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}
