//! Table type

use std::collections::HashSet;
use std::fmt;

use crate::cell::CellValue;
use crate::column::{Column, DataType};
use crate::error::{Error, Result};

/// Row and column count of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    /// Number of data rows (header excluded)
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
}

impl Shape {
    /// Create a new shape
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}

/// A typed, rectangular sheet
///
/// Every row holds exactly one value per column and every non-null value belongs
/// to its column's [`DataType`]. Both rules are checked by [`Table::new`], so any
/// `Table` in hand satisfies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table, validating row lengths, value types and column names
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::RaggedRow {
                    row: row_idx,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }

            for (value, column) in row.iter().zip(&columns) {
                if !value.is_null() && value.dtype() != column.dtype {
                    return Err(Error::ValueTypeMismatch {
                        row: row_idx,
                        column: column.name.clone(),
                        expected: column.dtype,
                        actual: value.dtype(),
                    });
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Create a table with headers but no data rows
    pub fn empty(columns: Vec<Column>) -> Result<Self> {
        Self::new(columns, Vec::new())
    }

    /// Get the columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get the column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Get the column data types in order
    pub fn dtypes(&self) -> Vec<DataType> {
        self.columns.iter().map(|c| c.dtype).collect()
    }

    /// Get the position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row and column count
    pub fn shape(&self) -> Shape {
        Shape::new(self.row_count(), self.column_count())
    }

    /// Check if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Get a single cell
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Split the table into its columns and rows
    pub fn into_parts(self) -> (Vec<Column>, Vec<Vec<CellValue>>) {
        (self.columns, self.rows)
    }
}
