//! Column types

use std::fmt;

/// Data type of a table column
///
/// Every non-null value in a column belongs to the column's type. `Null` is the
/// type of a column that holds no values at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Column without any non-null value
    Null,
    /// TRUE/FALSE values
    Boolean,
    /// Whole numbers
    Int64,
    /// Floating point numbers
    Float64,
    /// Text
    String,
    /// Dates and timestamps
    Datetime,
}

impl DataType {
    /// Get the display name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Null => "Null",
            DataType::Boolean => "Boolean",
            DataType::Int64 => "Int64",
            DataType::Float64 => "Float64",
            DataType::String => "String",
            DataType::Datetime => "Datetime",
        }
    }

    /// The narrowest type able to hold values of both `self` and `other`
    ///
    /// Nulls defer to the other side, integers and floats meet at `Float64`, and
    /// any other combination falls back to `String`.
    pub fn supertype(self, other: DataType) -> DataType {
        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) => t,
            (a, b) if a == b => a,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            _ => DataType::String,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header name
    pub name: String,
    /// Type shared by every value in the column
    pub dtype: DataType,
}

impl Column {
    /// Create a new column
    pub fn new<S: Into<String>>(name: S, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}
