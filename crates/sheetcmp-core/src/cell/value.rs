//! Cell value types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::AHashMap;
use chrono::NaiveDateTime;

use crate::column::DataType;

/// Represents the typed value stored in a table cell
///
/// Equality is per kind: an `Integer(1)` never equals a `Float(1.0)`, and `Null`
/// only equals `Null`. Floats compare by value with every NaN equal to every other
/// NaN, so a table always compares equal to itself. [`Hash`] agrees with this
/// equality (`0.0` and `-0.0` hash the same, all NaNs hash the same).
#[derive(Debug, Clone, Default)]
pub enum CellValue {
    /// Missing value
    #[default]
    Null,

    /// Boolean value
    Boolean(bool),

    /// Whole number
    Integer(i64),

    /// Floating point number
    Float(f64),

    /// String value
    String(SharedString),

    /// Date and/or time
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        CellValue::String(SharedString::new(s))
    }

    /// Check if the cell is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The data type of this single value
    pub fn dtype(&self) -> DataType {
        match self {
            CellValue::Null => DataType::Null,
            CellValue::Boolean(_) => DataType::Boolean,
            CellValue::Integer(_) => DataType::Int64,
            CellValue::Float(_) => DataType::Float64,
            CellValue::String(_) => DataType::String,
            CellValue::DateTime(_) => DataType::Datetime,
        }
    }

    /// Try to get the value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a float (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            CellValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a date/time
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Convert this value into a column of type `dtype`
    ///
    /// Nulls stay null, integers widen to floats, and anything else that does not
    /// already belong to `dtype` is rendered as text.
    pub fn cast(self, dtype: DataType) -> CellValue {
        match (self, dtype) {
            (CellValue::Null, _) => CellValue::Null,
            (CellValue::Integer(n), DataType::Float64) => CellValue::Float(n as f64),
            (value, dtype) if value.dtype() == dtype => value,
            (value, _) => CellValue::string(value.to_string()),
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Boolean(_) => "boolean",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::String(_) => "string",
            CellValue::DateTime(_) => "datetime",
        }
    }
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn canonical_float_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => float_eq(*a, *b),
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Boolean(b) => b.hash(state),
            CellValue::Integer(n) => n.hash(state),
            CellValue::Float(n) => canonical_float_bits(*n).hash(state),
            CellValue::String(s) => s.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s.as_str()),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::string(s)
    }
}

impl From<SharedString> for CellValue {
    fn from(s: SharedString) -> Self {
        CellValue::String(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Interned string for memory efficiency
///
/// Strings are often repeated across cells (e.g., "Yes", "No", status codes).
/// Using Arc<str> allows sharing the same string data across multiple cells.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedString(Arc<str>);

impl SharedString {
    /// Create a new shared string
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    /// Get the string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the string
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> Self {
        SharedString::new(s)
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> Self {
        SharedString::new(s)
    }
}

/// String pool for deduplicating strings
///
/// When reading large sheets, many cells often contain the same string values.
/// The string pool ensures each unique string is stored only once in memory.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: AHashMap<Arc<str>, SharedString>,
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a shared string
    pub fn intern<S: AsRef<str>>(&mut self, s: S) -> SharedString {
        let s = s.as_ref();
        if let Some(shared) = self.strings.get(s) {
            shared.clone()
        } else {
            let arc: Arc<str> = Arc::from(s);
            let shared = SharedString(arc.clone());
            self.strings.insert(arc, shared.clone());
            shared
        }
    }

    /// Get the number of unique strings in the pool
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
