//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use sheetcmp_core::{CellValue, StringPool, Table, TableBuilder};

use crate::error::CsvResult;
use crate::options::CsvReadOptions;

/// Timestamp layouts tried in order, after plain dates
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a table
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Table> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a table
    ///
    /// Records shorter than the widest one are padded with nulls.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut builder = TableBuilder::new();
        let mut pool = StringPool::new();

        if options.has_header {
            let header = csv_reader
                .headers()?
                .iter()
                .map(|name| CellValue::String(pool.intern(name)))
                .collect();
            builder.set_header(header);
        }

        for result in csv_reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    if options.auto_detect_types {
                        detect_type(field, &mut pool)
                    } else if field.is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::String(pool.intern(field))
                    }
                })
                .collect();
            builder.push_row(row);
        }

        Ok(builder.finish()?)
    }
}

/// Detect the type of a field value
///
/// Detection looks at the trimmed field; text keeps its original spacing.
fn detect_type(field: &str, pool: &mut StringPool) -> CellValue {
    let trimmed = field.trim();

    if trimmed.is_empty() {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return CellValue::Integer(n);
    }

    // `f64` parsing also accepts words like "inf" and "NaN", which stay text here
    if trimmed.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Float(n);
        }
    }

    if let Some(dt) = parse_datetime(trimmed) {
        return CellValue::DateTime(dt);
    }

    CellValue::String(pool.intern(field))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    // Cheap pre-check: every accepted layout starts with YYYY-
    if s.len() < 10 || s.as_bytes().get(4) != Some(&b'-') {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
