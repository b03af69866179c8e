//! Difference report segmentation
//!
//! A spreadsheet sheet holds a bounded number of rows, so the differences of a
//! pair are cut into consecutive segments, each small enough to fit one sheet
//! below its header row.

use sheetcmp_core::{CellValue, Column, DataType, Table};

use crate::differ::CellDiff;

/// Column headers of a report segment
pub const REPORT_COLUMNS: [&str; 6] = [
    "Sheet Name",
    "Row Index",
    "Column Name",
    "Column type",
    "Value V1",
    "Value V2",
];

/// A cell difference tagged with the sheet it was found in
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRecord {
    pub sheet_name: String,
    pub diff: CellDiff,
}

impl DiffRecord {
    /// Tag a cell difference with its sheet
    pub fn new(sheet_name: impl Into<String>, diff: CellDiff) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            diff,
        }
    }

    /// Render as one report row, in [`REPORT_COLUMNS`] order
    ///
    /// Values are rendered as text so cells of any type fit one column.
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::string(&self.sheet_name),
            CellValue::Integer(self.diff.row_index as i64),
            CellValue::string(&self.diff.column_name),
            CellValue::string(self.diff.column_type.as_str()),
            render(&self.diff.value_v1),
            render(&self.diff.value_v2),
        ]
    }
}

fn render(value: &CellValue) -> CellValue {
    match value {
        CellValue::Null => CellValue::Null,
        CellValue::String(_) => value.clone(),
        other => CellValue::string(other.to_string()),
    }
}

/// One bounded slice of a difference list
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSegment<T = DiffRecord> {
    index: usize,
    records: Vec<T>,
}

impl<T> ReportSegment<T> {
    /// Zero-based position of the segment
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sheet title of the segment in the difference report
    pub fn title(&self) -> String {
        format!("Diff_{}", self.index + 1)
    }

    /// The records in this segment
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the segment has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records out
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl ReportSegment<DiffRecord> {
    /// Build the report table of this segment
    pub fn to_table(&self) -> sheetcmp_core::Result<Table> {
        let dtypes = [
            DataType::String,
            DataType::Int64,
            DataType::String,
            DataType::String,
            DataType::String,
            DataType::String,
        ];
        let mut columns: Vec<Column> = REPORT_COLUMNS
            .iter()
            .zip(dtypes)
            .map(|(name, dtype)| Column::new(*name, dtype))
            .collect();

        let rows: Vec<Vec<CellValue>> = self.records.iter().map(DiffRecord::to_row).collect();

        // A value column holding only nulls is typed as such.
        for (idx, column) in columns.iter_mut().enumerate().skip(4) {
            if rows.iter().all(|row| row[idx].is_null()) {
                column.dtype = DataType::Null;
            }
        }

        Table::new(columns, rows)
    }
}

/// Cuts a difference list into report segments
pub struct DiffReportBuilder;

impl DiffReportBuilder {
    /// Split `records` into segments of at most `max_rows_per_segment` records
    ///
    /// Order is kept, every segment but the last is full, and an empty list gives
    /// no segments. A limit of 0 is treated as 1.
    pub fn build<T>(records: Vec<T>, max_rows_per_segment: usize) -> Vec<ReportSegment<T>> {
        let size = max_rows_per_segment.max(1);
        let mut segments = Vec::with_capacity(records.len().div_ceil(size));
        let mut iter = records.into_iter().peekable();

        while iter.peek().is_some() {
            let records: Vec<T> = iter.by_ref().take(size).collect();
            segments.push(ReportSegment {
                index: segments.len(),
                records,
            });
        }

        segments
    }
}
