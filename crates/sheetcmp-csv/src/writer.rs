//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use sheetcmp_core::{CellValue, Table};

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        table: &Table,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a table to a writer
    ///
    /// Nulls become empty fields and values use their display form.
    pub fn write<W: Write>(table: &Table, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(table.column_names())?;
        }

        let mut record: Vec<String> = Vec::with_capacity(table.column_count());
        for row in table.rows() {
            record.clear();
            record.extend(row.iter().map(CellValue::to_string));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
