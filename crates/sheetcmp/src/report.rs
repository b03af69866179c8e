//! Report files written next to each compared pair

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sheetcmp_core::{DataType, Workbook};
use sheetcmp_csv::{CsvWriteOptions, CsvWriter};
use sheetcmp_engine::{PairSummary, ReportSegment, SheetOutcome};
use sheetcmp_xlsx::XlsxWriter;

use crate::config::ReportFormat;
use crate::error::{Error, Result};

/// Name of the text summary
pub const REPORT_TXT: &str = "report.txt";

/// Name of the XLSX difference workbook
pub const DIFFERENCES_XLSX: &str = "differences.xlsx";

const RULE_WIDTH: usize = 40;

/// Render the text summary of a pair
pub fn render_report(summary: &PairSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Comparison Report for: {} ---", summary.file_name);
    out.push('\n');

    let outcome = &summary.outcome;
    if outcome.sheets.is_empty() {
        // Decided before any sheet was read
        let _ = writeln!(out, "Status: {}", outcome.status);
        let _ = writeln!(out, "Stage: {}", outcome.stage);
        let _ = writeln!(out, "Match Rate: {}", format_rate(summary.match_rate));
        write_details(&mut out, &outcome.detail.to_string());
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
        return out;
    }

    for sheet in &outcome.sheets {
        write_sheet(&mut out, sheet);
    }
    out
}

fn write_sheet(out: &mut String, sheet: &SheetOutcome) {
    let _ = writeln!(out, "Sheet: {}", sheet.name);
    let _ = writeln!(
        out,
        "Shape V1: {} | Shape V2: {}",
        sheet.shape_v1, sheet.shape_v2
    );
    let _ = writeln!(out, "Dtypes V1: {}", format_dtypes(&sheet.dtypes_v1));
    let _ = writeln!(out, "Dtypes V2: {}", format_dtypes(&sheet.dtypes_v2));
    let _ = writeln!(out, "Status: {}", sheet.status);
    let _ = writeln!(out, "Stage: {}", sheet.stage);
    let _ = writeln!(out, "Match Rate: {}", format_rate(sheet.match_rate()));
    write_details(out, &sheet.detail.to_string());
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
}

fn write_details(out: &mut String, details: &str) {
    if !details.is_empty() {
        let _ = writeln!(out, "Details: {}", details);
    }
}

/// Format a match rate as a percentage with two decimals
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "N/A".to_string(),
    }
}

fn format_dtypes(dtypes: &[DataType]) -> String {
    let names: Vec<&str> = dtypes.iter().map(DataType::as_str).collect();
    format!("[{}]", names.join(", "))
}

/// Write `report.txt` into `dir`
pub fn write_report_txt(dir: &Path, summary: &PairSummary) -> Result<PathBuf> {
    let path = dir.join(REPORT_TXT);
    std::fs::write(&path, render_report(summary)).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

/// Write the difference segments into `dir`
///
/// Nothing is written when there are no segments.
pub fn write_differences(
    dir: &Path,
    segments: &[ReportSegment],
    format: ReportFormat,
) -> Result<Vec<PathBuf>> {
    if segments.is_empty() {
        return Ok(Vec::new());
    }

    match format {
        ReportFormat::Xlsx => {
            let mut workbook = Workbook::new();
            for segment in segments {
                workbook.add_sheet(segment.title(), segment.to_table()?)?;
            }
            let path = dir.join(DIFFERENCES_XLSX);
            XlsxWriter::write_file(&workbook, &path)?;
            Ok(vec![path])
        }
        ReportFormat::Csv => {
            let options = CsvWriteOptions::default();
            segments
                .iter()
                .map(|segment| -> Result<PathBuf> {
                    let path = dir.join(format!("differences_{}.csv", segment.index() + 1));
                    CsvWriter::write_file(&segment.to_table()?, &path, &options)?;
                    Ok(path)
                })
                .collect()
        }
    }
}

/// Write every report file for a pair, returning the paths written
pub fn write_pair_reports(
    dir: &Path,
    summary: &PairSummary,
    format: ReportFormat,
) -> Result<Vec<PathBuf>> {
    let mut written = vec![write_report_txt(dir, summary)?];
    written.extend(write_differences(dir, &summary.segments, format)?);
    tracing::debug!(dir = %dir.display(), files = written.len(), "reports written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetcmp_core::{CellValue, TableBuilder};
    use sheetcmp_engine::{CompareConfig, ComparisonSession, MemorySource};

    fn workbook(rows: &[[i64; 2]]) -> Workbook {
        let mut builder = TableBuilder::with_header(["Id", "Amount"]);
        for row in rows {
            builder.push_row(row.iter().map(|v| CellValue::from(*v)).collect());
        }
        let mut wb = Workbook::new();
        wb.add_sheet("Sales", builder.finish().unwrap()).unwrap();
        wb
    }

    fn summarize(name2: &str, v1: &[[i64; 2]], v2: &[[i64; 2]]) -> PairSummary {
        let session = ComparisonSession::new(CompareConfig::default().with_mismatch_abort_ratio(1.0))
            .unwrap();
        let mut a = MemorySource::new("book.xlsx", workbook(v1));
        let mut b = MemorySource::new(name2, workbook(v2));
        session.run(&mut a, &mut b).unwrap()
    }

    #[test]
    fn test_render_sheet_blocks() {
        let summary = summarize("book.xlsx", &[[1, 10], [2, 20]], &[[1, 10], [2, 21]]);
        assert_eq!(
            render_report(&summary),
            "--- Comparison Report for: book.xlsx ---\n\
             \n\
             Sheet: Sales\n\
             Shape V1: (2, 2) | Shape V2: (2, 2)\n\
             Dtypes V1: [Int64, Int64]\n\
             Dtypes V2: [Int64, Int64]\n\
             Status: Data Mismatch\n\
             Stage: row-data\n\
             Match Rate: 75.00%\n\
             Details: 1 rows differ (1 cells)\n\
             ----------------------------------------\n"
        );
    }

    #[test]
    fn test_render_pair_level_block() {
        let summary = summarize("other.xlsx", &[[1, 10]], &[[1, 10]]);
        assert_eq!(
            render_report(&summary),
            "--- Comparison Report for: book.xlsx ---\n\
             \n\
             Status: Name Mismatch\n\
             Stage: name\n\
             Match Rate: N/A\n\
             Details: V1: book.xlsx != V2: other.xlsx\n\
             ----------------------------------------\n"
        );
    }

    #[test]
    fn test_no_difference_files_without_segments() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summarize("book.xlsx", &[[1, 10]], &[[1, 10]]);

        let written = write_pair_reports(dir.path(), &summary, ReportFormat::Xlsx).unwrap();
        assert_eq!(written, vec![dir.path().join(REPORT_TXT)]);
        assert!(!dir.path().join(DIFFERENCES_XLSX).exists());
    }

    #[test]
    fn test_csv_segments() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summarize("book.xlsx", &[[1, 10], [2, 20]], &[[9, 10], [8, 20]]);
        assert_eq!(summary.segments.len(), 1);

        let written = write_differences(dir.path(), &summary.segments, ReportFormat::Csv).unwrap();
        assert_eq!(written, vec![dir.path().join("differences_1.csv")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(
            text,
            "Sheet Name,Row Index,Column Name,Column type,Value V1,Value V2\n\
             Sales,0,Id,Int64,1,9\n\
             Sales,1,Id,Int64,2,8\n"
        );
    }
}
