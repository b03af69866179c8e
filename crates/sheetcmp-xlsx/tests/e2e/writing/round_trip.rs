use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sheetcmp_core::{CellValue, Column, DataType, Table, TableBuilder, Workbook};
use sheetcmp_xlsx::{XlsxError, XlsxReader, XlsxWorkbook, XlsxWriter};

fn report_like() -> Table {
    Table::new(
        vec![
            Column::new("Sheet Name", DataType::String),
            Column::new("Row Index", DataType::Int64),
            Column::new("Value V1", DataType::String),
            Column::new("Value V2", DataType::String),
        ],
        vec![
            vec![
                CellValue::from("Sales"),
                CellValue::from(0),
                CellValue::from("10"),
                CellValue::from("11"),
            ],
            vec![
                CellValue::from("Sales"),
                CellValue::from(7),
                CellValue::Null,
                CellValue::from("x_y <z>"),
            ],
        ],
    )
    .unwrap()
}

#[test]
fn test_multi_sheet_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("differences.xlsx");

    let mut wb = Workbook::new();
    wb.add_sheet("Diff_1", report_like()).unwrap();
    wb.add_sheet("Diff_2", report_like()).unwrap();
    XlsxWriter::write_file(&wb, &path).unwrap();

    let back = XlsxReader::read_file(&path).unwrap();
    assert_eq!(back.sheet_names(), vec!["Diff_1", "Diff_2"]);
    assert_eq!(back.sheet("Diff_2").unwrap(), &report_like());
}

#[test]
fn test_timestamps_round_trip() {
    let when = NaiveDate::from_ymd_opt(1999, 12, 31)
        .unwrap()
        .and_hms_milli_opt(23, 59, 58, 250)
        .unwrap();
    let mut builder = TableBuilder::with_header(["When"]);
    builder.push_row(vec![CellValue::from(when)]);
    let mut wb = Workbook::new();
    wb.add_sheet("Times", builder.finish().unwrap()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("times.xlsx");
    XlsxWriter::write_file(&wb, &path).unwrap();

    let mut back = XlsxWorkbook::open(&path).unwrap();
    let table = back.read_sheet("Times").unwrap();
    assert_eq!(table.dtypes(), vec![DataType::Datetime]);
    assert_eq!(table.cell(0, 0), Some(&CellValue::from(when)));
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut wb = Workbook::new();
    wb.add_sheet("Diff_1", report_like()).unwrap();

    let err = XlsxWriter::write_file(&wb, dir.path().join("no/such/dir.xlsx")).unwrap_err();
    assert!(matches!(err, XlsxError::Io(_)));
}
