//! Tests for date cells: styled serials, the 1904 system and ISO dates.

use crate::{num, row, text, Fixture};
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sheetcmp_core::{CellValue, DataType};
use sheetcmp_xlsx::{XlsxReader, XlsxWorkbook};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> CellValue {
    let dt: NaiveDateTime = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap();
    CellValue::DateTime(dt)
}

#[test]
fn test_builtin_and_custom_date_formats() {
    // xf 1: built-in 14 (m/d/yyyy), xf 2: custom date, xf 3: custom number
    let rows = [
        row(1, &[text("A1", "Builtin"), text("B1", "Custom"), text("C1", "Plain")]),
        row(
            2,
            &[
                num("A2", "45292", Some(1)),
                num("B2", "45292.75", Some(2)),
                num("C2", "45292", Some(3)),
            ],
        ),
    ]
    .concat();
    let (_dir, path) = Fixture::new()
        .cell_formats(&[0, 14, 164, 165])
        .custom_format(164, "dd/mm/yyyy hh:mm")
        .custom_format(165, "#,##0.00")
        .sheet("Sheet1", &rows)
        .save("dates.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(
        table.dtypes(),
        vec![DataType::Datetime, DataType::Datetime, DataType::Int64]
    );
    assert_eq!(table.cell(0, 0), Some(&at(2024, 1, 1, 0, 0)));
    assert_eq!(table.cell(0, 1), Some(&at(2024, 1, 1, 18, 0)));
    assert_eq!(table.cell(0, 2), Some(&CellValue::Integer(45292)));
}

#[test]
fn test_1904_date_system() {
    let rows = [
        row(1, &[text("A1", "When")]),
        row(2, &[num("A2", "43830", Some(1))]),
    ]
    .concat();
    let (_dir, path) = Fixture::new()
        .cell_formats(&[0, 14])
        .date1904()
        .sheet("Sheet1", &rows)
        .save("mac.xlsx");

    let mut workbook = XlsxWorkbook::open(&path).unwrap();
    assert!(workbook.is_date1904());
    let table = workbook.read_sheet("Sheet1").unwrap();
    assert_eq!(table.cell(0, 0), Some(&at(2024, 1, 1, 0, 0)));
}

#[test]
fn test_iso_date_cells() {
    let rows = [
        row(1, &[text("A1", "When")]),
        row(2, &[r#"<c r="A2" t="d"><v>2023-06-30T14:15:00</v></c>"#.to_string()]),
        row(3, &[r#"<c r="A3" t="d"><v>2023-07-01</v></c>"#.to_string()]),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("iso.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(table.dtypes(), vec![DataType::Datetime]);
    assert_eq!(table.cell(0, 0), Some(&at(2023, 6, 30, 14, 15)));
    assert_eq!(table.cell(1, 0), Some(&at(2023, 7, 1, 0, 0)));
}
