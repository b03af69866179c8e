//! Tests for how the populated range of a sheet maps to a table.

use crate::{num, row, text, Fixture};
use pretty_assertions::assert_eq;
use sheetcmp_core::{CellValue, Shape};
use sheetcmp_xlsx::XlsxReader;

#[test]
fn test_header_is_first_populated_row() {
    let rows = [
        row(1, &[r#"<c r="A1" s="0"/>"#.to_string()]),
        row(3, &[text("A3", "Id"), text("B3", "Name")]),
        row(4, &[num("A4", "1", None), text("B4", "one")]),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("offset.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Id", "Name"]);
    assert_eq!(table.shape(), Shape::new(1, 2));
}

#[test]
fn test_columns_start_at_a() {
    let rows = [
        row(1, &[text("C1", "Third")]),
        row(2, &[num("C2", "3", None)]),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("offset.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["__UNNAMED__0", "__UNNAMED__1", "Third"]
    );
    assert_eq!(
        table.row(0).unwrap(),
        &[CellValue::Null, CellValue::Null, CellValue::Integer(3)][..]
    );
}

#[test]
fn test_gap_rows_kept_and_trailing_rows_dropped() {
    let rows = [
        row(1, &[text("A1", "Value")]),
        row(2, &[num("A2", "1", None)]),
        row(5, &[num("A5", "2", None)]),
        row(6, &[r#"<c r="A6" s="0"/>"#.to_string()]),
        r#"<row r="7"/>"#.to_string(),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("gaps.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    let values: Vec<_> = table.rows().map(|r| r[0].clone()).collect();
    assert_eq!(
        values,
        vec![
            CellValue::Integer(1),
            CellValue::Null,
            CellValue::Null,
            CellValue::Integer(2),
        ]
    );
}

#[test]
fn test_header_only_sheet() {
    let rows = row(1, &[text("A1", "Id"), text("B1", "Name")]);
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("header.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert!(table.is_empty());
    assert_eq!(table.shape(), Shape::new(0, 2));
}

#[test]
fn test_cells_without_reference() {
    let rows = [
        r#"<row><c t="inlineStr"><is><t>A</t></is></c><c t="inlineStr"><is><t>B</t></is></c></row>"#,
        r#"<row><c><v>1</v></c><c><v>2</v></c></row>"#,
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("norefs.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(table.cell(0, 1), Some(&CellValue::Integer(2)));
}
