//! Tests for reading cell values and inferring column types.

use crate::{num, row, text, Fixture};
use pretty_assertions::assert_eq;
use sheetcmp_core::{CellValue, DataType};
use sheetcmp_xlsx::XlsxReader;

#[test]
fn test_number_values() {
    let rows = [
        row(1, &[text("A1", "Whole"), text("B1", "Fraction")]),
        row(2, &[num("A2", "42", None), num("B2", "3.14159", None)]),
        row(3, &[num("A3", "-100", None), num("B3", "0", None)]),
        row(4, &[num("A4", "1E3", None), num("B4", "-0.5", None)]),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("numbers.xlsx");

    let workbook = XlsxReader::read_file(&path).expect("Failed to read workbook");
    let table = workbook.sheet("Sheet1").expect("No worksheet");

    assert_eq!(table.dtypes(), vec![DataType::Int64, DataType::Float64]);
    assert_eq!(table.cell(0, 0), Some(&CellValue::Integer(42)));
    assert_eq!(table.cell(1, 0), Some(&CellValue::Integer(-100)));
    assert_eq!(table.cell(2, 0), Some(&CellValue::Integer(1000)));
    assert_eq!(table.cell(0, 1), Some(&CellValue::Float(3.14159)));
    // Integral values in a fractional column are widened
    assert_eq!(table.cell(1, 1), Some(&CellValue::Float(0.0)));
}

#[test]
fn test_string_values() {
    let rows = [
        row(1, &[r#"<c r="A1" t="s"><v>0</v></c>"#.to_string()]),
        row(2, &[r#"<c r="A2" t="s"><v>1</v></c>"#.to_string()]),
        row(3, &[r#"<c r="A3" t="s"><v>2</v></c>"#.to_string()]),
        row(4, &[text("A4", "Tom &amp; Jerry")]),
        row(5, &[r#"<c r="A5" t="str"><f>A1</f><v>Label</v></c>"#.to_string()]),
        row(6, &[text("A6", "Line1_x000D_Line2")]),
    ]
    .concat();
    let (_dir, path) = Fixture::new()
        .shared_strings(&[
            "<t>Label</t>",
            r#"<t xml:space="preserve">  keep spaces  </t>"#,
            r#"<r><t>Rich </t></r><r><rPr><b/></rPr><t>text</t></r><rPh sb="0" eb="1"><t>ignored</t></rPh>"#,
        ])
        .sheet("Sheet1", &rows)
        .save("strings.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Label"]);
    assert_eq!(table.dtypes(), vec![DataType::String]);
    let values: Vec<_> = table
        .rows()
        .map(|r| r[0].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        values,
        vec![
            "  keep spaces  ",
            "Rich text",
            "Tom & Jerry",
            "Label",
            "Line1\rLine2",
        ]
    );
}

#[test]
fn test_boolean_and_error_values() {
    let rows = [
        row(1, &[text("A1", "Flag"), text("B1", "Result")]),
        row(
            2,
            &[
                r#"<c r="A2" t="b"><v>1</v></c>"#.to_string(),
                r#"<c r="B2" t="e"><v>#DIV/0!</v></c>"#.to_string(),
            ],
        ),
        row(
            3,
            &[
                r#"<c r="A3" t="b"><v>0</v></c>"#.to_string(),
                r#"<c r="B3" t="e"><v>#N/A</v></c>"#.to_string(),
            ],
        ),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("flags.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(table.dtypes(), vec![DataType::Boolean, DataType::String]);
    assert_eq!(table.cell(0, 0), Some(&CellValue::Boolean(true)));
    assert_eq!(table.cell(1, 0), Some(&CellValue::Boolean(false)));
    assert_eq!(table.cell(0, 1), Some(&CellValue::from("#DIV/0!")));
    assert_eq!(table.cell(1, 1), Some(&CellValue::from("#N/A")));
}

#[test]
fn test_mixed_column_falls_back_to_text() {
    let rows = [
        row(1, &[text("A1", "Code")]),
        row(2, &[num("A2", "7", None)]),
        row(3, &[text("A3", "X7")]),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Sheet1", &rows).save("mixed.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let table = workbook.sheet("Sheet1").unwrap();

    assert_eq!(table.dtypes(), vec![DataType::String]);
    assert_eq!(table.cell(0, 0), Some(&CellValue::from("7")));
    assert_eq!(table.cell(1, 0), Some(&CellValue::from("X7")));
}
