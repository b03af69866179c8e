//! Tests for workbook-level reading: sheet order, lookups and failures.

use crate::{num, row, text, Fixture};
use sheetcmp_xlsx::{XlsxError, XlsxReader, XlsxWorkbook};

fn single(name: &str) -> String {
    [row(1, &[text("A1", name)]), row(2, &[num("A2", "1", None)])].concat()
}

#[test]
fn test_sheet_order_follows_workbook() {
    let (_dir, path) = Fixture::new()
        .sheet("Zeta", &single("z"))
        .sheet("Alpha", &single("a"))
        .sheet("R&D", &single("r"))
        .save("order.xlsx");

    let workbook = XlsxWorkbook::open(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Zeta", "Alpha", "R&D"]);
    assert_eq!(workbook.sheet_count(), 3);

    let all = workbook.read_all().unwrap();
    assert_eq!(all.sheet_names(), vec!["Zeta", "Alpha", "R&D"]);
    assert_eq!(
        all.sheet("R&D").unwrap().column_names().collect::<Vec<_>>(),
        vec!["r"]
    );
}

#[test]
fn test_missing_sheet() {
    let (_dir, path) = Fixture::new().sheet("Data", &single("x")).save("one.xlsx");

    let mut workbook = XlsxWorkbook::open(&path).unwrap();
    let err = workbook.read_sheet("Other").unwrap_err();
    assert!(matches!(err, XlsxError::SheetNotFound(name) if name == "Other"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = XlsxReader::read_file(dir.path().join("absent.xlsx")).unwrap_err();
    assert!(matches!(err, XlsxError::Io(_)));
    assert!(!err.is_malformed_table());
}

#[test]
fn test_not_an_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.xlsx");
    std::fs::write(&path, "Id,Name\n1,one\n").unwrap();

    let err = XlsxReader::read_file(&path).unwrap_err();
    assert!(matches!(err, XlsxError::Zip(_)));
}

#[test]
fn test_duplicate_headers_are_renamed() {
    let rows = [
        row(1, &[text("A1", "Id"), text("B1", "Id"), text("C1", "Id")]),
        row(2, &[num("A2", "1", None), num("B2", "2", None), num("C2", "3", None)]),
    ]
    .concat();
    let (_dir, path) = Fixture::new().sheet("Data", &rows).save("dupes.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    assert_eq!(
        workbook
            .sheet("Data")
            .unwrap()
            .column_names()
            .collect::<Vec<_>>(),
        vec!["Id", "Id_duplicated_0", "Id_duplicated_1"]
    );
}
