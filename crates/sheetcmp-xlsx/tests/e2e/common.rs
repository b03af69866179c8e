//! Common utilities for E2E tests.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Builder for an XLSX file made of hand-written parts
///
/// Sheets are given as the inner XML of `<sheetData>`.
#[derive(Default)]
pub struct Fixture {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    cell_formats: Vec<u32>,
    custom_formats: Vec<(u32, String)>,
    date1904: bool,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: &str) -> Self {
        self.sheets.push((name.to_string(), rows.to_string()));
        self
    }

    /// Add shared strings, given as the inner XML of each `<si>`
    pub fn shared_strings(mut self, items: &[&str]) -> Self {
        self.shared_strings = items.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Cell formats (cellXfs) by number format id
    pub fn cell_formats(mut self, num_fmt_ids: &[u32]) -> Self {
        self.cell_formats = num_fmt_ids.to_vec();
        self
    }

    pub fn custom_format(mut self, id: u32, code: &str) -> Self {
        self.custom_formats.push((id, code.to_string()));
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut part = |name: &str, body: String| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        part(
            "[Content_Types].xml",
            r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_string(),
        );

        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name.replace('&', "&amp;"),
                    i + 1,
                    i + 1
                )
            })
            .collect();
        let pr = if self.date1904 {
            r#"<workbookPr date1904="1"/>"#
        } else {
            ""
        };
        part(
            "xl/workbook.xml",
            format!(
                r#"<?xml version="1.0"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">{pr}<sheets>{sheets}</sheets></workbook>"#
            ),
        );

        let rels: String = (1..=self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
                )
            })
            .collect();
        part(
            "xl/_rels/workbook.xml.rels",
            format!(
                r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
            ),
        );

        if !self.shared_strings.is_empty() {
            let items: String = self
                .shared_strings
                .iter()
                .map(|si| format!("<si>{si}</si>"))
                .collect();
            part(
                "xl/sharedStrings.xml",
                format!(r#"<?xml version="1.0"?><sst xmlns="{MAIN_NS}">{items}</sst>"#),
            );
        }

        if !self.cell_formats.is_empty() {
            let num_fmts: String = self
                .custom_formats
                .iter()
                .map(|(id, code)| format!(r#"<numFmt numFmtId="{id}" formatCode="{code}"/>"#))
                .collect();
            let xfs: String = self
                .cell_formats
                .iter()
                .map(|id| format!(r#"<xf numFmtId="{id}"/>"#))
                .collect();
            part(
                "xl/styles.xml",
                format!(
                    r#"<?xml version="1.0"?><styleSheet xmlns="{MAIN_NS}"><numFmts>{num_fmts}</numFmts><cellXfs>{xfs}</cellXfs></styleSheet>"#
                ),
            );
        }

        for (i, (_, rows)) in self.sheets.iter().enumerate() {
            part(
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0"?><worksheet xmlns="{MAIN_NS}"><sheetData>{rows}</sheetData></worksheet>"#
                ),
            );
        }

        zip.finish().unwrap().into_inner()
    }

    /// Save to `name` inside a fresh temp directory
    pub fn save(&self, name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, self.to_bytes()).unwrap();
        (dir, path)
    }
}

/// An inline string cell
pub fn text(r: &str, s: &str) -> String {
    format!(r#"<c r="{r}" t="inlineStr"><is><t>{s}</t></is></c>"#)
}

/// A numeric cell, optionally with a cell format
pub fn num(r: &str, v: &str, style: Option<u32>) -> String {
    match style {
        Some(s) => format!(r#"<c r="{r}" s="{s}"><v>{v}</v></c>"#),
        None => format!(r#"<c r="{r}"><v>{v}</v></c>"#),
    }
}

pub fn row(n: u32, cells: &[String]) -> String {
    format!(r#"<row r="{n}">{}</row>"#, cells.concat())
}
