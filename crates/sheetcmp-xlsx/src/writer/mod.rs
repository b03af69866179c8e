//! XLSX writer
//!
//! Each table becomes one worksheet: column names in row 1, data from row 2.
//! Strings are written inline, so no shared strings part is produced.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use sheetcmp_core::{CellAddress, CellValue, Table, Workbook, MAX_ROWS};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use crate::serial::datetime_to_serial;
use crate::styles::{to_styles_xml, DATETIME_XF};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, BufWriter::new(file))?.flush()?;
        Ok(())
    }

    /// Write a workbook to a writer, returning the writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<W> {
        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat(
                "A workbook needs at least one sheet".into(),
            ));
        }
        for (name, table) in workbook.sheets() {
            // Header row plus data rows
            if table.row_count() + 1 > MAX_ROWS as usize {
                return Err(XlsxError::InvalidFormat(format!(
                    "Sheet '{}' has {} rows, more than a worksheet holds",
                    name,
                    table.row_count()
                )));
            }
        }

        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        Self::write_content_types(&mut zip, workbook.sheet_count())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        )?;

        zip.start_file("xl/workbook.xml", options)?;
        Self::write_workbook_xml(&mut zip, workbook)?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        Self::write_workbook_rels(&mut zip, workbook.sheet_count())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(to_styles_xml().as_bytes())?;

        for (i, (name, table)) in workbook.sheets().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
            Self::write_worksheet(&mut zip, table)?;
            log::debug!("Wrote sheet '{}' with {} rows", name, table.row_count());
        }

        Ok(zip.finish()?)
    }

    fn write_content_types<W: Write>(out: &mut W, sheet_count: usize) -> XlsxResult<()> {
        out.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        )?;
        for i in 0..sheet_count {
            write!(
                out,
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            )?;
        }
        out.write_all(b"\n</Types>")?;
        Ok(())
    }

    fn write_workbook_xml<W: Write>(out: &mut W, workbook: &Workbook) -> XlsxResult<()> {
        out.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        )?;
        for (i, (name, _)) in workbook.sheets().enumerate() {
            write!(
                out,
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(name),
                i + 1,
                i + 1
            )?;
        }
        out.write_all(b"\n    </sheets>\n</workbook>")?;
        Ok(())
    }

    fn write_workbook_rels<W: Write>(out: &mut W, sheet_count: usize) -> XlsxResult<()> {
        out.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        )?;
        for i in 0..sheet_count {
            write!(
                out,
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            )?;
        }
        // Styles relationship
        write!(
            out,
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
            sheet_count + 1
        )?;
        Ok(())
    }

    /// Stream one worksheet part row by row
    fn write_worksheet<W: Write>(out: &mut W, table: &Table) -> XlsxResult<()> {
        out.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
        )?;

        if table.column_count() > 0 {
            write!(out, "\n        <row r=\"1\">")?;
            for (col, name) in table.column_names().enumerate() {
                write_inline_string(out, &cell_ref(0, col), name)?;
            }
            out.write_all(b"</row>")?;
        }

        for (idx, row) in table.rows().enumerate() {
            let row_num = idx as u32 + 1;
            write!(out, "\n        <row r=\"{}\">", row_num + 1)?;
            for (col, value) in row.iter().enumerate() {
                Self::write_cell(out, &cell_ref(row_num, col), value)?;
            }
            out.write_all(b"</row>")?;
        }

        out.write_all(b"\n    </sheetData>\n</worksheet>")?;
        Ok(())
    }

    fn write_cell<W: Write>(out: &mut W, r: &str, value: &CellValue) -> XlsxResult<()> {
        match value {
            CellValue::Null => {}
            CellValue::Boolean(b) => {
                write!(out, "<c r=\"{}\" t=\"b\"><v>{}</v></c>", r, u8::from(*b))?;
            }
            CellValue::Integer(n) => write!(out, "<c r=\"{}\"><v>{}</v></c>", r, n)?,
            CellValue::Float(n) if n.is_finite() => {
                write!(out, "<c r=\"{}\"><v>{}</v></c>", r, n)?;
            }
            // NaN and infinities have no numeric representation in a cell
            CellValue::Float(n) => write_inline_string(out, r, &n.to_string())?,
            CellValue::String(s) => write_inline_string(out, r, s.as_str())?,
            CellValue::DateTime(dt) => match datetime_to_serial(*dt) {
                Some(serial) => write!(
                    out,
                    "<c r=\"{}\" s=\"{}\"><v>{}</v></c>",
                    r, DATETIME_XF, serial
                )?,
                None => write_inline_string(out, r, &value.to_string())?,
            },
        }
        Ok(())
    }
}

fn cell_ref(row: u32, col: usize) -> String {
    CellAddress::new(row, col as u16).to_a1_string()
}

fn write_inline_string<W: Write>(out: &mut W, r: &str, text: &str) -> XlsxResult<()> {
    let space = if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        " xml:space=\"preserve\""
    } else {
        ""
    };
    write!(
        out,
        "<c r=\"{}\" t=\"inlineStr\"><is><t{}>{}</t></is></c>",
        r,
        space,
        escape_xml(text)
    )?;
    Ok(())
}

/// Escape text for XML, encoding control characters the way Excel does
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' => out.push(c),
            c if (c as u32) < 0x20 => out.push_str(&format!("_x{:04X}_", c as u32)),
            // A literal "_x" would be read back as the start of an escape
            '_' if s[i..].starts_with("_x") => out.push_str("_x005F_"),
            c => out.push(c),
        }
    }
    out
}
