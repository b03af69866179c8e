//! XLSX reader
//!
//! Opening a file reads only the workbook part, its relationships and the
//! styles. Shared strings are loaded on the first sheet read, and each worksheet
//! part is parsed only when that sheet is requested.
//!
//! A sheet becomes a table as follows: the first row holding a value is the
//! header, every later row up to the last row holding a value is a data row, and
//! rows missing from the file inside that range are read as rows of nulls.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetcmp_core::{
    CellAddress, CellValue, SharedString, StringPool, Table, TableBuilder, Workbook,
};
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::serial::serial_to_datetime;
use crate::styles::{read_date_styles, DateStyles};

/// Largest magnitude at which every integer is exactly representable as `f64`
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel writes control characters this way, e.g. `_x000d_` for CR and
/// `_x005f_` for a literal underscore.
fn decode_excel_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = tail
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| tail.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

/// An open XLSX file whose sheets are read on demand
pub struct XlsxWorkbook<R> {
    archive: ZipArchive<R>,
    sheets: Vec<SheetEntry>,
    date_styles: DateStyles,
    date1904: bool,
    shared_strings: Option<Vec<SharedString>>,
}

impl XlsxWorkbook<BufReader<File>> {
    /// Open a file by path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxWorkbook<R> {
    /// Open a workbook from a reader
    pub fn from_reader(reader: R) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let info = read_workbook_xml(&mut archive)?;
        let sheet_paths = read_workbook_rels(&mut archive)?;
        let date_styles = match archive.by_name("xl/styles.xml") {
            Ok(file) => read_date_styles(file)?,
            Err(_) => DateStyles::default(),
        };

        let mut sheets = Vec::with_capacity(info.sheets.len());
        for (name, r_id) in info.sheets {
            match sheet_paths.get(&r_id) {
                Some(path) => sheets.push(SheetEntry {
                    name,
                    path: path.clone(),
                }),
                None => log::warn!(
                    "Sheet '{}' has no worksheet part ({}), skipping",
                    name,
                    r_id
                ),
            }
        }

        log::debug!("Opened workbook with {} sheets", sheets.len());

        Ok(Self {
            archive,
            sheets,
            date_styles,
            date1904: info.date1904,
            shared_strings: None,
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the workbook uses the 1904 date system
    pub fn is_date1904(&self) -> bool {
        self.date1904
    }

    /// Parse one sheet into a table
    pub fn read_sheet(&mut self, name: &str) -> XlsxResult<Table> {
        let path = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.path.clone())
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?;

        if self.shared_strings.is_none() {
            self.shared_strings = Some(read_shared_strings(&mut self.archive)?);
        }

        let ctx = CellContext {
            shared_strings: self.shared_strings.as_deref().unwrap_or_default(),
            date_styles: &self.date_styles,
            date1904: self.date1904,
        };
        let table = read_worksheet(&mut self.archive, &path, &ctx)?;
        log::debug!("Read sheet '{}' with shape {}", name, table.shape());
        Ok(table)
    }

    /// Parse every sheet
    pub fn read_all(mut self) -> XlsxResult<Workbook> {
        let mut workbook = Workbook::new();
        for name in self.sheet_names() {
            let table = self.read_sheet(&name)?;
            workbook.add_sheet(name, table)?;
        }
        Ok(workbook)
    }
}

impl<R> std::fmt::Debug for XlsxWorkbook<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheets)
            .field("date1904", &self.date1904)
            .finish_non_exhaustive()
    }
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a whole workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        XlsxWorkbook::open(path)?.read_all()
    }

    /// Read a whole workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        XlsxWorkbook::from_reader(reader)?.read_all()
    }
}

/// Read the shared strings table
fn read_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> XlsxResult<Vec<SharedString>> {
    let mut strings = Vec::new();

    let file = match archive.by_name("xl/sharedStrings.xml") {
        Ok(f) => f,
        Err(_) => return Ok(strings), // No shared strings is valid
    };

    // Text is not trimmed: leading and trailing spaces are part of the value.
    let mut xml_reader = Reader::from_reader(BufReader::new(file));

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    // Phonetic runs repeat the text in another script
    let mut in_rph = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_rph = true,
                b"t" if in_si && !in_rph => in_t = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"si" => {
                    strings.push(SharedString::new(decode_excel_escapes(&current)));
                    in_si = false;
                }
                b"rPh" => in_rph = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                strings.push(SharedString::new(""));
            }
            Ok(Event::Text(e)) if in_t => {
                current.push_str(&e.unescape()?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    log::trace!("Loaded {} shared strings", strings.len());
    Ok(strings)
}

struct WorkbookInfo {
    /// (name, relationship id) in workbook order
    sheets: Vec<(String, String)>,
    date1904: bool,
}

/// Read workbook.xml to get sheet names, rIds and the date system
fn read_workbook_xml<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<WorkbookInfo> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut info = WorkbookInfo {
        sheets: Vec::new(),
        date1904: false,
    };

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                b"sheet" => {
                    let name = attr_value(&e, b"name");
                    let r_id = attr_value(&e, b"r:id");
                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        info.sheets.push((name, r_id));
                    }
                }
                b"workbookPr" => {
                    info.date1904 = attr_value(&e, b"date1904")
                        .map_or(false, |v| v == "1" || v.eq_ignore_ascii_case("true"));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// Read workbook.xml.rels to get worksheet part paths by relationship id
fn read_workbook_rels<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> XlsxResult<HashMap<String, String>> {
    let file = archive
        .by_name("xl/_rels/workbook.xml.rels")
        .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let id = attr_value(&e, b"Id");
                let target = attr_value(&e, b"Target");
                let rel_type = attr_value(&e, b"Type");

                // Only include worksheet relationships
                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        // Target is relative to xl/ unless absolute
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{}", target),
                        };
                        rels.insert(id, full_path);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Workbook-wide lookups needed to decode a cell
struct CellContext<'a> {
    shared_strings: &'a [SharedString],
    date_styles: &'a DateStyles,
    date1904: bool,
}

/// A `<c>` element being parsed
#[derive(Default)]
struct PendingCell {
    col: u16,
    kind: Option<String>,
    style: u32,
    value: Option<String>,
}

/// Read a worksheet part into a table
fn read_worksheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    ctx: &CellContext<'_>,
) -> XlsxResult<Table> {
    let file = archive
        .by_name(path)
        .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    let mut buf = Vec::new();
    let mut pool = StringPool::new();

    // (zero-based row index, cells) for every row holding at least one value
    let mut rows: Vec<(u32, Vec<CellValue>)> = Vec::new();
    let mut current_row: Vec<CellValue> = Vec::new();
    let mut row_idx: u32 = 0;
    let mut next_row_idx: u32 = 0;
    let mut next_col: u16 = 0;

    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_text = false;
    let mut in_rph = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"row" => {
                    row_idx = row_index(&e)?.unwrap_or(next_row_idx);
                    next_row_idx = row_idx + 1;
                    next_col = 0;
                    current_row.clear();
                }
                b"c" => {
                    let pending = start_cell(&e, next_col)?;
                    next_col = pending.col.saturating_add(1);
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => in_value = true,
                b"is" => {
                    if let Some(c) = cell.as_mut() {
                        c.value = Some(String::new());
                        c.kind = Some("inlineStr".into());
                    }
                }
                b"rPh" => in_rph = true,
                b"t" if cell.is_some() && !in_rph => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // A cell without content (e.g. style only) is null
                b"c" => next_col = start_cell(&e, next_col)?.col.saturating_add(1),
                b"row" => {
                    next_row_idx = row_index(&e)?.map_or(next_row_idx, |r| r + 1);
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                if let Some(c) = cell.as_mut() {
                    let text = e.unescape()?;
                    c.value.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let value = decode_cell(&pending, ctx, &mut pool)?;
                        place(&mut current_row, pending.col, value);
                    }
                    in_value = false;
                    in_inline_text = false;
                }
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"rPh" => in_rph = false,
                b"row" => {
                    if current_row.iter().any(|v| !v.is_null()) {
                        rows.push((row_idx, std::mem::take(&mut current_row)));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    build_table(rows)
}

fn row_index(e: &BytesStart<'_>) -> XlsxResult<Option<u32>> {
    match attr_value(e, b"r") {
        Some(r) => {
            let n: u32 = r
                .parse()
                .map_err(|_| XlsxError::Parse(format!("Invalid row number: {}", r)))?;
            Ok(Some(n.saturating_sub(1)))
        }
        None => Ok(None),
    }
}

fn start_cell(e: &BytesStart<'_>, next_col: u16) -> XlsxResult<PendingCell> {
    let mut pending = PendingCell {
        col: next_col,
        ..PendingCell::default()
    };
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"r" => {
                let addr = CellAddress::parse(&value).map_err(|err| {
                    XlsxError::Parse(format!("Invalid cell reference '{}': {}", value, err))
                })?;
                pending.col = addr.col;
            }
            b"t" => pending.kind = Some(value.into_owned()),
            b"s" => pending.style = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    Ok(pending)
}

fn place(row: &mut Vec<CellValue>, col: u16, value: CellValue) {
    let col = col as usize;
    if row.len() <= col {
        row.resize(col + 1, CellValue::Null);
    }
    row[col] = value;
}

/// Convert the raw content of a cell to a value
fn decode_cell(
    cell: &PendingCell,
    ctx: &CellContext<'_>,
    pool: &mut StringPool,
) -> XlsxResult<CellValue> {
    let Some(raw) = cell.value.as_deref() else {
        return Ok(CellValue::Null);
    };

    let value = match cell.kind.as_deref() {
        // Shared string
        Some("s") => {
            let idx: usize = raw.trim().parse().map_err(|_| {
                XlsxError::Parse(format!("Invalid shared string index: {}", raw))
            })?;
            let s = ctx.shared_strings.get(idx).ok_or_else(|| {
                XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
            })?;
            CellValue::String(s.clone())
        }

        Some("b") => CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true")),

        // Errors (#DIV/0!, #N/A, ...) are kept as their text
        Some("e") => CellValue::String(pool.intern(raw)),

        Some("str") | Some("inlineStr") => {
            CellValue::String(pool.intern(decode_excel_escapes(raw)))
        }

        // ISO 8601 date
        Some("d") => parse_iso_datetime(raw)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(pool.intern(raw))),

        None | Some("n") => decode_number(raw, cell.style, ctx)
            .unwrap_or_else(|| CellValue::String(pool.intern(raw))),

        // Unknown type - treat as string
        Some(_) => CellValue::String(pool.intern(raw)),
    };
    Ok(value)
}

fn decode_number(raw: &str, style: u32, ctx: &CellContext<'_>) -> Option<CellValue> {
    let n: f64 = raw.trim().parse().ok()?;

    if ctx.date_styles.is_date(style) {
        if let Some(dt) = serial_to_datetime(n, ctx.date1904) {
            return Some(CellValue::DateTime(dt));
        }
    }

    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        Some(CellValue::Integer(n as i64))
    } else {
        Some(CellValue::Float(n))
    }
}

fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Turn populated rows into a table: first row is the header, gaps become null rows
fn build_table(rows: Vec<(u32, Vec<CellValue>)>) -> XlsxResult<Table> {
    let mut rows = rows.into_iter();
    let mut builder = TableBuilder::new();

    let Some((header_idx, header)) = rows.next() else {
        return Ok(builder.finish()?);
    };
    builder.set_header(header);

    let mut expected = header_idx + 1;
    for (idx, row) in rows {
        for _ in expected..idx {
            builder.push_row(Vec::new());
        }
        builder.push_row(row);
        expected = idx + 1;
    }

    Ok(builder.finish()?)
}
