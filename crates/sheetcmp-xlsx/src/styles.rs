//! XLSX styles (styles.xml) read/write helpers
//!
//! Only number formats matter here: a numeric cell whose cell format is a date
//! format holds a date serial, not a plain number.

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Index of the cell format the writer uses for date/time cells
pub(crate) const DATETIME_XF: u32 = 1;

/// Number format id of the writer's date/time format
const DATETIME_NUMFMT_ID: u32 = 164;

/// Format code of the writer's date/time format
const DATETIME_FORMAT_CODE: &str = "yyyy-mm-dd hh:mm:ss";

// === Reading ===

/// Which cell formats (cellXfs entries) display dates
#[derive(Debug, Clone, Default)]
pub(crate) struct DateStyles {
    is_date: Vec<bool>,
}

impl DateStyles {
    /// Check the cell format at `xf_index`
    pub(crate) fn is_date(&self, xf_index: u32) -> bool {
        self.is_date
            .get(xf_index as usize)
            .copied()
            .unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn from_flags(is_date: Vec<bool>) -> Self {
        Self { is_date }
    }
}

pub(crate) fn read_date_styles<R: Read>(reader: R) -> XlsxResult<DateStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut numfmts: HashMap<u32, String> = HashMap::new();
    let mut xf_numfmt_ids: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => xf_numfmt_ids.push(num_fmt_id(&e)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"numFmt" => {
                    let mut id = None;
                    let mut code = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => {
                                id = attr.unescape_value().ok().and_then(|s| s.parse().ok())
                            }
                            b"formatCode" => {
                                code = attr.unescape_value().ok().map(|s| s.to_string())
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(code)) = (id, code) {
                        numfmts.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => xf_numfmt_ids.push(num_fmt_id(&e)),
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"cellXfs" {
                    in_cell_xfs = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let is_date = xf_numfmt_ids
        .into_iter()
        .map(|id| match numfmts.get(&id) {
            Some(code) => is_date_format_code(code),
            None => is_builtin_date_format(id),
        })
        .collect();

    Ok(DateStyles { is_date })
}

fn num_fmt_id(e: &BytesStart<'_>) -> u32 {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"numFmtId")
        .and_then(|attr| attr.unescape_value().ok().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

/// Built-in number formats that display dates or times
fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 45..=47)
}

/// Check whether a custom format code displays a date or time
///
/// Quoted literals, backslash escapes and bracketed sections (colors, locales,
/// conditions) are ignored; elapsed-time sections such as `[h]` still count.
pub(crate) fn is_date_format_code(code: &str) -> bool {
    if code.eq_ignore_ascii_case("general") {
        return false;
    }

    let mut chars = code.chars();
    let mut in_quotes = false;
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let section: String = chars.by_ref().take_while(|&c| c != ']').collect();
                let lower = section.to_ascii_lowercase();
                if !lower.is_empty() && lower.chars().all(|c| matches!(c, 'h' | 'm' | 's')) {
                    return true;
                }
            }
            // Only the first section decides
            ';' => break,
            'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'm' | 'M' => return true,
            _ => {}
        }
    }
    false
}

// === Writing ===

/// A stylesheet with the default format plus one date/time format
pub(crate) fn to_styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1">
    <numFmt numFmtId="{id}" formatCode="{code}"/>
  </numFmts>
  <fonts count="1">
    <font><sz val="11"/><name val="Calibri"/></font>
  </fonts>
  <fills count="2">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
  </fills>
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>
  <cellXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="{id}" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
</styleSheet>"#,
        id = DATETIME_NUMFMT_ID,
        code = DATETIME_FORMAT_CODE
    )
}
