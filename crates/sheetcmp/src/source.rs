//! Table sources backed by files on disk

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use sheetcmp_core::Table;
use sheetcmp_csv::{CsvError, CsvReadOptions, CsvReader, CSV_SHEET_NAME};
use sheetcmp_engine::{CompareError, CompareResult, TableSource};
use sheetcmp_xlsx::{XlsxError, XlsxWorkbook};

/// File extensions a [`FileTableSource`] can open
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "csv"];

/// Lower-cased extension of a path
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

enum Backend {
    Xlsx {
        path: PathBuf,
        workbook: Option<XlsxWorkbook<BufReader<File>>>,
    },
    Csv(PathBuf),
}

/// A workbook file read one sheet at a time
///
/// Opening only checks that the file exists; its content is first touched when
/// the sheet names are asked for. XLSX and XLSM files list their sheets from the
/// workbook part alone. A CSV file is a workbook with a single sheet named
/// `Sheet1`.
pub struct FileTableSource {
    file_name: String,
    backend: Backend,
}

impl FileTableSource {
    /// Open a file, choosing the reader by extension
    pub fn open<P: AsRef<Path>>(path: P) -> CompareResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let backend = match extension_of(path).as_deref() {
            Some("xlsx") | Some("xlsm") => Backend::Xlsx {
                path: path.to_path_buf(),
                workbook: None,
            },
            Some("csv") => Backend::Csv(path.to_path_buf()),
            _ => {
                return Err(CompareError::resource(
                    file_name,
                    format!("unsupported file format: {}", path.display()),
                ))
            }
        };
        if !path.is_file() {
            return Err(CompareError::resource(
                file_name,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            ));
        }

        Ok(Self { file_name, backend })
    }
}

/// The open workbook, opening it on first use
fn xlsx_workbook<'a>(
    file_name: &str,
    path: &Path,
    workbook: &'a mut Option<XlsxWorkbook<BufReader<File>>>,
) -> CompareResult<&'a mut XlsxWorkbook<BufReader<File>>> {
    if workbook.is_none() {
        let opened =
            XlsxWorkbook::open(path).map_err(|e| CompareError::resource(file_name, e))?;
        *workbook = Some(opened);
    }
    workbook
        .as_mut()
        .ok_or_else(|| CompareError::resource(file_name, "workbook is not open"))
}

impl TableSource for FileTableSource {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn sheet_names(&mut self) -> CompareResult<Vec<String>> {
        match &mut self.backend {
            Backend::Xlsx { path, workbook } => {
                Ok(xlsx_workbook(&self.file_name, path, workbook)?.sheet_names())
            }
            Backend::Csv(_) => Ok(vec![CSV_SHEET_NAME.to_string()]),
        }
    }

    fn read_sheet(&mut self, name: &str) -> CompareResult<Table> {
        tracing::trace!(file = %self.file_name, sheet = name, "reading sheet");
        match &mut self.backend {
            Backend::Xlsx { path, workbook } => xlsx_workbook(&self.file_name, path, workbook)?
                .read_sheet(name)
                .map_err(|e| xlsx_error(&self.file_name, name, e)),
            Backend::Csv(path) if name == CSV_SHEET_NAME => {
                CsvReader::read_file(path, &CsvReadOptions::default())
                    .map_err(|e| csv_error(&self.file_name, name, e))
            }
            Backend::Csv(_) => Err(CompareError::resource(
                self.file_name.as_str(),
                sheetcmp_core::Error::SheetNotFound(name.to_string()),
            )),
        }
    }
}

impl std::fmt::Debug for FileTableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.backend {
            Backend::Xlsx { .. } => "xlsx",
            Backend::Csv(_) => "csv",
        };
        f.debug_struct("FileTableSource")
            .field("file_name", &self.file_name)
            .field("kind", &kind)
            .finish()
    }
}

fn xlsx_error(file: &str, sheet: &str, err: XlsxError) -> CompareError {
    match err {
        XlsxError::Core(e) if e.is_malformed_table() => CompareError::malformed(file, sheet, e),
        other => CompareError::resource(file, other),
    }
}

fn csv_error(file: &str, sheet: &str, err: CsvError) -> CompareError {
    match err {
        CsvError::Core(e) if e.is_malformed_table() => CompareError::malformed(file, sheet, e),
        other => CompareError::resource(file, other),
    }
}
