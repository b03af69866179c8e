//! Lazy access to the sheets of a file

use sheetcmp_core::{Table, Workbook};

use crate::error::{CompareError, CompareResult};

/// A file whose sheets are read on demand
///
/// Listing sheet names is expected to be cheap. Reading a sheet may parse a large
/// part of the file, so the session only does it once every earlier stage has
/// passed, and drops each table as soon as its sheet is compared.
pub trait TableSource {
    /// Identifier compared by the file name stage
    fn file_name(&self) -> &str;

    /// Sheet names in file order
    fn sheet_names(&mut self) -> CompareResult<Vec<String>>;

    /// Materialize one sheet
    fn read_sheet(&mut self, name: &str) -> CompareResult<Table>;
}

/// A workbook already held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    workbook: Workbook,
}

impl MemorySource {
    /// Wrap a workbook under the given file identifier
    pub fn new(name: impl Into<String>, workbook: Workbook) -> Self {
        Self {
            name: name.into(),
            workbook,
        }
    }

    /// The wrapped workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }
}

impl TableSource for MemorySource {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn sheet_names(&mut self) -> CompareResult<Vec<String>> {
        Ok(self.workbook.sheet_names())
    }

    fn read_sheet(&mut self, name: &str) -> CompareResult<Table> {
        self.workbook.sheet(name).cloned().ok_or_else(|| {
            CompareError::resource(
                self.name.clone(),
                sheetcmp_core::Error::SheetNotFound(name.to_string()),
            )
        })
    }
}
