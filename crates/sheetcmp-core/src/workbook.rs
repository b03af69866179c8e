//! Workbook type - an ordered set of named tables

use crate::error::{Error, Result};
use crate::table::Table;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook: named sheets in file order, each materialized as a [`Table`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<(String, Table)>,
}

impl Workbook {
    /// Create an empty workbook with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get the sheet names in order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Get a sheet by index
    pub fn sheet_at(&self, index: usize) -> Option<(&str, &Table)> {
        self.sheets.get(index).map(|(n, t)| (n.as_str(), t))
    }

    /// Iterate over all sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Add a sheet at the end, returning its index
    pub fn add_sheet<S: Into<String>>(&mut self, name: S, table: Table) -> Result<usize> {
        let name = name.into();
        self.validate_sheet_name(&name)?;
        self.sheets.push((name, table));
        Ok(self.sheets.len() - 1)
    }

    /// Validate a sheet name against Excel's rules and the existing sheets
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        // Check for invalid characters
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        for c in INVALID_CHARS {
            if name.contains(*c) {
                return Err(Error::InvalidSheetName(format!(
                    "Sheet name cannot contain '{}'",
                    c
                )));
            }
        }

        // Check for duplicate names (case-insensitive)
        let name_lower = name.to_lowercase();
        if self
            .sheets
            .iter()
            .any(|(n, _)| n.to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}
