//! In-memory workbook model.
//!
//! The model is intentionally small and serializable:
//!
//! - sheets are ordered and uniquely named
//! - cells live in a sparse row-major map keyed by A1-style references
//! - a cell is a value plus an optional display format
//!
//! Nothing here knows about the annotation layout; that lives in `annotate`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::workbook::addr::CellRef;

/// Current serialization schema version, embedded in the container file.
pub const SCHEMA_VERSION: u32 = 1;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "value")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Lossy display form, used for leading-column comparisons and exports.
    ///
    /// Whole numbers print without a fractional part so numeric operation
    /// codes round-trip as the same token they carry in filenames.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::Date(dt) => dt.format("%d/%m/%Y").to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// A cell: value plus optional display format (e.g. `DD/MM/YYYY`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One worksheet: a name and a sparse cell map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub cells: BTreeMap<CellRef, Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn cell(&self, r: CellRef) -> Option<&Cell> {
        self.cells.get(&r)
    }

    pub fn value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&CellRef::new(row, col)).map(|c| &c.value)
    }

    /// Set the value at `r`, preserving any display format already there.
    pub fn set_value(&mut self, r: CellRef, value: CellValue) {
        match self.cells.get_mut(&r) {
            Some(cell) => cell.value = value,
            None => {
                self.cells.insert(r, Cell { value, format: None });
            }
        }
    }

    /// Set the display format at `r`, creating an empty cell if needed.
    pub fn set_format(&mut self, r: CellRef, format: &str) {
        match self.cells.get_mut(&r) {
            Some(cell) => cell.format = Some(format.to_string()),
            None => {
                self.cells.insert(
                    r,
                    Cell {
                        value: CellValue::Empty,
                        format: Some(format.to_string()),
                    },
                );
            }
        }
    }

    /// True when the cell is absent or holds an empty value.
    pub fn is_empty_at(&self, r: CellRef) -> bool {
        self.cells.get(&r).is_none_or(|c| c.value.is_empty())
    }

    /// Highest occupied row, or 0 for an empty sheet.
    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|r| r.row).max().unwrap_or(0)
    }
}

/// Error copying a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopySheetError {
    MissingSource(String),
    DuplicateName(String),
}

impl fmt::Display for CopySheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopySheetError::MissingSource(name) => write!(f, "no sheet named '{name}' to copy"),
            CopySheetError::DuplicateName(name) => write!(f, "sheet name '{name}' already in use"),
        }
    }
}

impl std::error::Error for CopySheetError {}

/// An ordered collection of uniquely named sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub schema_version: u32,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sheets: Vec::new(),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn contains_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Return the sheet named `name`, appending it empty if absent.
    pub fn ensure_sheet(&mut self, name: &str) -> &mut Sheet {
        let idx = match self.sheets.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[idx]
    }

    /// Copy `src` (cells and formats) under `new_name`, appended last.
    pub fn copy_sheet(&mut self, src: &str, new_name: &str) -> Result<(), CopySheetError> {
        if self.contains_sheet(new_name) {
            return Err(CopySheetError::DuplicateName(new_name.to_string()));
        }
        let source = self
            .sheet(src)
            .ok_or_else(|| CopySheetError::MissingSource(src.to_string()))?;
        let mut copy = source.clone();
        copy.name = new_name.to_string();
        self.sheets.push(copy);
        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a sheet name absent from `existing` by appending a numeric suffix.
///
/// The suffix always starts at `_1`; repeated calls against a growing set
/// keep counting upward and never reuse a taken name.
pub fn unique_sheet_name(base: &str, existing: &[String]) -> String {
    let mut i = 1;
    loop {
        let candidate = format!("{base}_{i}");
        if !existing.iter().any(|n| n == &candidate) {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_sheet_creates_once() {
        let mut wb = Workbook::new();
        wb.ensure_sheet("Ativos Filtrados")
            .set_value(CellRef::new(1, 1), CellValue::Text("x".into()));
        wb.ensure_sheet("Ativos Filtrados");

        assert_eq!(wb.sheets.len(), 1);
        assert_eq!(
            wb.sheet("Ativos Filtrados").unwrap().value(1, 1),
            Some(&CellValue::Text("x".into()))
        );
    }

    #[test]
    fn copy_sheet_preserves_cells_and_rejects_duplicates() {
        let mut wb = Workbook::new();
        let sheet = wb.ensure_sheet("Alocação - Ativo");
        sheet.set_value(CellRef::new(2, 2), CellValue::Number(10.0));
        sheet.set_format(CellRef::new(2, 2), "DD/MM/YYYY");

        wb.copy_sheet("Alocação - Ativo", "Alocação - Maria_1").unwrap();
        let copy = wb.sheet("Alocação - Maria_1").unwrap();
        assert_eq!(copy.value(2, 2), Some(&CellValue::Number(10.0)));
        assert_eq!(
            copy.cell(CellRef::new(2, 2)).unwrap().format.as_deref(),
            Some("DD/MM/YYYY")
        );

        assert_eq!(
            wb.copy_sheet("Alocação - Ativo", "Alocação - Maria_1"),
            Err(CopySheetError::DuplicateName("Alocação - Maria_1".into()))
        );
        assert_eq!(
            wb.copy_sheet("missing", "other"),
            Err(CopySheetError::MissingSource("missing".into()))
        );
    }

    #[test]
    fn unique_names_never_repeat() {
        let mut existing: Vec<String> = vec!["Flx. Maria - Real_1".into()];

        let first = unique_sheet_name("Flx. Maria - Real", &existing);
        assert_eq!(first, "Flx. Maria - Real_2");
        existing.push(first);

        let second = unique_sheet_name("Flx. Maria - Real", &existing);
        assert_eq!(second, "Flx. Maria - Real_3");
        assert!(!existing.contains(&second));
    }

    #[test]
    fn set_value_keeps_existing_format() {
        let mut sheet = Sheet::new("s");
        let r = CellRef::new(5, 32);
        sheet.set_format(r, "DD/MM/YYYY");
        sheet.set_value(r, CellValue::Number(1.0));

        assert_eq!(sheet.cell(r).unwrap().format.as_deref(), Some("DD/MM/YYYY"));
        assert_eq!(sheet.max_row(), 5);
        assert!(sheet.is_empty_at(CellRef::new(1, 1)));
    }
}
