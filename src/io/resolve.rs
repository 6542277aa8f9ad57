//! Output-file resolution per operation code.
//!
//! Each collected code maps to exactly one workbook file in the output
//! directory:
//!
//! - an existing file whose name contains the code as a substring (first
//!   match in filename order wins), or
//! - a fresh copy of the template named `<code>_amortizacao.json`, with the
//!   code stamped into the "Amort. Op." sheet.
//!
//! Codes that land on the same file are grouped so the workbook is loaded
//! and persisted once per file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{AMORT_SHEET, CODE_CELL, OUTPUT_SUFFIX};
use crate::error::AppError;
use crate::workbook::{self, CellValue};

/// A resolved output file and the codes that write into it.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub codes: Vec<String>,
    pub created: bool,
}

/// Resolve each code to an output file, grouping codes that share one.
///
/// The existing-file listing is a snapshot taken before any file is created,
/// and is sorted by name so "first match wins" is reproducible. Group order
/// follows the first code that resolved to each file.
pub fn resolve_output_files(
    output_dir: &Path,
    template_path: &Path,
    codes: &[String],
) -> Result<Vec<ResolvedFile>, AppError> {
    fs::create_dir_all(output_dir).map_err(|e| AppError::from_io(output_dir, e))?;
    let existing = list_files_sorted(output_dir)?;

    let mut resolved: Vec<ResolvedFile> = Vec::new();
    for code in codes {
        let (path, created) = match existing.iter().find(|name| name.contains(code.as_str())) {
            Some(name) => {
                debug!(%code, file = %name, "reusing existing workbook");
                (output_dir.join(name), false)
            }
            None => (create_from_template(output_dir, template_path, code)?, true),
        };

        match resolved.iter_mut().find(|r| r.path == path) {
            Some(entry) => entry.codes.push(code.clone()),
            None => resolved.push(ResolvedFile {
                path,
                codes: vec![code.clone()],
                created,
            }),
        }
    }

    Ok(resolved)
}

fn list_files_sorted(dir: &Path) -> Result<Vec<String>, AppError> {
    let mut names = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| AppError::from_io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AppError::from_io(dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Copy the template for `code` and stamp the code into the amortization
/// sheet.
fn create_from_template(
    output_dir: &Path,
    template_path: &Path,
    code: &str,
) -> Result<PathBuf, AppError> {
    let path = output_dir.join(format!("{code}{OUTPUT_SUFFIX}"));
    fs::copy(template_path, &path).map_err(|e| {
        AppError::input(format!(
            "Failed to copy template '{}' to '{}': {e}",
            template_path.display(),
            path.display()
        ))
    })?;

    let mut wb = workbook::load_workbook(&path)?;
    if let Some(sheet) = wb.sheet_mut(AMORT_SHEET) {
        sheet.set_value(CODE_CELL, CellValue::Text(code.to_string()));
    }
    workbook::save_workbook(&path, &wb)?;

    info!(%code, file = %path.display(), "created workbook from template");
    Ok(path)
}
