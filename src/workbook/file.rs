//! Read/write workbook container files.
//!
//! The container is the portable JSON representation of a template or
//! per-code output workbook. The schema is defined by `model::Workbook` and
//! versioned so older files keep loading after additions.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::AppError;
use crate::workbook::model::{SCHEMA_VERSION, Workbook};

/// Load a workbook container file.
pub fn load_workbook(path: &Path) -> Result<Workbook, AppError> {
    let file = File::open(path).map_err(|e| AppError::from_io(path, e))?;
    let wb: Workbook = serde_json::from_reader(file).map_err(|e| {
        AppError::input(format!(
            "Invalid workbook container '{}': {e}",
            path.display()
        ))
    })?;

    if wb.schema_version > SCHEMA_VERSION {
        return Err(AppError::input(format!(
            "Workbook '{}' uses schema version {} (this build supports up to {}).",
            path.display(),
            wb.schema_version,
            SCHEMA_VERSION
        )));
    }

    Ok(wb)
}

/// Write a workbook container file.
pub fn save_workbook(path: &Path, wb: &Workbook) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::from_io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), wb)
        .map_err(|e| AppError::data(format!("Failed to write workbook '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::addr::CellRef;
    use crate::workbook::model::CellValue;
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("amort-{}-{name}", std::process::id()))
    }

    #[test]
    fn container_round_trips() {
        let mut wb = Workbook::new();
        let sheet = wb.ensure_sheet("Amort. Op.");
        sheet.set_value(CellRef::new(3, 2), CellValue::Text("OP123".into()));
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        sheet.set_value(CellRef::new(4, 2), CellValue::Date(dt));
        sheet.set_format(CellRef::new(4, 2), "DD/MM/YYYY");

        let path = temp_path("roundtrip.json");
        save_workbook(&path, &wb).unwrap();
        let loaded = load_workbook(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, wb);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_workbook(&temp_path("does-not-exist.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn future_schema_is_rejected() {
        let mut wb = Workbook::new();
        wb.schema_version = SCHEMA_VERSION + 1;

        let path = temp_path("future.json");
        save_workbook(&path, &wb).unwrap();
        let err = load_workbook(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(err.to_string().contains("schema version"));
    }
}
