//! Base-workbook ingest and validation.
//!
//! Turns the xlsx base workbook into typed tables:
//!
//! - the asset table (every source column kept, in order)
//! - the openings map (operation code → opening date)
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no annotation logic here

use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{
    AssetRow, AssetTable, BASE_SHEET, COL_CEDENTE, COL_OPENING_DATE, COL_TICKER_1, COL_TICKER_2,
    COL_TOKEN, OPENINGS_SHEET, RowError,
};
use crate::error::AppError;
use crate::parse;
use crate::workbook::CellValue;

/// Ingest output: asset table + openings + row-level errors.
#[derive(Debug, Clone)]
pub struct BaseData {
    pub assets: AssetTable,
    pub openings: HashMap<String, NaiveDateTime>,
    pub row_errors: Vec<RowError>,
}

/// Open the base workbook and parse both required sheets.
pub fn load_base_workbook(path: &Path) -> Result<BaseData, AppError> {
    // Open through std first so permission-denied and missing-file conditions
    // are reported distinctly.
    let file = std::fs::File::open(path).map_err(|e| AppError::from_io(path, e))?;
    let mut workbook = Xlsx::new(BufReader::new(file)).map_err(|e| {
        AppError::input(format!(
            "Failed to open base workbook '{}': {e}",
            path.display()
        ))
    })?;

    let assets_range = worksheet(&mut workbook, path, BASE_SHEET)?;
    let openings_range = worksheet(&mut workbook, path, OPENINGS_SHEET)?;

    let mut row_errors = Vec::new();
    let assets = parse_asset_table(&assets_range, &mut row_errors)?;
    let openings = parse_openings(&openings_range, &mut row_errors)?;

    debug!(
        rows = assets.rows.len(),
        openings = openings.len(),
        skipped = row_errors.len(),
        "base workbook loaded"
    );

    Ok(BaseData {
        assets,
        openings,
        row_errors,
    })
}

fn worksheet(
    workbook: &mut Xlsx<BufReader<std::fs::File>>,
    path: &Path,
    sheet: &str,
) -> Result<Range<Data>, AppError> {
    workbook.worksheet_range(sheet).map_err(|e| {
        AppError::input(format!(
            "Sheet '{sheet}' not available in '{}': {e}",
            path.display()
        ))
    })
}

/// Parse the asset table from its sheet range.
pub fn parse_asset_table(
    range: &Range<Data>,
    row_errors: &mut Vec<RowError>,
) -> Result<AssetTable, AppError> {
    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Err(AppError::input(format!("Sheet '{BASE_SHEET}' is empty.")));
    };

    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    let cedente_idx = required_column(&headers, COL_CEDENTE, BASE_SHEET)?;
    let ticker_1_idx = required_column(&headers, COL_TICKER_1, BASE_SHEET)?;
    let ticker_2_idx = required_column(&headers, COL_TICKER_2, BASE_SHEET)?;

    let mut rows = Vec::new();
    for (i, row) in rows_iter.enumerate() {
        let line = i + 2;
        let cells: Vec<CellValue> = row.iter().map(to_cell_value).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }

        let Some(cedente) = text_at(&cells, cedente_idx) else {
            row_errors.push(RowError {
                line,
                message: format!("missing '{COL_CEDENTE}' value"),
            });
            continue;
        };

        rows.push(AssetRow {
            line,
            ticker_1: text_at(&cells, ticker_1_idx),
            ticker_2: text_at(&cells, ticker_2_idx),
            cedente,
            cells,
        });
    }

    Ok(AssetTable { headers, rows })
}

/// Parse the openings table into a code → opening date map.
///
/// The first occurrence of a code wins; rows whose date cell cannot be read
/// as a date are reported and skipped (the code then simply has no opening).
pub fn parse_openings(
    range: &Range<Data>,
    row_errors: &mut Vec<RowError>,
) -> Result<HashMap<String, NaiveDateTime>, AppError> {
    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Err(AppError::input(format!(
            "Sheet '{OPENINGS_SHEET}' is empty."
        )));
    };

    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    let token_idx = required_column(&headers, COL_TOKEN, OPENINGS_SHEET)?;
    let date_idx = required_column(&headers, COL_OPENING_DATE, OPENINGS_SHEET)?;

    let mut openings = HashMap::new();
    for (i, row) in rows_iter.enumerate() {
        let line = i + 2;
        let cells: Vec<CellValue> = row.iter().map(to_cell_value).collect();
        let Some(token) = text_at(&cells, token_idx) else {
            continue;
        };

        match opening_date(&cells, date_idx) {
            Some(date) => {
                openings.entry(token).or_insert(date);
            }
            None => row_errors.push(RowError {
                line,
                message: format!("unreadable '{COL_OPENING_DATE}' for token '{token}'"),
            }),
        }
    }

    Ok(openings)
}

fn required_column(headers: &[String], name: &str, sheet: &str) -> Result<usize, AppError> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        AppError::input(format!(
            "Expected column '{name}' not found in sheet '{sheet}'."
        ))
    })
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Convert a calamine cell into the workbook model's value type.
fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Text(data.to_string()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Non-empty display text at `idx`, if any.
fn text_at(cells: &[CellValue], idx: usize) -> Option<String> {
    let value = cells.get(idx)?;
    let text = value.display();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read the opening date at `idx`, tolerating textual dates.
fn opening_date(cells: &[CellValue], idx: usize) -> Option<NaiveDateTime> {
    match cells.get(idx)? {
        CellValue::Date(dt) => Some(*dt),
        CellValue::Text(s) => parse::parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)),
        _ => None,
    }
}
