//! Primary-sheet writing and payment/date annotation.
//!
//! The write is layered so re-runs stay safe:
//!
//! - source rows are rewritten from row 2 in dataset iteration order
//! - annotation headers are written only into empty cells
//! - payment cells are overwritten for the run's counterparty only
//! - date cells are normalized to one display format, including rows left
//!   over from earlier runs

use crate::domain::{
    COL_GRACE_END, COL_GRACE_START, DATE_FORMAT, FAIR_VALUE_COL, FAIR_VALUE_HEADER, FilteredRow,
    OPENING_1_COL, OPENING_1_HEADER, OPENING_2_COL, OPENING_2_HEADER, PAYMENT_COL,
    PAYMENT_DATE_COL, PAYMENT_DATE_HEADER, PAYMENT_HEADER, PRIMARY_SHEET, PaymentInput,
};
use crate::parse;
use crate::workbook::{CellRef, CellValue, Sheet, Workbook};

/// Write the filtered rows and annotations into the primary sheet.
pub fn write_primary_sheet(
    wb: &mut Workbook,
    headers: &[String],
    rows: &[FilteredRow],
    cedente: &str,
    payment: &PaymentInput,
) {
    let sheet = wb.ensure_sheet(PRIMARY_SHEET);

    write_annotation_headers(sheet);

    for (i, fr) in rows.iter().enumerate() {
        let row = i as u32 + 2;
        for (j, value) in fr.row.cells.iter().enumerate() {
            sheet.set_value(CellRef::new(row, j as u32 + 1), value.clone());
        }

        if let Some(dt) = fr.opening_1 {
            set_date(sheet, CellRef::new(row, OPENING_1_COL), dt);
        }
        if let Some(dt) = fr.opening_2 {
            set_date(sheet, CellRef::new(row, OPENING_2_COL), dt);
        }
    }

    annotate_payments(sheet, cedente, payment);
    normalize_date_formats(sheet, headers);
}

/// Write the annotation headers into row 1, skipping populated cells so a
/// manually renamed header survives re-runs.
fn write_annotation_headers(sheet: &mut Sheet) {
    let titles = [
        (PAYMENT_COL, PAYMENT_HEADER),
        (PAYMENT_DATE_COL, PAYMENT_DATE_HEADER),
        (OPENING_1_COL, OPENING_1_HEADER),
        (OPENING_2_COL, OPENING_2_HEADER),
        (FAIR_VALUE_COL, FAIR_VALUE_HEADER),
    ];
    for (col, title) in titles {
        let r = CellRef::new(1, col);
        if sheet.is_empty_at(r) {
            sheet.set_value(r, CellValue::Text(title.to_string()));
        }
    }
}

/// Overwrite payment cells on every data row whose leading cell matches the
/// counterparty, including rows from earlier runs.
fn annotate_payments(sheet: &mut Sheet, cedente: &str, payment: &PaymentInput) {
    for row in 2..=sheet.max_row() {
        let matches = sheet
            .value(row, 1)
            .is_some_and(|v| v.display() == cedente);
        if !matches {
            continue;
        }

        sheet.set_value(
            CellRef::new(row, PAYMENT_COL),
            payment.paid.map_or(CellValue::Empty, CellValue::Number),
        );
        sheet.set_value(
            CellRef::new(row, PAYMENT_DATE_COL),
            payment
                .payment_date
                .clone()
                .map_or(CellValue::Empty, CellValue::Text),
        );
        sheet.set_value(
            CellRef::new(row, FAIR_VALUE_COL),
            payment.fair_value.map_or(CellValue::Empty, CellValue::Number),
        );
    }
}

fn set_date(sheet: &mut Sheet, r: CellRef, dt: chrono::NaiveDateTime) {
    sheet.set_value(r, CellValue::Date(dt));
    sheet.set_format(r, DATE_FORMAT);
}

/// Normalize date display across all data rows.
///
/// Covers the grace-period source columns (located by header name, since the
/// sheet's row 1 may be empty on files created from a bare template) and the
/// two opening-date annotation columns.
fn normalize_date_formats(sheet: &mut Sheet, headers: &[String]) {
    let mut date_cols: Vec<u32> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.as_str() == COL_GRACE_START || h.as_str() == COL_GRACE_END)
        .map(|(j, _)| j as u32 + 1)
        .collect();
    date_cols.push(OPENING_1_COL);
    date_cols.push(OPENING_2_COL);

    for row in 2..=sheet.max_row() {
        for &col in &date_cols {
            normalize_date_cell(sheet, CellRef::new(row, col));
        }
    }
}

/// Reparse textual timestamps and apply the date display format.
///
/// Native date cells keep their value; text cells are only touched when they
/// match the known timestamp shape.
fn normalize_date_cell(sheet: &mut Sheet, r: CellRef) {
    let Some(value) = sheet.cell(r).map(|c| c.value.clone()) else {
        return;
    };

    match value {
        CellValue::Date(_) => sheet.set_format(r, DATE_FORMAT),
        CellValue::Text(s) => {
            if let Some(dt) = parse::parse_text_timestamp(&s) {
                set_date(sheet, r, dt);
            }
        }
        _ => {}
    }
}
