//! Export the annotated row set to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: source columns first, then the five annotation columns.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{
    FAIR_VALUE_HEADER, FilteredRow, OPENING_1_HEADER, OPENING_2_HEADER, PAYMENT_DATE_HEADER,
    PAYMENT_HEADER, PaymentInput,
};
use crate::error::AppError;

/// Write the annotated row set to a CSV file.
pub fn write_rows_csv(
    path: &Path,
    headers: &[String],
    rows: &[FilteredRow],
    payment: &PaymentInput,
    cedente: &str,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| AppError::from_io(path, e))?;

    let mut header_fields: Vec<String> = headers.to_vec();
    header_fields.extend(
        [
            PAYMENT_HEADER,
            PAYMENT_DATE_HEADER,
            OPENING_1_HEADER,
            OPENING_2_HEADER,
            FAIR_VALUE_HEADER,
        ]
        .map(String::from),
    );
    write_record(&mut file, path, &header_fields)?;

    for fr in rows {
        let mut fields: Vec<String> = fr.row.cells.iter().map(|c| c.display()).collect();

        // Payment annotations apply to the counterparty's own rows only.
        let own = fr.row.cedente == cedente;
        fields.push(fmt_opt_amount(own.then_some(payment.paid).flatten()));
        fields.push(if own {
            payment.payment_date.clone().unwrap_or_default()
        } else {
            String::new()
        });
        fields.push(fmt_opt_date(fr.opening_1));
        fields.push(fmt_opt_date(fr.opening_2));
        fields.push(fmt_opt_amount(own.then_some(payment.fair_value).flatten()));

        write_record(&mut file, path, &fields)?;
    }

    Ok(())
}

fn write_record(file: &mut File, path: &Path, fields: &[String]) -> Result<(), AppError> {
    let line: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
    writeln!(file, "{}", line.join(","))
        .map_err(|e| AppError::input(format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn fmt_opt_amount(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_default()
}

fn fmt_opt_date(v: Option<chrono::NaiveDateTime>) -> String {
    v.map(|dt| dt.format("%d/%m/%Y").to_string()).unwrap_or_default()
}
