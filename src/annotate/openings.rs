//! Historical-openings cross-reference.
//!
//! Every collected code is looked up in the openings table; codes without an
//! entry stay `None`. The dates are keyed by code and carried on each row, so
//! a row's date columns always correspond to that row's own operations.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::{AssetRow, FilteredRow};

/// Opening date per collected code, in code order.
pub fn opening_dates(
    codes: &[String],
    openings: &HashMap<String, NaiveDateTime>,
) -> Vec<(String, Option<NaiveDateTime>)> {
    codes
        .iter()
        .map(|code| (code.clone(), openings.get(code).copied()))
        .collect()
}

/// Attach each row's own opening dates.
pub fn attach_openings(
    rows: &[&AssetRow],
    openings: &HashMap<String, NaiveDateTime>,
) -> Vec<FilteredRow> {
    rows.iter()
        .map(|row| FilteredRow {
            opening_1: lookup(&row.ticker_1, openings),
            opening_2: lookup(&row.ticker_2, openings),
            row: (*row).clone(),
        })
        .collect()
}

fn lookup(
    code: &Option<String>,
    openings: &HashMap<String, NaiveDateTime>,
) -> Option<NaiveDateTime> {
    code.as_ref().and_then(|c| openings.get(c)).copied()
}
