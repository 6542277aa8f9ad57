//! Locale-aware parsing helpers.
//!
//! Currency values arrive as Brazilian-locale strings ("1.234,56", optional
//! "R$" prefix). Dates show up in two textual shapes: `DD/MM/YYYY` in source
//! data and `YYYY-MM-DD HH:MM:SS` timestamps left behind by earlier
//! spreadsheet exports.

use chrono::{NaiveDate, NaiveDateTime};

/// Textual timestamp shape produced by spreadsheet exports.
pub const TEXT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a dot-thousands, comma-decimal currency string into a float.
///
/// Returns `None` for anything that does not survive the conversion; callers
/// report the value and continue, since a bad amount never aborts a run.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_start_matches("R$")
        .trim()
        .replace('.', "")
        .replace(',', ".");

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse::<f64>().ok()
}

/// Reparse a textual `YYYY-MM-DD HH:MM:SS` timestamp, if the string is one.
pub fn parse_text_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TEXT_TIMESTAMP_FORMAT).ok()
}

/// Parse a date in Brazilian (`DD/MM/YYYY`) or ISO (`YYYY-MM-DD`) form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_locale_currency() {
        assert_eq!(parse_currency("1.234,56"), Some(1234.56));
        assert_eq!(parse_currency("R$ 2.500,00"), Some(2500.0));
        assert_eq!(parse_currency("12,5"), Some(12.5));
        assert_eq!(parse_currency("1000"), Some(1000.0));
    }

    #[test]
    fn malformed_currency_yields_none() {
        assert_eq!(parse_currency("abc"), None);
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("-"), None);
        assert_eq!(parse_currency("1,2,3"), None);
    }

    #[test]
    fn reparses_text_timestamps_only() {
        let dt = parse_text_timestamp("2024-03-01 00:00:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert_eq!(parse_text_timestamp("01/03/2024"), None);
        assert_eq!(parse_text_timestamp("2024-03-01"), None);
    }

    #[test]
    fn parses_both_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(parse_date("31/12/2023"), Some(expected));
        assert_eq!(parse_date("2023-12-31"), Some(expected));
        assert_eq!(parse_date("31-12-2023"), None);
    }
}
