//! Counterparty filtering and operation-code collection.

use crate::domain::{AssetRow, AssetTable};

/// Rows whose counterparty column exactly matches `cedente`.
pub fn filter_by_cedente<'a>(table: &'a AssetTable, cedente: &str) -> Vec<&'a AssetRow> {
    table.rows.iter().filter(|r| r.cedente == cedente).collect()
}

/// Collect the union of both ticker columns over `rows`.
///
/// Blank values and duplicates are dropped; order is first appearance, so the
/// result is reproducible for a given input row order.
pub fn collect_codes(rows: &[&AssetRow]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for row in rows {
        for code in [&row.ticker_1, &row.ticker_2].into_iter().flatten() {
            if !codes.iter().any(|c| c == code) {
                codes.push(code.clone());
            }
        }
    }
    codes
}

/// Rows referencing any collected code in either ticker column.
///
/// This is a superset of the counterparty's own rows: related parties sharing
/// an operation are pulled in as well.
pub fn related_rows<'a>(table: &'a AssetTable, codes: &[String]) -> Vec<&'a AssetRow> {
    table
        .rows
        .iter()
        .filter(|r| {
            [&r.ticker_1, &r.ticker_2]
                .into_iter()
                .flatten()
                .any(|code| codes.iter().any(|c| c == code))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;

    fn row(line: usize, cedente: &str, t1: Option<&str>, t2: Option<&str>) -> AssetRow {
        AssetRow {
            line,
            cells: vec![CellValue::Text(cedente.to_string())],
            cedente: cedente.to_string(),
            ticker_1: t1.map(String::from),
            ticker_2: t2.map(String::from),
        }
    }

    fn table() -> AssetTable {
        AssetTable {
            headers: vec!["Cedente".into(), "Ticker 1".into(), "Ticker 2".into()],
            rows: vec![
                row(2, "Maria Souza", Some("OP2"), Some("OP1")),
                row(3, "João Lima", Some("OP3"), None),
                row(4, "Maria Souza", Some("OP1"), None),
                row(5, "Ana Prado", Some("OP1"), Some("OP9")),
            ],
        }
    }

    #[test]
    fn filters_by_exact_counterparty() {
        let t = table();
        let rows = filter_by_cedente(&t, "Maria Souza");
        assert_eq!(rows.len(), 2);

        assert!(filter_by_cedente(&t, "maria souza").is_empty());
        assert!(filter_by_cedente(&t, "Nobody").is_empty());
    }

    #[test]
    fn collects_codes_in_first_appearance_order() {
        let t = table();
        let rows = filter_by_cedente(&t, "Maria Souza");

        let codes = collect_codes(&rows);
        assert_eq!(codes, vec!["OP2".to_string(), "OP1".to_string()]);

        // Re-running on the same subset yields the same set.
        assert_eq!(collect_codes(&rows), codes);
    }

    #[test]
    fn related_rows_are_a_superset() {
        let t = table();
        let rows = filter_by_cedente(&t, "Maria Souza");
        let codes = collect_codes(&rows);

        let related = related_rows(&t, &codes);
        let lines: Vec<usize> = related.iter().map(|r| r.line).collect();
        // Ana Prado shares OP1, João Lima does not.
        assert_eq!(lines, vec![2, 4, 5]);
    }
}
