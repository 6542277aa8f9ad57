//! Derived per-counterparty sheet copies.
//!
//! Every counterparty present in the primary sheet gets one personalized copy
//! of each template sheet. Derived names substitute the counterparty's first
//! given name into the template name and take a numeric suffix so sheet names
//! stay unique across runs.

use tracing::debug;

use crate::domain::{ALLOCATION_NAME_CELL, FLOW_NAME_CELL, PRIMARY_SHEET, TEMPLATE_SHEETS};
use crate::workbook::{CellValue, Sheet, Workbook, unique_sheet_name};

/// Counterparty names from the primary sheet's leading column, deduplicated
/// in order of first appearance.
pub fn collect_cedentes(sheet: &Sheet) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in 2..=sheet.max_row() {
        let Some(value) = sheet.value(row, 1) else {
            continue;
        };
        let name = value.display();
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Copy the template sheets for every counterparty in the primary sheet.
///
/// Returns the names of the sheets added. Template sheets missing from the
/// workbook are skipped; each copy is personalized with the full counterparty
/// name in the cell its template family expects.
pub fn derive_counterparty_sheets(wb: &mut Workbook) -> Vec<String> {
    let Some(primary) = wb.sheet(PRIMARY_SHEET) else {
        return Vec::new();
    };
    let cedentes = collect_cedentes(primary);

    let mut existing = wb.sheet_names();
    let mut added = Vec::new();

    for cedente in &cedentes {
        let first_name = cedente.split_whitespace().next().unwrap_or(cedente);

        for template in TEMPLATE_SHEETS {
            if !wb.contains_sheet(template) {
                continue;
            }

            let base = template.replace("Ativo", first_name);
            let name = unique_sheet_name(&base, &existing);
            if wb.copy_sheet(template, &name).is_err() {
                // Uniqueness is guaranteed by the generator and the source was
                // checked above; nothing sensible to do beyond skipping.
                continue;
            }

            if let Some(sheet) = wb.sheet_mut(&name) {
                if name.contains("Alocação") {
                    sheet.set_value(ALLOCATION_NAME_CELL, CellValue::Text(cedente.clone()));
                } else if name.contains("Flx.") {
                    sheet.set_value(FLOW_NAME_CELL, CellValue::Text(cedente.clone()));
                }
            }

            debug!(sheet = %name, %cedente, "derived template sheet");
            existing.push(name.clone());
            added.push(name);
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellRef;

    fn workbook_with_rows(names: &[&str]) -> Workbook {
        let mut wb = Workbook::new();
        for template in TEMPLATE_SHEETS {
            wb.ensure_sheet(template);
        }
        let primary = wb.ensure_sheet(PRIMARY_SHEET);
        for (i, name) in names.iter().enumerate() {
            primary.set_value(
                CellRef::new(i as u32 + 2, 1),
                CellValue::Text(name.to_string()),
            );
        }
        wb
    }

    #[test]
    fn duplicate_rows_yield_one_sheet_set_per_counterparty() {
        let mut wb = workbook_with_rows(&["Maria Souza", "Ana Prado", "Maria Souza"]);

        let added = derive_counterparty_sheets(&mut wb);

        // Two unique counterparties, three templates each.
        assert_eq!(added.len(), 6);
        assert!(wb.contains_sheet("Alocação - Maria_1"));
        assert!(wb.contains_sheet("Flx. Maria - Real_1"));
        assert!(wb.contains_sheet("Flx. Maria - Venda_1"));
        assert!(wb.contains_sheet("Alocação - Ana_1"));
        assert!(!wb.contains_sheet("Alocação - Maria_2"));
    }

    #[test]
    fn reruns_take_the_next_suffix() {
        let mut wb = workbook_with_rows(&["Maria Souza"]);

        derive_counterparty_sheets(&mut wb);
        let added = derive_counterparty_sheets(&mut wb);

        assert!(added.contains(&"Alocação - Maria_2".to_string()));
        assert!(wb.contains_sheet("Alocação - Maria_1"));
        assert!(wb.contains_sheet("Alocação - Maria_2"));
    }

    #[test]
    fn copies_are_personalized_per_family() {
        let mut wb = workbook_with_rows(&["Maria Souza"]);

        derive_counterparty_sheets(&mut wb);

        let allocation = wb.sheet("Alocação - Maria_1").unwrap();
        assert_eq!(
            allocation.value(ALLOCATION_NAME_CELL.row, ALLOCATION_NAME_CELL.col),
            Some(&CellValue::Text("Maria Souza".into()))
        );

        let flow = wb.sheet("Flx. Maria - Real_1").unwrap();
        assert_eq!(
            flow.value(FLOW_NAME_CELL.row, FLOW_NAME_CELL.col),
            Some(&CellValue::Text("Maria Souza".into()))
        );
    }

    #[test]
    fn missing_templates_are_skipped() {
        let mut wb = Workbook::new();
        let primary = wb.ensure_sheet(PRIMARY_SHEET);
        primary.set_value(CellRef::new(2, 1), CellValue::Text("Maria Souza".into()));

        let added = derive_counterparty_sheets(&mut wb);
        assert!(added.is_empty());
    }
}
