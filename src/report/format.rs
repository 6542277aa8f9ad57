//! Formatted terminal output for annotation runs.
//!
//! We keep formatting code in one place so:
//! - the filtering/writing code stays clean and testable
//! - output changes are localized

use chrono::NaiveDateTime;

use crate::app::pipeline::RunOutput;
use crate::domain::AnnotateConfig;

/// Format the full run summary (inputs + codes + per-file outcomes).
pub fn format_run_summary(run: &RunOutput, config: &AnnotateConfig) -> String {
    let mut out = String::new();

    out.push_str("=== amort - Amortization Annotation ===\n");
    out.push_str(&format!("Cedente: {}\n", config.cedente));

    if run.not_found {
        out.push_str("No rows matched; no file was created or modified.\n");
        return out;
    }

    out.push_str(&format!(
        "Rows: matched={} | written (incl. related)={}\n",
        run.matched_rows, run.written_rows
    ));
    out.push_str(&format!(
        "Payment: {} | date: {} | fair value: {}\n",
        fmt_amount(config.payment.paid),
        config.payment.payment_date.as_deref().unwrap_or("-"),
        fmt_amount(config.payment.fair_value),
    ));

    out.push_str("\nOperation codes:\n");
    out.push_str(&format_codes_table(&run.codes));

    out.push_str("\nOutput files:\n");
    for file in &run.files {
        let action = if file.created { "created" } else { "updated" };
        out.push_str(&format!(
            "- {} [{action}] codes: {} | sheets added: {}\n",
            file.path.display(),
            file.codes.join(", "),
            file.sheets_added.len()
        ));
    }

    if !run.row_errors.is_empty() {
        out.push_str(&format!(
            "\n{} row(s) skipped during ingest (see logs).\n",
            run.row_errors.len()
        ));
    }

    out
}

/// Format the collected codes and their opening dates as an aligned table.
pub fn format_codes_table(codes: &[(String, Option<NaiveDateTime>)]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<20} {:>12}\n", "code", "opening"));
    out.push_str(&format!("{:-<20} {:-<12}\n", "", ""));
    for (code, opening) in codes {
        out.push_str(&format!(
            "{:<20} {:>12}\n",
            truncate(code, 20),
            opening
                .map(|dt| dt.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }

    out
}

fn fmt_amount(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::FileOutcome;
    use crate::domain::PaymentInput;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config() -> AnnotateConfig {
        AnnotateConfig {
            base_path: PathBuf::from("base.xlsx"),
            template_path: PathBuf::from("template.json"),
            output_dir: PathBuf::from("out"),
            cedente: "Maria Souza".into(),
            payment: PaymentInput {
                paid: Some(1234.56),
                payment_date: Some("05/08/2026".into()),
                fair_value: None,
            },
            export_path: None,
        }
    }

    #[test]
    fn codes_table_lists_dates_and_misses() {
        let opening = NaiveDate::from_ymd_opt(2023, 1, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let table = format_codes_table(&[
            ("OP1".to_string(), Some(opening)),
            ("OP2".to_string(), None),
        ]);

        assert!(table.contains("OP1"));
        assert!(table.contains("10/01/2023"));
        assert!(table.contains("OP2"));
        assert!(table.lines().last().unwrap().trim_end().ends_with('-'));
    }

    #[test]
    fn summary_reports_not_found_runs() {
        let run = RunOutput {
            codes: Vec::new(),
            matched_rows: 0,
            written_rows: 0,
            files: Vec::new(),
            row_errors: Vec::new(),
            not_found: true,
        };

        let summary = format_run_summary(&run, &config());
        assert!(summary.contains("No rows matched"));
        assert!(summary.contains("Maria Souza"));
    }

    #[test]
    fn summary_lists_files_and_payment() {
        let run = RunOutput {
            codes: vec![("OP1".to_string(), None)],
            matched_rows: 1,
            written_rows: 2,
            files: vec![FileOutcome {
                path: PathBuf::from("out/OP1_amortizacao.json"),
                codes: vec!["OP1".to_string()],
                created: true,
                sheets_added: vec!["Alocação - Maria_1".to_string()],
            }],
            row_errors: Vec::new(),
            not_found: false,
        };

        let summary = format_run_summary(&run, &config());
        assert!(summary.contains("1234.56"));
        assert!(summary.contains("fair value: -"));
        assert!(summary.contains("[created]"));
        assert!(summary.contains("sheets added: 1"));
    }
}
