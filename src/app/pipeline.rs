//! The annotation pipeline shared by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load base → filter → collect codes → cross-reference openings →
//! resolve files → write/annotate → derive sheets → persist → summarize.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::annotate::{filter, openings, sheets, writer};
use crate::domain::{AnnotateConfig, FilteredRow, RowError};
use crate::error::AppError;
use crate::io::{export, ingest, resolve};
use crate::workbook;

/// All computed outputs of a single annotation run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Collected codes with their opening dates, in first-appearance order.
    pub codes: Vec<(String, Option<NaiveDateTime>)>,
    /// Rows matching the counterparty itself.
    pub matched_rows: usize,
    /// Rows written to each primary sheet (counterparty + related parties).
    pub written_rows: usize,
    pub files: Vec<FileOutcome>,
    pub row_errors: Vec<RowError>,
    /// True when the counterparty had no rows; nothing was touched.
    pub not_found: bool,
}

/// Per-file outcome of the run.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub codes: Vec<String>,
    pub created: bool,
    pub sheets_added: Vec<String>,
}

/// Execute the full annotation pipeline.
pub fn run_annotate(config: &AnnotateConfig) -> Result<RunOutput, AppError> {
    // 1) Load and validate the base workbook.
    let base = ingest::load_base_workbook(&config.base_path)?;
    run_with_base(config, &base)
}

/// Execute the pipeline with pre-loaded base data.
///
/// This is useful for tests and for callers that already hold the tables.
pub fn run_with_base(
    config: &AnnotateConfig,
    base: &ingest::BaseData,
) -> Result<RunOutput, AppError> {
    for err in &base.row_errors {
        warn!(line = err.line, "{}", err.message);
    }

    // 2) Filter by counterparty.
    let own_rows = filter::filter_by_cedente(&base.assets, &config.cedente);
    if own_rows.is_empty() {
        info!(cedente = %config.cedente, "counterparty not found; no file modified");
        return Ok(RunOutput {
            codes: Vec::new(),
            matched_rows: 0,
            written_rows: 0,
            files: Vec::new(),
            row_errors: base.row_errors.clone(),
            not_found: true,
        });
    }

    // 3) Collect operation codes and the related-row superset.
    let codes = filter::collect_codes(&own_rows);
    let related = filter::related_rows(&base.assets, &codes);
    info!(
        cedente = %config.cedente,
        matched = own_rows.len(),
        related = related.len(),
        codes = codes.len(),
        "filtered base dataset"
    );

    // 4) Cross-reference opening dates, keyed by code.
    let rows: Vec<FilteredRow> = openings::attach_openings(&related, &base.openings);
    let code_dates = openings::opening_dates(&codes, &base.openings);

    // 5) Resolve output files, grouping codes that share one.
    let resolved =
        resolve::resolve_output_files(&config.output_dir, &config.template_path, &codes)?;

    // 6) Update and persist each workbook exactly once. Completed saves stay
    //    durable even if a later file's processing fails.
    let mut files = Vec::new();
    for target in &resolved {
        let mut wb = workbook::load_workbook(&target.path)?;

        // The primary sheet is rewritten per code iteration; for identical
        // inputs the rewrite is idempotent.
        for _code in &target.codes {
            writer::write_primary_sheet(
                &mut wb,
                &base.assets.headers,
                &rows,
                &config.cedente,
                &config.payment,
            );
        }

        let sheets_added = sheets::derive_counterparty_sheets(&mut wb);
        workbook::save_workbook(&target.path, &wb)?;
        info!(file = %target.path.display(), sheets = sheets_added.len(), "workbook saved");

        files.push(FileOutcome {
            path: target.path.clone(),
            codes: target.codes.clone(),
            created: target.created,
            sheets_added,
        });
    }

    // 7) Optional CSV export of the annotated row set.
    if let Some(path) = &config.export_path {
        export::write_rows_csv(path, &base.assets.headers, &rows, &config.payment, &config.cedente)?;
        info!(file = %path.display(), "export written");
    }

    Ok(RunOutput {
        codes: code_dates,
        matched_rows: own_rows.len(),
        written_rows: rows.len(),
        files,
        row_errors: base.row_errors.clone(),
        not_found: false,
    })
}
