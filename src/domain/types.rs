//! Shared domain types and the fixed workbook layout.
//!
//! The layout constants mirror the operational workbook this tool maintains;
//! annotation columns sit at fixed positions past the source columns, so the
//! sheet tolerates gaps between the data and the annotations.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::workbook::{CellRef, CellValue};

// =============================================================================
// Base workbook layout
// =============================================================================

/// Sheet holding the asset table in the base workbook.
pub const BASE_SHEET: &str = "Base de Dados Ativos";
/// Sheet holding the historical openings in the base workbook.
pub const OPENINGS_SHEET: &str = "Histórico de Captações";

/// Counterparty column of the asset table.
pub const COL_CEDENTE: &str = "Cedente";
/// First operation-code column.
pub const COL_TICKER_1: &str = "Ticker 1";
/// Second operation-code column.
pub const COL_TICKER_2: &str = "Ticker 2";
/// Grace-period start column (date-valued).
pub const COL_GRACE_START: &str = "Início Período de Graça";
/// Grace-period end column (date-valued).
pub const COL_GRACE_END: &str = "Fim Período de Graça";

/// Operation-code column of the openings table.
pub const COL_TOKEN: &str = "Token";
/// Opening-date column of the openings table.
pub const COL_OPENING_DATE: &str = "Data de Abertura";

// =============================================================================
// Output workbook layout
// =============================================================================

/// Primary data sheet of every output workbook.
pub const PRIMARY_SHEET: &str = "Ativos Filtrados";
/// Sheet carrying the operation code on freshly created files.
pub const AMORT_SHEET: &str = "Amort. Op.";

/// Annotation columns (1-based positions, fixed regardless of source width).
pub const PAYMENT_COL: u32 = 30;
pub const PAYMENT_DATE_COL: u32 = 31;
pub const OPENING_1_COL: u32 = 32;
pub const OPENING_2_COL: u32 = 33;
pub const FAIR_VALUE_COL: u32 = 36;

pub const PAYMENT_HEADER: &str = "Pagamento";
pub const PAYMENT_DATE_HEADER: &str = "Data Pgmto.";
pub const OPENING_1_HEADER: &str = "Data Lançamento Op. 1";
pub const OPENING_2_HEADER: &str = "Data Lançamento Op. 2";
pub const FAIR_VALUE_HEADER: &str = "Valor Justo";

/// Template sheets copied per counterparty.
pub const TEMPLATE_SHEETS: [&str; 3] =
    ["Alocação - Ativo", "Flx. Ativo - Real", "Flx. Ativo - Venda"];

/// Cell receiving the operation code in [`AMORT_SHEET`] on new files.
pub const CODE_CELL: CellRef = CellRef::new(3, 2);
/// Cell receiving the counterparty name on "Alocação"-family copies (B3).
pub const ALLOCATION_NAME_CELL: CellRef = CellRef::new(3, 2);
/// Cell receiving the counterparty name on "Flx."-family copies (D4).
pub const FLOW_NAME_CELL: CellRef = CellRef::new(4, 4);

/// Display format applied to all date-valued cells.
pub const DATE_FORMAT: &str = "DD/MM/YYYY";
/// Filename suffix of newly created per-code workbooks.
pub const OUTPUT_SUFFIX: &str = "_amortizacao.json";

// =============================================================================
// Data structures
// =============================================================================

/// One row of the base asset table.
///
/// Every source cell is kept in column order; the columns the pipeline
/// branches on are also exposed as typed fields.
#[derive(Debug, Clone)]
pub struct AssetRow {
    /// 1-based row number in the source sheet (the header is row 1).
    pub line: usize,
    /// Every source cell, in column order.
    pub cells: Vec<CellValue>,
    pub cedente: String,
    pub ticker_1: Option<String>,
    pub ticker_2: Option<String>,
}

/// The asset table of the base workbook.
#[derive(Debug, Clone)]
pub struct AssetTable {
    pub headers: Vec<String>,
    pub rows: Vec<AssetRow>,
}

impl AssetTable {
    /// Index of a header by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// An asset row selected for output, with the opening dates of its own
/// operation codes resolved (explicitly keyed by code, never by position).
#[derive(Debug, Clone)]
pub struct FilteredRow {
    pub row: AssetRow,
    pub opening_1: Option<NaiveDateTime>,
    pub opening_2: Option<NaiveDateTime>,
}

/// A row-level problem reported during ingest; never fatal.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Payment inputs for a run.
///
/// Amounts are `None` when the raw string failed currency parsing (reported
/// per value, non-fatal) or was not supplied.
#[derive(Debug, Clone, Default)]
pub struct PaymentInput {
    pub paid: Option<f64>,
    pub payment_date: Option<String>,
    pub fair_value: Option<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags plus environment fallbacks; the pipeline
/// itself never reads flags or environment variables.
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    pub base_path: PathBuf,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub cedente: String,
    pub payment: PaymentInput,
    pub export_path: Option<PathBuf>,
}
