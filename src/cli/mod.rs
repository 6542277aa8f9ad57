//! Command-line parsing for the amortization annotator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the filtering/writing logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "amort", version, about = "Amortization ledger annotator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter the base workbook by counterparty and update the per-code
    /// amortization workbooks.
    Annotate(AnnotateArgs),
    /// Print the counterparty's operation codes and opening dates only
    /// (useful for scripting). Touches no files.
    Codes(AnnotateArgs),
}

/// Common options for annotating and inspecting.
#[derive(Debug, Parser, Clone)]
pub struct AnnotateArgs {
    /// Counterparty name, matched exactly against the "Cedente" column.
    #[arg(short = 'c', long)]
    pub cedente: String,

    /// Paid amount as a locale currency string (e.g. "1.234,56").
    #[arg(long)]
    pub paid: Option<String>,

    /// Payment date, recorded as given.
    #[arg(long = "payment-date")]
    pub payment_date: Option<String>,

    /// Fair value as a locale currency string.
    #[arg(long = "fair-value")]
    pub fair_value: Option<String>,

    /// Base workbook (xlsx). Falls back to AMORT_BASE_WORKBOOK.
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Template workbook container. Falls back to AMORT_TEMPLATE.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output directory for per-code workbooks. Falls back to
    /// AMORT_OUTPUT_DIR.
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Export the annotated row set to a CSV file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
