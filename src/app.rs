//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//!
//! - initializes logging
//! - resolves configuration (flags first, then environment via `.env`)
//! - dispatches subcommands
//! - reports failures together with the run's input values

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, warn};

use crate::annotate::{filter, openings};
use crate::cli::{AnnotateArgs, Cli, Command};
use crate::domain::{AnnotateConfig, PaymentInput};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `amort` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Annotate(args) => handle_annotate(args),
        Command::Codes(args) => handle_codes(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_annotate(args: AnnotateArgs) -> Result<(), AppError> {
    let config = annotate_config_from_args(&args)?;

    match pipeline::run_annotate(&config) {
        Ok(run) => {
            println!("{}", crate::report::format_run_summary(&run, &config));
            Ok(())
        }
        Err(err) => {
            // Unexpected failures carry the run's inputs for diagnosis.
            error!(
                cedente = %config.cedente,
                paid = ?config.payment.paid,
                payment_date = ?config.payment.payment_date,
                fair_value = ?config.payment.fair_value,
                "annotation run failed"
            );
            Err(err)
        }
    }
}

fn handle_codes(args: AnnotateArgs) -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let base_path = resolve_path(args.base.clone(), "AMORT_BASE_WORKBOOK", "--base")?;

    let base = crate::io::ingest::load_base_workbook(&base_path)?;
    let rows = filter::filter_by_cedente(&base.assets, &args.cedente);
    if rows.is_empty() {
        println!("Cedente '{}' not found in the base dataset.", args.cedente);
        return Ok(());
    }

    let codes = filter::collect_codes(&rows);
    let dates = openings::opening_dates(&codes, &base.openings);
    println!("{}", crate::report::format_codes_table(&dates));
    Ok(())
}

/// Build the run configuration from flags, falling back to the environment.
fn annotate_config_from_args(args: &AnnotateArgs) -> Result<AnnotateConfig, AppError> {
    // `.env` is optional; flags take precedence over environment values.
    dotenvy::dotenv().ok();

    Ok(AnnotateConfig {
        base_path: resolve_path(args.base.clone(), "AMORT_BASE_WORKBOOK", "--base")?,
        template_path: resolve_path(args.template.clone(), "AMORT_TEMPLATE", "--template")?,
        output_dir: resolve_path(args.output_dir.clone(), "AMORT_OUTPUT_DIR", "--output-dir")?,
        cedente: args.cedente.clone(),
        payment: payment_from_args(args),
        export_path: args.export.clone(),
    })
}

fn resolve_path(flag: Option<PathBuf>, env_key: &str, flag_name: &str) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    std::env::var(env_key)
        .map(PathBuf::from)
        .map_err(|_| AppError::input(format!("Missing {flag_name} (or {env_key} in the environment).")))
}

fn payment_from_args(args: &AnnotateArgs) -> PaymentInput {
    PaymentInput {
        paid: parse_amount_flag(args.paid.as_deref(), "--paid"),
        payment_date: args.payment_date.clone(),
        fair_value: parse_amount_flag(args.fair_value.as_deref(), "--fair-value"),
    }
}

/// Parse a currency flag, reporting (not failing) on malformed values.
fn parse_amount_flag(raw: Option<&str>, flag: &str) -> Option<f64> {
    let raw = raw?;
    match crate::parse::parse_currency(raw) {
        Some(value) => Some(value),
        None => {
            warn!(value = raw, "could not parse {} as a currency amount; writing an empty value", flag);
            None
        }
    }
}
