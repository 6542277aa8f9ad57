//! Input/output helpers.
//!
//! - base workbook ingest + validation (`ingest`)
//! - per-code output file resolution (`resolve`)
//! - CSV export of the annotated rows (`export`)

pub mod export;
pub mod ingest;
pub mod resolve;

pub use export::*;
pub use ingest::*;
pub use resolve::*;
