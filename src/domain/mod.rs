//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed workbook layout (sheet names, column headers, annotation
//!   column positions, template cells)
//! - typed views of the base dataset (`AssetTable`, `AssetRow`)
//! - run configuration and payment inputs (`AnnotateConfig`, `PaymentInput`)

pub mod types;

pub use types::*;
