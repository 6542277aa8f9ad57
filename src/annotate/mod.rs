//! Core annotation logic.
//!
//! - counterparty filtering and code collection (`filter`)
//! - historical-openings cross-reference (`openings`)
//! - primary-sheet writing and payment annotation (`writer`)
//! - derived per-counterparty sheet copies (`sheets`)

pub mod filter;
pub mod openings;
pub mod sheets;
pub mod writer;
