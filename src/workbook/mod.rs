//! Workbook model and container I/O.
//!
//! - A1-style cell references (`addr`)
//! - sheets/cells/values model (`model`)
//! - JSON container read/write (`file`)

pub mod addr;
pub mod file;
pub mod model;

pub use addr::*;
pub use file::*;
pub use model::*;
