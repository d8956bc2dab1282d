//! Feature modules - Output surfaces
//!
//! This module contains renderers for a converted chart:
//! - Excel workbook (feature `xlsx`)
//! - JSON and tab-separated text exports

pub mod export;
#[cfg(feature = "xlsx")]
pub mod workbook;

// Re-export commonly used items
#[cfg(feature = "json")]
pub use export::to_json;
pub use export::to_text;
#[cfg(feature = "xlsx")]
pub use workbook::{build_workbook, workbook_to_bytes, write_workbook};
