//! Data layer - Static mappings and constants
//!
//! This module contains all static data used for chart conversion:
//! - Source element and attribute names
//! - Sheet labels and layout origin
//! - Row kind keys and shading colours

pub mod constants;

// Re-export commonly used items
pub use constants::{CATEGORY_KEYS, FIRST_CHART_COLUMN, FIRST_DATA_ROW, REFERENCE_PLACEHOLDER};
