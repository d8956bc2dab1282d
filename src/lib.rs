//! # textchart
//!
//! Converts interlinear discourse chart exports (XML) into display-ready
//! tables: one string per sheet cell, plus the layout a spreadsheet needs.
//!
//! ## Features
//!
//! - **Cell Interpretation**: words paired with their glosses, reference codes
//!   and clause-marker ranges rendered inline
//! - **Header Schema**: two-level column headers with analysis columns
//! - **Layout**: merged cells, sentence and paragraph breaks, row shading
//! - **Reference Legend**: occurrence count of every reference code
//! - **Workbook Output**: `.xlsx` via `rust_xlsxwriter` (feature `xlsx`)
//! - **JSON Output**: the full rendered chart (feature `json`)
//!
//! ## Usage Examples
//!
//! ### Cell Conversion
//!
//! ```rust
//! use textchart::core::{interpret_cell, Cell, CellChild};
//!
//! let cell = Cell::new(vec![
//!     CellChild::Word("kuma".into()),
//!     CellChild::Word("ni".into()),
//! ])
//! .with_glosses(["go", "3SG"]);
//! assert_eq!(interpret_cell(&cell).text, "kuma (go) ni (3SG)");
//! ```
//!
//! ### Full Chart Conversion
//!
//! ```rust
//! use textchart::{convert_chart_xml, ChartOptions};
//!
//! let chart = convert_chart_xml(r#"
//!     <document><chart>
//!       <row type="title1">
//!         <cell><main><lit>Row</lit></main></cell>
//!         <cell><main><lit>Clause</lit></main></cell>
//!         <cell><main><lit>Notes</lit></main></cell>
//!       </row>
//!       <row type="title2">
//!         <cell><main><lit>Row</lit></main></cell>
//!         <cell><main><lit>Verb</lit></main></cell>
//!         <cell><main><lit>Notes</lit></main></cell>
//!       </row>
//!       <row type="normal" id="1">
//!         <cell><main><rownum>1</rownum></main></cell>
//!         <cell><main><word>kuma</word><listRef>T</listRef></main></cell>
//!         <cell/>
//!       </row>
//!     </chart></document>
//! "#, &ChartOptions::minimal()).unwrap();
//!
//! assert_eq!(chart.rows[0].values, vec!["", "1", "kuma (T)", ""]);
//! assert_eq!(chart.tally.count("T"), 1);
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - constants and lookup tables
pub mod data;

/// Feature modules - output surfaces
pub mod features;

/// Utility modules
pub mod utils;

// Re-export core conversion types
pub use core::{
    convert_chart, interpret_cell, read_chart, BreakEmphasis, Cell, CellChild, CellContent,
    CellInterpreter, Chart, ChartConverter, ChartOptions, HeaderSchema, MergeRange,
    ReferenceTally, RenderedChart, RenderedRow, Row, RowCategory, RowLayout, RowRole,
};

// Re-export data modules
pub use data::constants;

// Re-export feature modules
pub use features::export;
#[cfg(feature = "xlsx")]
pub use features::workbook;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{ConversionError, ConversionResult};

/// Convert chart XML text with the given options
///
/// # Arguments
/// * `input` - XML document containing a `chart` element
/// * `options` - Conversion options
///
/// # Returns
/// The rendered chart, or the first fatal error
pub fn convert_chart_xml(input: &str, options: &ChartOptions) -> ConversionResult<RenderedChart> {
    ChartConverter::new(options.clone()).convert_str(input)
}

/// Convert chart XML text with default options
pub fn convert_chart_xml_default(input: &str) -> ConversionResult<RenderedChart> {
    convert_chart_xml(input, &ChartOptions::default())
}

/// Convert chart XML text and render it as an `.xlsx` workbook in memory
#[cfg(feature = "xlsx")]
pub fn chart_xml_to_xlsx(input: &str, options: &ChartOptions) -> ConversionResult<Vec<u8>> {
    let chart = convert_chart_xml(input, options)?;
    workbook::workbook_to_bytes(&chart)
}
