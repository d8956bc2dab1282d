//! Source document reading
//!
//! ```text
//! XML text -> element tree (quick-xml) -> typed Chart
//! ```

mod model;
mod xml;

pub use model::{flag, parse_span, Cell, CellChild, CellRole, Chart, Row, RowRole};
pub use xml::{parse_document, XmlElement, XmlNode};

use crate::utils::error::ConversionResult;

/// Parse chart XML text into the typed model
pub fn read_chart(input: &str) -> ConversionResult<Chart> {
    let root = parse_document(input)?;
    Chart::from_document(&root)
}
