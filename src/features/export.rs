//! Plain-data exporters
//!
//! - JSON: the whole [`RenderedChart`] (feature `json`)
//! - Text: a tab-separated preview of the sheet followed by the legend

use crate::core::convert::RenderedChart;
use crate::data::constants::{LEGEND_CODE_LABEL, LEGEND_COUNT_LABEL};
#[cfg(feature = "json")]
use crate::utils::error::ConversionResult;

/// Serialize the rendered chart as pretty-printed JSON
#[cfg(feature = "json")]
pub fn to_json(chart: &RenderedChart) -> ConversionResult<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

/// Tab-separated preview: main headers, sub headers, data rows, then the legend
pub fn to_text(chart: &RenderedChart) -> String {
    let mut lines = Vec::with_capacity(chart.rows.len() + chart.tally.len() + 4);

    let mut main = Vec::with_capacity(chart.width());
    for group in &chart.headers.main {
        main.push(group.title.as_str());
        main.extend(std::iter::repeat("").take(group.span - 1));
    }
    lines.push(main.join("\t"));
    lines.push(chart.headers.sub.join("\t"));

    for row in &chart.rows {
        lines.push(row.values.join("\t"));
    }

    if !chart.tally.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}\t{}", LEGEND_CODE_LABEL, LEGEND_COUNT_LABEL));
        for (code, count) in chart.legend() {
            lines.push(format!("{}\t{}", code, count));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
