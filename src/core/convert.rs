//! Chart conversion
//!
//! Orchestrates one run: resolve the header schema, interpret every data
//! row against it, normalize row widths, classify rows and resolve their
//! layout. The result, [`RenderedChart`], is everything a renderer needs.
//!
//! ```text
//! Chart -> HeaderSchema ----------------------------+
//!   |                                               v
//!   +-> rows -> CellInterpreter -> width check -> RenderedChart
//!                    |                              ^
//!                    +-> codes -> ReferenceTally ---+
//! ```

use tracing::{debug, error, warn};

use crate::core::cell::{CellContent, CellInterpreter};
use crate::core::classify::{classify_row_kind, RowCategory};
use crate::core::clause::clause_label;
use crate::core::layout::{resolve_layout, RowLayout, RowShape};
use crate::core::options::ChartOptions;
use crate::core::source::{read_chart, Cell, Chart, Row, RowRole};
use crate::core::tally::ReferenceTally;
use crate::data::constants::{EL_ROW, ROW_TYPE_TITLE1, ROW_TYPE_TITLE2};
use crate::utils::diagnostics::{CheckResult, Diagnostic, DiagnosticLevel};
use crate::utils::error::{ConversionError, ConversionResult};

/// A column group in the main header row
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct HeaderGroup {
    pub title: String,
    pub span: usize,
}

impl HeaderGroup {
    pub fn new(title: impl Into<String>, span: usize) -> Self {
        HeaderGroup {
            title: title.into(),
            span: span.max(1),
        }
    }
}

/// Two-level column headers of the chart
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct HeaderSchema {
    /// Main headers with their spans, starting with the leading blank column
    pub main: Vec<HeaderGroup>,
    /// One label per sheet column
    pub sub: Vec<String>,
}

impl HeaderSchema {
    /// Build the schema from the `title1` and `title2` rows
    ///
    /// Fails when either header row is missing, or when the main header
    /// spans do not add up to the number of sub headers.
    pub fn resolve(chart: &Chart, options: &ChartOptions) -> ConversionResult<Self> {
        let title1 = chart
            .header(&RowRole::Title1)
            .ok_or_else(|| missing_header(ROW_TYPE_TITLE1))?;
        let title2 = chart
            .header(&RowRole::Title2)
            .ok_or_else(|| missing_header(ROW_TYPE_TITLE2))?;

        let mut main = vec![HeaderGroup::new("", 1)];
        main.extend(
            title1
                .cells
                .iter()
                .map(|cell| HeaderGroup::new(header_text(cell), cell.span)),
        );
        // Analysis columns go right before the Notes group
        let at = main.len() - 1;
        for (offset, label) in options.analysis_columns.iter().enumerate() {
            main.insert(at + offset, HeaderGroup::new(label.as_str(), 1));
        }

        let mut sub = vec![String::new(), options.row_label.clone()];
        if title2.cells.len() > 2 {
            sub.extend(
                title2.cells[1..title2.cells.len() - 1]
                    .iter()
                    .map(|cell| header_text(cell).to_string()),
            );
        }
        sub.extend(options.analysis_columns.iter().cloned());
        sub.push(options.notes_label.clone());

        let schema = HeaderSchema { main, sub };
        let declared = schema.declared_width();
        if declared != schema.width() {
            error!(
                declared,
                resolved = schema.width(),
                "header spans do not match sub headers"
            );
            return Err(ConversionError::StructuralMismatch {
                declared,
                resolved: schema.width(),
            });
        }

        debug!(
            width = schema.width(),
            groups = schema.main.len(),
            "resolved header schema"
        );
        Ok(schema)
    }

    /// Number of sheet columns
    pub fn width(&self) -> usize {
        self.sub.len()
    }

    /// Sum of the main header spans
    pub fn declared_width(&self) -> usize {
        self.main
            .iter()
            .fold(0usize, |total, g| total.saturating_add(g.span))
    }
}

fn missing_header(kind: &str) -> ConversionError {
    ConversionError::missing(format!("{} type=\"{}\"", EL_ROW, kind))
}

fn header_text(cell: &Cell) -> &str {
    cell.first_literal().map(str::trim).unwrap_or_default()
}

/// One converted data row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RenderedRow {
    pub id: Option<String>,
    /// Display strings, exactly one per schema column
    pub values: Vec<String>,
    /// Declared clause kind as written in the source
    pub kind: String,
    pub category: RowCategory,
    /// Clause-marker targets of every cell, in order
    pub clause_targets: Vec<String>,
    /// Compressed display of `clause_targets`
    pub clause_label: Option<String>,
    pub layout: RowLayout,
}

/// Result of converting one chart
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RenderedChart {
    pub title: String,
    pub subtitle: String,
    pub headers: HeaderSchema,
    pub rows: Vec<RenderedRow>,
    pub tally: ReferenceTally,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderedChart {
    /// Number of sheet columns
    pub fn width(&self) -> usize {
        self.headers.width()
    }

    /// Legend entries sorted by code
    pub fn legend(&self) -> Vec<(String, usize)> {
        self.tally.sorted()
    }

    /// Diagnostics as a check result
    pub fn check_result(&self) -> CheckResult {
        CheckResult::from_diagnostics(self.diagnostics.iter().cloned())
    }

    /// Whether any row had to be adjusted
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level >= DiagnosticLevel::Warning)
    }
}

/// Width correction applied to a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthDrift {
    Padded { from: usize, to: usize },
    Trimmed { from: usize, to: usize },
}

impl WidthDrift {
    /// Correction needed to bring `from` columns to `to`, if any
    pub fn between(from: usize, to: usize) -> Option<Self> {
        match from.cmp(&to) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(WidthDrift::Padded { from, to }),
            std::cmp::Ordering::Greater => Some(WidthDrift::Trimmed { from, to }),
        }
    }
}

/// Pad with blanks or trim so that `values` has exactly `width` entries
pub fn normalize_width(values: &mut Vec<String>, width: usize) -> Option<WidthDrift> {
    let drift = WidthDrift::between(values.len(), width)?;
    values.resize(width, String::new());
    Some(drift)
}

/// Converts a parsed chart into its rendered form
#[derive(Debug, Clone, Default)]
pub struct ChartConverter {
    options: ChartOptions,
}

impl ChartConverter {
    pub fn new(options: ChartOptions) -> Self {
        ChartConverter { options }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Parse and convert XML text
    pub fn convert_str(&self, input: &str) -> ConversionResult<RenderedChart> {
        let chart = read_chart(input)?;
        self.convert(&chart)
    }

    /// Convert a parsed chart
    pub fn convert(&self, chart: &Chart) -> ConversionResult<RenderedChart> {
        let headers = HeaderSchema::resolve(chart, &self.options)?;
        let width = headers.width();
        let interpreter =
            CellInterpreter::new().with_placeholder(&self.options.reference_placeholder);

        let mut tally = ReferenceTally::new();
        let mut diagnostics = Vec::new();
        let mut rows = Vec::new();
        let mut shapes = Vec::new();

        for (index, row) in chart.data_rows().enumerate() {
            let Some((notes, body)) = row.cells.split_last() else {
                debug!(row = row.label(), "skipping row without cells");
                diagnostics.push(
                    Diagnostic::info("row has no cells and was skipped")
                        .with_row(row.label())
                        .with_row_index(index + 1),
                );
                continue;
            };

            let body: Vec<CellContent> = body.iter().map(|c| interpreter.interpret(c)).collect();
            let notes = interpreter.interpret(notes);

            // `produced` counts the columns the row asks for; span padding
            // stops at the schema width
            let mut values = vec![String::new()];
            let mut produced = 1usize;
            for (content, cell) in body.iter().zip(&row.cells) {
                let span = cell.span.max(1);
                produced = produced.saturating_add(span);
                values.push(content.text.clone());
                let room = width.saturating_sub(values.len());
                values.extend(std::iter::repeat(String::new()).take((span - 1).min(room)));
            }
            let analysis = self.options.analysis_columns.len();
            produced = produced.saturating_add(analysis).saturating_add(1);
            values.extend(std::iter::repeat(String::new()).take(analysis));
            values.push(notes.text.clone());

            normalize_width(&mut values, width);
            if let Some(drift) = WidthDrift::between(produced, width) {
                diagnostics.push(drift_diagnostic(row, index + 1, drift));
            }

            let mut clause_targets = Vec::new();
            for content in body.iter().chain(std::iter::once(&notes)) {
                tally.extend(&content.codes);
                clause_targets.extend(content.clause_targets.iter().cloned());
            }

            let category = classify_row_kind(&row.kind);
            shapes.push(RowShape {
                spans: row.cells[..body.len()].iter().map(|c| c.span).collect(),
                ends_sentence: row.ends_sentence,
                ends_paragraph: row.ends_paragraph,
                category,
            });
            rows.push(RenderedRow {
                id: row.id.clone(),
                values,
                kind: row.kind.clone(),
                category,
                clause_label: clause_label(&clause_targets),
                clause_targets,
                layout: RowLayout::default(),
            });
        }

        for (row, layout) in rows.iter_mut().zip(resolve_layout(&shapes, width)) {
            row.layout = layout;
        }

        debug!(
            rows = rows.len(),
            codes = tally.len(),
            diagnostics = diagnostics.len(),
            "converted chart"
        );

        Ok(RenderedChart {
            title: self.options.title.clone(),
            subtitle: self.options.subtitle.clone(),
            headers,
            rows,
            tally,
            diagnostics,
        })
    }
}

fn drift_diagnostic(row: &Row, index: usize, drift: WidthDrift) -> Diagnostic {
    let message = match drift {
        WidthDrift::Padded { from, to } => {
            warn!(row = row.label(), from, to, "row padded to schema width");
            format!("row has {} columns, padded to {}", from, to)
        }
        WidthDrift::Trimmed { from, to } => {
            warn!(row = row.label(), from, to, "row trimmed to schema width");
            format!("row has {} columns, trimmed to {}", from, to)
        }
    };
    Diagnostic::warning(message)
        .with_row(row.label())
        .with_row_index(index)
        .with_suggestion("check the cols attributes of this row against the header rows")
}

/// Convert a parsed chart with default options
pub fn convert_chart(chart: &Chart) -> ConversionResult<RenderedChart> {
    ChartConverter::default().convert(chart)
}
