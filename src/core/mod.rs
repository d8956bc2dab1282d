//! Core conversion modules
//!
//! This module contains the chart conversion pipeline:
//! - `source`: XML reading into a typed chart model
//! - `cell`: cell content interpretation (tokens, pairing, spacing)
//! - `clause`: clause target compression
//! - `classify`: row kind classification
//! - `layout`: merge ranges, break emphasis and shading per row
//! - `convert`: header schema and whole-chart orchestration

pub mod cell;
pub mod classify;
pub mod clause;
pub mod convert;
pub mod layout;
pub mod options;
pub mod source;
pub mod tally;

// Re-export main types and functions
pub use cell::{interpret_cell, CellContent, CellInterpreter, Token, TokenKind};
pub use classify::{classify_row_kind, RowCategory};
pub use clause::{clause_label, compress_targets, ClauseId};
pub use convert::{
    convert_chart, normalize_width, ChartConverter, HeaderGroup, HeaderSchema, RenderedChart,
    RenderedRow, WidthDrift,
};
pub use layout::{resolve_layout, resolve_merges, BreakEmphasis, MergeRange, RowLayout, RowShape};
pub use options::ChartOptions;
pub use source::{read_chart, Cell, CellChild, CellRole, Chart, Row, RowRole};
pub use tally::ReferenceTally;
