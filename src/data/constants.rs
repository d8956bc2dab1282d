//! Constants and mapping tables for chart conversion
//!
//! This module contains:
//! - Source document element and attribute names
//! - Default labels for the generated sheet
//! - Fixed layout origin of the generated sheet
//! - Canonical row kind keys and shading colours

use phf::phf_map;

use crate::core::classify::RowCategory;

// ============================================================================
// Source Vocabulary
// ============================================================================

pub const EL_CHART: &str = "chart";
pub const EL_ROW: &str = "row";
pub const EL_CELL: &str = "cell";
pub const EL_MAIN: &str = "main";
pub const EL_GLOSSES: &str = "glosses";
pub const EL_GLOSS: &str = "gloss";
pub const EL_WORD: &str = "word";
pub const EL_LIT: &str = "lit";
pub const EL_LIST_REF: &str = "listRef";
pub const EL_CLAUSE_MKR: &str = "clauseMkr";
pub const EL_ROWNUM: &str = "rownum";
pub const EL_MOVE_MKR: &str = "moveMkr";
pub const EL_NOTE: &str = "note";

pub const ATTR_TYPE: &str = "type";
pub const ATTR_ID: &str = "id";
pub const ATTR_COLS: &str = "cols";
pub const ATTR_CLAUSE_TYPE: &str = "clauseType";
pub const ATTR_END_SENT: &str = "endSent";
pub const ATTR_END_PARA: &str = "endPara";
pub const ATTR_NO_SPACE_BEFORE: &str = "noSpaceBefore";
pub const ATTR_NO_SPACE_AFTER: &str = "noSpaceAfter";
pub const ATTR_TARGET: &str = "target";

pub const ROW_TYPE_TITLE1: &str = "title1";
pub const ROW_TYPE_TITLE2: &str = "title2";
pub const ROW_TYPE_NORMAL: &str = "normal";

// ============================================================================
// Labels
// ============================================================================

/// Substitute for a reference code with no text
pub const REFERENCE_PLACEHOLDER: &str = "?";

pub const ROW_LABEL: &str = "Row";
pub const NOTES_LABEL: &str = "Notes";
pub const ANALYSIS_LABEL: &str = "Add Analysis Columns Here";
pub const DEFAULT_TITLE: &str = "Story Title";
pub const DEFAULT_SUBTITLE: &str = "Text Chart";
pub const CHART_SHEET: &str = "Chart";
pub const LEGEND_SHEET: &str = "Legend";
pub const LEGEND_CODE_LABEL: &str = "Code";
pub const LEGEND_COUNT_LABEL: &str = "Count";

// ============================================================================
// Layout Origin (1-based sheet coordinates)
// ============================================================================

pub const TITLE_ROW: u32 = 2;
pub const SUBTITLE_ROW: u32 = 3;
pub const MAIN_HEADER_ROW: u32 = 5;
pub const SUB_HEADER_ROW: u32 = 6;
pub const FIRST_DATA_ROW: u32 = 7;

/// First column of the chart proper; column 1 is the leading blank column
pub const FIRST_CHART_COLUMN: u16 = 2;

/// Extra characters added to the longest text of a column
pub const COLUMN_PADDING: usize = 2;
pub const LEGEND_CODE_WIDTH: f64 = 12.0;
pub const LEGEND_COUNT_WIDTH: f64 = 8.0;

// ============================================================================
// Row Kinds
// ============================================================================

/// Exact (lowercased) row kind keys
pub static CATEGORY_KEYS: phf::Map<&'static str, RowCategory> = phf_map! {
    "normal" => RowCategory::Plain,
    "plain" => RowCategory::Plain,
    "dependent" => RowCategory::Subordinate,
    "subordinate" => RowCategory::Subordinate,
    "speech" => RowCategory::Speech,
    "song" => RowCategory::Performed,
    "performed" => RowCategory::Performed,
};

/// Background fill (RGB) per shaded category
pub const SUBORDINATE_FILL: u32 = 0xDDEBF7;
pub const SPEECH_FILL: u32 = 0xFFF2CC;
pub const PERFORMED_FILL: u32 = 0xE2EFDA;
