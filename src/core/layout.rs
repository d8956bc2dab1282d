//! Row layout resolution
//!
//! Computes, for every data row, the sheet positions a renderer needs:
//! which columns to merge, how heavy the row's bottom edge is, and which
//! background to use. Coordinates are 1-based and anchored at the fixed
//! layout origin, so resolving the same rows twice yields the same layout.

use crate::core::classify::RowCategory;
use crate::data::constants::{FIRST_CHART_COLUMN, FIRST_DATA_ROW};

/// Weight of the border under a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum BreakEmphasis {
    #[default]
    None,
    /// After a sentence-ending row
    Secondary,
    /// After a paragraph-ending row
    Strong,
}

impl BreakEmphasis {
    pub fn from_flags(ends_sentence: bool, ends_paragraph: bool) -> Self {
        if ends_paragraph {
            BreakEmphasis::Strong
        } else if ends_sentence {
            BreakEmphasis::Secondary
        } else {
            BreakEmphasis::None
        }
    }
}

/// Inclusive, 1-based column range to merge on one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MergeRange {
    pub start_col: u16,
    pub end_col: u16,
}

impl MergeRange {
    pub fn width(&self) -> u16 {
        self.end_col - self.start_col + 1
    }
}

/// What the resolver needs to know about a data row
#[derive(Debug, Clone, PartialEq)]
pub struct RowShape {
    /// Spans of the body cells, left to right, starting at the first chart column
    pub spans: Vec<usize>,
    pub ends_sentence: bool,
    pub ends_paragraph: bool,
    pub category: RowCategory,
}

/// Layout instructions for one data row
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RowLayout {
    /// Sheet row (1-based)
    pub sheet_row: u32,
    pub merges: Vec<MergeRange>,
    pub emphasis: BreakEmphasis,
    /// Category to shade with; `None` for plain rows
    pub shading: Option<RowCategory>,
}

/// Resolve merges for one row against a schema of `width` columns
pub fn resolve_merges(spans: &[usize], width: usize) -> Vec<MergeRange> {
    let mut merges = Vec::new();
    let mut cursor = FIRST_CHART_COLUMN as usize;

    for &span in spans {
        let span = span.max(1);
        if span > 1 && cursor <= width {
            let end = cursor.saturating_add(span - 1).min(width);
            if end > cursor {
                merges.push(MergeRange {
                    start_col: cursor as u16,
                    end_col: end as u16,
                });
            }
        }
        cursor = cursor.saturating_add(span);
    }

    merges
}

/// Resolve the layout of every data row, in order
pub fn resolve_layout(rows: &[RowShape], width: usize) -> Vec<RowLayout> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| RowLayout {
            sheet_row: FIRST_DATA_ROW + i as u32,
            merges: resolve_merges(&row.spans, width),
            emphasis: BreakEmphasis::from_flags(row.ends_sentence, row.ends_paragraph),
            shading: Some(row.category).filter(|c| *c != RowCategory::Plain),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(spans: &[usize]) -> RowShape {
        RowShape {
            spans: spans.to_vec(),
            ends_sentence: false,
            ends_paragraph: false,
            category: RowCategory::Plain,
        }
    }

    #[test]
    fn test_merges_follow_cursor() {
        // Columns: 1 blank, 2 row number, 3-4 wide cell, 5 single, 6-8 wide cell
        let merges = resolve_merges(&[1, 2, 1, 3], 10);
        assert_eq!(
            merges,
            vec![
                MergeRange {
                    start_col: 3,
                    end_col: 4
                },
                MergeRange {
                    start_col: 6,
                    end_col: 8
                },
            ]
        );
        assert_eq!(merges[1].width(), 3);
    }

    #[test]
    fn test_merges_clipped_to_width() {
        let merges = resolve_merges(&[1, 4], 5);
        assert_eq!(
            merges,
            vec![MergeRange {
                start_col: 3,
                end_col: 5
            }]
        );
        // Starts on the last column: nothing left to merge
        assert!(resolve_merges(&[1, 1, 1, 2], 5).is_empty());
    }

    #[test]
    fn test_oversized_span_clipped() {
        let merges = resolve_merges(&[1, usize::MAX, 2], 6);
        assert_eq!(
            merges,
            vec![MergeRange {
                start_col: 3,
                end_col: 6
            }]
        );
    }

    #[test]
    fn test_break_emphasis() {
        assert_eq!(BreakEmphasis::from_flags(false, false), BreakEmphasis::None);
        assert_eq!(BreakEmphasis::from_flags(true, false), BreakEmphasis::Secondary);
        assert_eq!(BreakEmphasis::from_flags(true, true), BreakEmphasis::Strong);
        assert_eq!(BreakEmphasis::from_flags(false, true), BreakEmphasis::Strong);
    }

    #[test]
    fn test_rows_and_shading() {
        let mut speech = shape(&[1, 1]);
        speech.category = RowCategory::Speech;
        speech.ends_paragraph = true;

        let layout = resolve_layout(&[shape(&[1, 2]), speech], 6);
        assert_eq!(layout[0].sheet_row, FIRST_DATA_ROW);
        assert_eq!(layout[1].sheet_row, FIRST_DATA_ROW + 1);
        assert_eq!(layout[0].shading, None);
        assert_eq!(layout[1].shading, Some(RowCategory::Speech));
        assert_eq!(layout[1].emphasis, BreakEmphasis::Strong);
    }

    #[test]
    fn test_resolution_is_stable() {
        let rows = vec![shape(&[1, 3, 2]), shape(&[2, 2])];
        assert_eq!(resolve_layout(&rows, 9), resolve_layout(&rows, 9));
    }
}
