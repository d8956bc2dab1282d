//! Typed chart model
//!
//! Built once from the element tree and never mutated afterwards. Text is
//! kept as it appears in the source; trimming is the interpreter's job.

use tracing::debug;

use super::xml::XmlElement;
use crate::data::constants::*;
use crate::utils::error::{ConversionError, ConversionResult};

/// One child of a cell's `main` element
#[derive(Debug, Clone, PartialEq)]
pub enum CellChild {
    Word(String),
    Literal {
        text: String,
        no_space_before: bool,
        no_space_after: bool,
    },
    Reference(String),
    ClauseMarker {
        target: Option<String>,
        text: String,
    },
    RowNumber(String),
    MoveMarker(String),
    Note(String),
}

impl CellChild {
    /// Plain literal without spacing flags
    pub fn lit(text: impl Into<String>) -> Self {
        CellChild::Literal {
            text: text.into(),
            no_space_before: false,
            no_space_after: false,
        }
    }

    pub fn clause(target: impl Into<String>) -> Self {
        let target = target.into();
        CellChild::ClauseMarker {
            text: target.clone(),
            target: Some(target),
        }
    }
}

/// Special role of a cell, decided by its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    RowNumber,
    MoveMarker,
    Note,
    Content,
}

/// Represents a single chart cell with its span
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Number of display columns this cell occupies (>= 1)
    pub span: usize,
    /// Children of `main` in document order
    pub children: Vec<CellChild>,
    /// Gloss strings parallel to the words
    pub glosses: Vec<String>,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            span: 1,
            children: Vec::new(),
            glosses: Vec::new(),
        }
    }
}

impl Cell {
    /// Create a content cell spanning one column
    pub fn new(children: Vec<CellChild>) -> Self {
        Cell {
            children,
            ..Default::default()
        }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Cell::default()
    }

    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }

    pub fn with_glosses<I, S>(mut self, glosses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.glosses = glosses.into_iter().map(Into::into).collect();
        self
    }

    /// Row number wins over move marker, which wins over note
    pub fn role(&self) -> CellRole {
        let has = |pred: fn(&CellChild) -> bool| self.children.iter().any(pred);
        if has(|c| matches!(c, CellChild::RowNumber(_))) {
            CellRole::RowNumber
        } else if has(|c| matches!(c, CellChild::MoveMarker(_))) {
            CellRole::MoveMarker
        } else if has(|c| matches!(c, CellChild::Note(_))) {
            CellRole::Note
        } else {
            CellRole::Content
        }
    }

    /// Text of the first literal child, used for header cells
    pub fn first_literal(&self) -> Option<&str> {
        self.children.iter().find_map(|c| match c {
            CellChild::Literal { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Role of a row within the chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRole {
    /// Column group titles with spans
    Title1,
    /// Sub-column titles
    Title2,
    /// Data row
    Normal,
    Other(String),
}

impl RowRole {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(ROW_TYPE_TITLE1) => RowRole::Title1,
            Some(ROW_TYPE_TITLE2) => RowRole::Title2,
            Some(ROW_TYPE_NORMAL) => RowRole::Normal,
            Some(other) => RowRole::Other(other.to_string()),
            None => RowRole::Other(String::new()),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, RowRole::Title1 | RowRole::Title2)
    }
}

/// Represents a chart row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub role: RowRole,
    /// Stable identifier, also the target of clause markers
    pub id: Option<String>,
    /// Declared clause kind, classified later
    pub kind: String,
    pub ends_sentence: bool,
    pub ends_paragraph: bool,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(role: RowRole, cells: Vec<Cell>) -> Self {
        Row {
            role,
            id: None,
            kind: String::new(),
            ends_sentence: false,
            ends_paragraph: false,
            cells,
        }
    }

    /// Create a data row
    pub fn normal(id: impl Into<String>, cells: Vec<Cell>) -> Self {
        Row {
            id: Some(id.into()),
            ..Row::new(RowRole::Normal, cells)
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_breaks(mut self, ends_sentence: bool, ends_paragraph: bool) -> Self {
        self.ends_sentence = ends_sentence;
        self.ends_paragraph = ends_paragraph;
        self
    }

    /// Identifier for messages
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("?")
    }
}

/// A whole chart in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chart {
    pub rows: Vec<Row>,
}

impl Chart {
    pub fn new(rows: Vec<Row>) -> Self {
        Chart { rows }
    }

    /// First row with the given role
    pub fn header(&self, role: &RowRole) -> Option<&Row> {
        self.rows.iter().find(|r| &r.role == role)
    }

    /// Data rows in document order
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.role == RowRole::Normal)
    }

    /// Build the chart from a parsed document
    ///
    /// The `chart` element may be the root itself or one of its children.
    pub fn from_document(root: &XmlElement) -> ConversionResult<Self> {
        let chart = if root.name == EL_CHART {
            root
        } else {
            root.child(EL_CHART)
                .ok_or_else(|| ConversionError::missing(EL_CHART))?
        };

        let rows: Vec<Row> = chart.children_named(EL_ROW).map(read_row).collect();
        debug!(rows = rows.len(), "read chart rows");
        Ok(Chart { rows })
    }
}

fn read_row(el: &XmlElement) -> Row {
    Row {
        role: RowRole::from_attr(el.attr(ATTR_TYPE)),
        id: el.attr(ATTR_ID).map(str::to_string),
        kind: el.attr(ATTR_CLAUSE_TYPE).unwrap_or_default().to_string(),
        ends_sentence: flag(el.attr(ATTR_END_SENT)),
        ends_paragraph: flag(el.attr(ATTR_END_PARA)),
        cells: el.children_named(EL_CELL).map(read_cell).collect(),
    }
}

fn read_cell(el: &XmlElement) -> Cell {
    let span = parse_span(el.attr(ATTR_COLS));

    let Some(main) = el.child(EL_MAIN) else {
        return Cell::empty().with_span(span);
    };

    let children = main.elements().filter_map(read_child).collect();
    let glosses = el
        .child(EL_GLOSSES)
        .map(|g| g.children_named(EL_GLOSS).map(|g| g.text()).collect())
        .unwrap_or_default();

    Cell {
        span,
        children,
        glosses,
    }
}

fn read_child(el: &XmlElement) -> Option<CellChild> {
    let child = match el.name.as_str() {
        EL_WORD => CellChild::Word(el.text()),
        EL_LIT => CellChild::Literal {
            text: el.text(),
            no_space_before: flag(el.attr(ATTR_NO_SPACE_BEFORE)),
            no_space_after: flag(el.attr(ATTR_NO_SPACE_AFTER)),
        },
        EL_LIST_REF => CellChild::Reference(el.text()),
        EL_CLAUSE_MKR => CellChild::ClauseMarker {
            target: el
                .attr(ATTR_TARGET)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            text: el.text(),
        },
        EL_ROWNUM => CellChild::RowNumber(el.text()),
        EL_MOVE_MKR => CellChild::MoveMarker(el.text()),
        EL_NOTE => CellChild::Note(el.text()),
        _ => return None,
    };
    Some(child)
}

/// Boolean attribute: `true`, `1` or `yes`
pub fn flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}

/// Column span attribute; missing or unparseable values count as one column
pub fn parse_span(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}
