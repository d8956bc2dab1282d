//! Row classification
//!
//! A row's declared clause kind is free text in the source. It is mapped to
//! one of four layout categories by an ordered rule table: the first rule
//! whose predicate accepts the (trimmed, lowercased) kind wins.

use crate::data::constants::{CATEGORY_KEYS, PERFORMED_FILL, SPEECH_FILL, SUBORDINATE_FILL};

/// Layout category of a data row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum RowCategory {
    #[default]
    Plain,
    Subordinate,
    Speech,
    Performed,
}

impl RowCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowCategory::Plain => "plain",
            RowCategory::Subordinate => "subordinate",
            RowCategory::Speech => "speech",
            RowCategory::Performed => "performed",
        }
    }

    /// Background fill for the category; plain rows are not shaded
    pub fn fill(&self) -> Option<u32> {
        match self {
            RowCategory::Plain => None,
            RowCategory::Subordinate => Some(SUBORDINATE_FILL),
            RowCategory::Speech => Some(SPEECH_FILL),
            RowCategory::Performed => Some(PERFORMED_FILL),
        }
    }
}

/// A classification rule
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub category: RowCategory,
}

fn contains_any(kind: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| kind.contains(*n))
}

fn is_subordinate(kind: &str) -> bool {
    contains_any(kind, &["depend", "subord"])
}

fn is_speech(kind: &str) -> bool {
    contains_any(kind, &["speech", "quot", "report"])
}

fn is_performed(kind: &str) -> bool {
    contains_any(kind, &["song", "poem", "perform"])
}

/// Rules in priority order
pub static RULES: &[Rule] = &[
    Rule {
        name: "subordinate",
        matches: is_subordinate,
        category: RowCategory::Subordinate,
    },
    Rule {
        name: "speech",
        matches: is_speech,
        category: RowCategory::Speech,
    },
    Rule {
        name: "performed",
        matches: is_performed,
        category: RowCategory::Performed,
    },
];

/// Map a declared row kind to its category; total and pure
pub fn classify_row_kind(kind: &str) -> RowCategory {
    let kind = kind.trim().to_lowercase();
    if let Some(category) = CATEGORY_KEYS.get(kind.as_str()) {
        return *category;
    }
    RULES
        .iter()
        .find(|rule| (rule.matches)(&kind))
        .map(|rule| rule.category)
        .unwrap_or_default()
}
