//! Conversion options

use crate::data::constants::{
    ANALYSIS_LABEL, DEFAULT_SUBTITLE, DEFAULT_TITLE, NOTES_LABEL, REFERENCE_PLACEHOLDER, ROW_LABEL,
};

/// Options for chart conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Sheet title (row 2)
    pub title: String,
    /// Sheet subtitle (row 3)
    pub subtitle: String,
    /// Empty columns inserted before Notes for the analyst to fill in
    pub analysis_columns: Vec<String>,
    /// Shown (and counted) for reference codes with no text
    pub reference_placeholder: String,
    /// Sub-header of the row number column
    pub row_label: String,
    /// Header of the last column
    pub notes_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            analysis_columns: vec![ANALYSIS_LABEL.to_string()],
            reference_placeholder: REFERENCE_PLACEHOLDER.to_string(),
            row_label: ROW_LABEL.to_string(),
            notes_label: NOTES_LABEL.to_string(),
        }
    }
}

impl ChartOptions {
    /// Chart columns only, without analysis placeholders
    pub fn minimal() -> Self {
        Self {
            analysis_columns: Vec::new(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_analysis_columns<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.analysis_columns = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.reference_placeholder = placeholder.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ChartOptions::default();
        assert_eq!(opts.analysis_columns, vec![ANALYSIS_LABEL.to_string()]);
        assert_eq!(opts.reference_placeholder, "?");
        assert_eq!(opts.notes_label, "Notes");
    }

    #[test]
    fn test_minimal_preset() {
        let opts = ChartOptions::minimal();
        assert!(opts.analysis_columns.is_empty());
        assert_eq!(opts.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_builders() {
        let opts = ChartOptions::default()
            .with_title("The Hare")
            .with_analysis_columns(["Participants", "Tense"])
            .with_placeholder("-");
        assert_eq!(opts.title, "The Hare");
        assert_eq!(opts.analysis_columns.len(), 2);
        assert_eq!(opts.reference_placeholder, "-");
    }
}
