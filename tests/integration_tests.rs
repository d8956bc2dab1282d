//! Integration tests for whole-chart conversion

use textchart::{
    convert_chart_xml, convert_chart_xml_default, diagnostics::DiagnosticLevel, export,
    BreakEmphasis, ChartOptions, ConversionError, RenderedChart, RowCategory,
};

const STORY: &str = include_str!("fixtures/story.xml");

fn story() -> RenderedChart {
    convert_chart_xml_default(STORY).expect("fixture converts")
}

fn row<'a>(chart: &'a RenderedChart, id: &str) -> &'a textchart::RenderedRow {
    chart
        .rows
        .iter()
        .find(|r| r.id.as_deref() == Some(id))
        .unwrap_or_else(|| panic!("row {} missing", id))
}

// ============================================================================
// Header Schema
// ============================================================================

mod headers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_main_headers() {
        let chart = story();
        let titles: Vec<(&str, usize)> = chart
            .headers
            .main
            .iter()
            .map(|g| (g.title.as_str(), g.span))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("", 1),
                ("Row", 1),
                ("Pre-nuclear", 2),
                ("Nucleus", 2),
                ("Post-nuclear", 1),
                ("Add Analysis Columns Here", 1),
                ("Notes", 1),
            ]
        );
    }

    #[test]
    fn test_sub_headers() {
        let chart = story();
        assert_eq!(
            chart.headers.sub,
            vec![
                "",
                "Row",
                "Outer",
                "Inner",
                "Subject",
                "Verb",
                "Post",
                "Add Analysis Columns Here",
                "Notes",
            ]
        );
        assert_eq!(chart.width(), 9);
    }

    #[test]
    fn test_several_analysis_columns() {
        let options = ChartOptions::default().with_analysis_columns(["Participants", "Tense"]);
        let chart = convert_chart_xml(STORY, &options).unwrap();
        assert_eq!(chart.width(), 10);
        assert_eq!(chart.headers.sub[7..], ["Participants", "Tense", "Notes"]);
        assert_eq!(row(&chart, "1b").values[9], "quote follows");
        assert!(chart
            .diagnostics
            .iter()
            .all(|d| d.level != DiagnosticLevel::Warning || d.row_id.as_deref() == Some("3")));
    }

    #[test]
    fn test_span_mismatch_is_fatal() {
        let broken = STORY.replacen(
            r#"<cell cols="2"><main><lit>Nucleus"#,
            r#"<cell><main><lit>Nucleus"#,
            1,
        );
        let err = convert_chart_xml_default(&broken).unwrap_err();
        assert_eq!(
            err,
            ConversionError::StructuralMismatch {
                declared: 8,
                resolved: 9
            }
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_oversized_header_span_is_a_mismatch() {
        let broken = STORY.replacen(
            r#"<cell cols="2"><main><lit>Nucleus"#,
            r#"<cell cols="18446744073709551615"><main><lit>Nucleus"#,
            1,
        );
        let err = convert_chart_xml_default(&broken).unwrap_err();
        assert_eq!(
            err,
            ConversionError::StructuralMismatch {
                declared: usize::MAX,
                resolved: 9
            }
        );
    }

    #[test]
    fn test_missing_title2() {
        let start = STORY.find(r#"<row type="title2">"#).unwrap();
        let end = STORY[start..].find("</row>").unwrap() + start + "</row>".len();
        let mut broken = STORY.to_string();
        broken.replace_range(start..end, "");
        let err = convert_chart_xml_default(&broken).unwrap_err();
        assert!(matches!(err, ConversionError::MissingElement { .. }));
    }
}

// ============================================================================
// Row Content
// ============================================================================

mod rows {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matched_glosses_and_codes() {
        let chart = story();
        assert_eq!(
            row(&chart, "1a").values,
            vec![
                "",
                "1a",
                "",
                "Once (once)",
                "hare (hare) (H)",
                "ran (run.PST).",
                "",
                "",
                "",
            ]
        );
    }

    #[test]
    fn test_wide_cell_and_clause_range() {
        let chart = story();
        let r = row(&chart, "1b");
        assert_eq!(
            r.values,
            vec![
                "",
                "1b",
                "then [2a-2b]",
                "",
                "",
                "said (say.PST) (H)",
                "",
                "",
                "quote follows",
            ]
        );
        assert_eq!(r.clause_targets, vec!["2a", "2b"]);
        assert_eq!(r.clause_label.as_deref(), Some("[2a-2b]"));
    }

    #[test]
    fn test_mismatched_glosses_and_placeholder() {
        let chart = story();
        let values = &row(&chart, "2a").values;
        assert_eq!(values[4], "dog (dog PL)");
        assert_eq!(values[5], "barked (?)");
    }

    #[test]
    fn test_entities_resolved() {
        let chart = story();
        assert_eq!(row(&chart, "3").values[2], "caf\u{e9}& bar");
    }

    #[test]
    fn test_every_row_matches_schema_width() {
        let chart = story();
        for r in &chart.rows {
            assert_eq!(r.values.len(), chart.width(), "row {:?}", r.id);
        }
    }

    #[test]
    fn test_row_without_cells_is_reported() {
        let chart = story();
        assert!(chart.rows.iter().all(|r| r.id.as_deref() != Some("2b")));
        let skipped = chart
            .diagnostics
            .iter()
            .find(|d| d.row_id.as_deref() == Some("2b"))
            .unwrap();
        assert_eq!(skipped.level, DiagnosticLevel::Info);
    }

    #[test]
    fn test_short_row_padded_with_warning() {
        let chart = story();
        let padded = chart
            .diagnostics
            .iter()
            .find(|d| d.row_id.as_deref() == Some("3"))
            .unwrap();
        assert_eq!(padded.level, DiagnosticLevel::Warning);
        assert_eq!(padded.message, "row has 5 columns, padded to 9");

        let result = chart.check_result();
        assert_eq!(result.warnings, 1);
        assert_eq!(result.infos, 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_oversized_cell_span_is_trimmed() {
        for cols in ["18446744073709551615", "300000000"] {
            let wide = STORY.replacen(
                "<cell cols=\"2\">\n",
                &format!("<cell cols=\"{}\">\n", cols),
                1,
            );
            let chart = convert_chart_xml_default(&wide).unwrap();
            let r = row(&chart, "1b");
            assert_eq!(r.values.len(), 9);
            assert_eq!(r.values[..3], ["", "1b", "then [2a-2b]"]);
            assert!(r.values[3..].iter().all(String::is_empty));
            assert_eq!(r.layout.merges.len(), 1);
            assert_eq!((r.layout.merges[0].start_col, r.layout.merges[0].end_col), (3, 9));

            let trimmed = chart
                .diagnostics
                .iter()
                .find(|d| d.row_id.as_deref() == Some("1b"))
                .unwrap();
            assert_eq!(trimmed.level, DiagnosticLevel::Warning);
            assert!(trimmed.message.ends_with("trimmed to 9"), "{}", cols);
        }
    }

    #[test]
    fn test_custom_placeholder() {
        let options = ChartOptions::default().with_placeholder("none");
        let chart = convert_chart_xml(STORY, &options).unwrap();
        assert_eq!(row(&chart, "2a").values[5], "barked (none)");
        assert_eq!(chart.tally.count("none"), 1);
        assert_eq!(chart.tally.count("?"), 0);
    }
}

// ============================================================================
// Layout
// ============================================================================

mod layout {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sheet_rows_are_consecutive() {
        let chart = story();
        let sheet_rows: Vec<u32> = chart.rows.iter().map(|r| r.layout.sheet_row).collect();
        assert_eq!(sheet_rows, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_merges() {
        let chart = story();
        let merges = &row(&chart, "1b").layout.merges;
        assert_eq!(merges.len(), 1);
        assert_eq!((merges[0].start_col, merges[0].end_col), (3, 4));
        assert!(row(&chart, "1a").layout.merges.is_empty());
    }

    #[test]
    fn test_break_emphasis() {
        let chart = story();
        assert_eq!(row(&chart, "1a").layout.emphasis, BreakEmphasis::Secondary);
        assert_eq!(row(&chart, "1b").layout.emphasis, BreakEmphasis::Strong);
        assert_eq!(row(&chart, "3").layout.emphasis, BreakEmphasis::None);
    }

    #[test]
    fn test_categories() {
        let chart = story();
        let categories: Vec<RowCategory> = chart.rows.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                RowCategory::Plain,
                RowCategory::Speech,
                RowCategory::Subordinate,
                RowCategory::Performed,
            ]
        );
        assert_eq!(row(&chart, "1a").layout.shading, None);
        assert_eq!(
            row(&chart, "2a").layout.shading,
            Some(RowCategory::Subordinate)
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        assert_eq!(story(), story());
    }
}

// ============================================================================
// Legend
// ============================================================================

mod legend {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tally_sorted_by_code() {
        let chart = story();
        assert_eq!(
            chart.legend(),
            vec![("?".to_string(), 1), ("H".to_string(), 2)]
        );
        assert_eq!(chart.tally.total(), 3);
    }
}

// ============================================================================
// Source Errors
// ============================================================================

mod source {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_malformed_xml_has_location() {
        let err = convert_chart_xml_default("<chart>\n<row>\n</chart>").unwrap_err();
        match err {
            ConversionError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_chart_as_root() {
        let start = STORY.find("<chart>").unwrap();
        let end = STORY.find("</chart>").unwrap() + "</chart>".len();
        let chart = convert_chart_xml_default(&STORY[start..end]).unwrap();
        assert_eq!(chart, story());
    }

    #[test]
    fn test_missing_chart_element() {
        let err = convert_chart_xml_default("<document><other/></document>").unwrap_err();
        assert_eq!(err.to_string(), "Missing element: <chart>");
    }
}

// ============================================================================
// Exports
// ============================================================================

mod exports {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_export() {
        let text = export::to_text(&story());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[1],
            "\tRow\tOuter\tInner\tSubject\tVerb\tPost\tAdd Analysis Columns Here\tNotes"
        );
        assert_eq!(
            lines[3],
            "\t1b\tthen [2a-2b]\t\t\tsaid (say.PST) (H)\t\t\tquote follows"
        );
        assert!(text.ends_with("Code\tCount\n?\t1\nH\t2\n"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_export() {
        let json = export::to_json(&story()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"][1]["category"], "speech");
        assert_eq!(value["rows"][1]["layout"]["emphasis"], "strong");
        assert_eq!(value["rows"][1]["layout"]["merges"][0]["start_col"], 3);
        assert_eq!(value["diagnostics"][1]["level"], "warning");
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_workbook_export() {
        let bytes = textchart::workbook::workbook_to_bytes(&story()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
