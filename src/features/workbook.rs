//! Workbook rendering
//!
//! Writes a [`RenderedChart`] as an `.xlsx` workbook with `rust_xlsxwriter`:
//!
//! ```text
//! row 1   (blank)
//! row 2   title, merged B..last
//! row 3   subtitle, merged B..last
//! row 4   (blank)
//! row 5   main headers, merged across their spans; Notes spans rows 5-6
//! row 6   sub headers, auto-filter anchor
//! row 7.. data rows
//! ```
//!
//! A thick box surrounds rows 5..last and columns B..last. A second sheet,
//! `Legend`, lists the reference codes with their counts.
//!
//! All coordinates in this module are 1-based like the rest of the crate and
//! converted to the writer's 0-based cells at the last moment.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, info};

use crate::core::convert::{RenderedChart, RenderedRow};
use crate::core::layout::BreakEmphasis;
use crate::data::constants::{
    CHART_SHEET, COLUMN_PADDING, FIRST_CHART_COLUMN, LEGEND_CODE_LABEL, LEGEND_CODE_WIDTH,
    LEGEND_COUNT_LABEL, LEGEND_COUNT_WIDTH, LEGEND_SHEET, MAIN_HEADER_ROW, SUBTITLE_ROW,
    SUB_HEADER_ROW, TITLE_ROW,
};
use crate::utils::error::{ConversionError, ConversionResult};

/// Outline of the thick box around the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub top: u32,
    pub bottom: u32,
    pub left: u16,
    pub right: u16,
}

impl Frame {
    /// Fails when the chart has more columns than a sheet can address
    pub fn of(chart: &RenderedChart) -> ConversionResult<Self> {
        let bottom = chart
            .rows
            .last()
            .map(|r| r.layout.sheet_row)
            .unwrap_or(SUB_HEADER_ROW);
        let right = u16::try_from(chart.width()).map_err(|_| too_wide(chart.width()))?;
        Ok(Frame {
            top: MAIN_HEADER_ROW,
            bottom,
            left: FIRST_CHART_COLUMN,
            right,
        })
    }

    /// Add the thick edges that fall on the given cell range
    fn apply(&self, mut format: Format, rows: (u32, u32), cols: (u16, u16)) -> Format {
        let inside_rows = rows.0 >= self.top && rows.1 <= self.bottom;
        let inside_cols = cols.0 >= self.left && cols.1 <= self.right;

        if inside_cols && rows.0 == self.top {
            format = format.set_border_top(FormatBorder::Thick);
        }
        if inside_cols && rows.1 == self.bottom {
            format = format.set_border_bottom(FormatBorder::Thick);
        }
        if inside_rows && cols.0 == self.left {
            format = format.set_border_left(FormatBorder::Thick);
        }
        if inside_rows && cols.1 == self.right {
            format = format.set_border_right(FormatBorder::Thick);
        }
        format
    }
}

fn too_wide(columns: usize) -> ConversionError {
    ConversionError::render(format!("{} columns do not fit in a worksheet", columns))
}

/// Bottom border drawn under a data row
pub fn emphasis_border(emphasis: BreakEmphasis) -> FormatBorder {
    match emphasis {
        BreakEmphasis::None => FormatBorder::None,
        BreakEmphasis::Secondary => FormatBorder::Dashed,
        BreakEmphasis::Strong => FormatBorder::Medium,
    }
}

/// Column widths, index 0 being column A
///
/// Each column is as wide as its longest unmerged text plus padding. Merged
/// ranges (titles, grouped headers, multi-column cells) do not count.
pub fn column_widths(chart: &RenderedChart) -> Vec<f64> {
    let width = chart.width();
    let mut longest = vec![0usize; width];
    let mut measure = |col: usize, text: &str| {
        if let Some(slot) = longest.get_mut(col) {
            *slot = (*slot).max(text.chars().count());
        }
    };

    let mut cursor = 0;
    for group in &chart.headers.main {
        if group.span == 1 && cursor < width.saturating_sub(1) {
            measure(cursor, &group.title);
        }
        cursor = cursor.saturating_add(group.span);
    }
    for (col, label) in chart.headers.sub.iter().enumerate().take(width.saturating_sub(1)) {
        measure(col, label);
    }

    for row in &chart.rows {
        for (col, value) in row.values.iter().enumerate() {
            let one_based = col + 1;
            let merged = row.layout.merges.iter().any(|m| {
                one_based >= usize::from(m.start_col) && one_based <= usize::from(m.end_col)
            });
            if !merged {
                measure(col, value);
            }
        }
    }

    longest
        .into_iter()
        .map(|len| (len + COLUMN_PADDING) as f64)
        .collect()
}

/// Build the whole workbook in memory
pub fn build_workbook(chart: &RenderedChart) -> ConversionResult<Workbook> {
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(CHART_SHEET)?;
        write_chart_sheet(sheet, chart)?;
    }

    {
        let legend = workbook.add_worksheet();
        legend.set_name(LEGEND_SHEET)?;
        write_legend_sheet(legend, &chart.legend())?;
    }

    Ok(workbook)
}

/// Render `chart` and save it to `path`
pub fn write_workbook(chart: &RenderedChart, path: impl AsRef<Path>) -> ConversionResult<()> {
    let path = path.as_ref();
    let mut workbook = build_workbook(chart)?;
    workbook.save(path)?;
    info!(path = %path.display(), rows = chart.rows.len(), "wrote workbook");
    Ok(())
}

/// Render `chart` into `.xlsx` bytes
pub fn workbook_to_bytes(chart: &RenderedChart) -> ConversionResult<Vec<u8>> {
    let mut workbook = build_workbook(chart)?;
    Ok(workbook.save_to_buffer()?)
}

fn write_chart_sheet(sheet: &mut Worksheet, chart: &RenderedChart) -> ConversionResult<()> {
    let frame = Frame::of(chart)?;
    let right = frame.right;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let subtitle_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    put_range(
        sheet,
        (TITLE_ROW, FIRST_CHART_COLUMN),
        (TITLE_ROW, right),
        &chart.title,
        &title_format,
    )?;
    put_range(
        sheet,
        (SUBTITLE_ROW, FIRST_CHART_COLUMN),
        (SUBTITLE_ROW, right),
        &chart.subtitle,
        &subtitle_format,
    )?;

    let notes_start = write_main_headers(sheet, chart, &frame)?;
    write_sub_headers(sheet, chart, &frame, notes_start)?;

    for row in &chart.rows {
        write_data_row(sheet, row, &frame)?;
    }

    for (col, width) in (0..right).zip(column_widths(chart)) {
        sheet.set_column_width(col, width)?;
    }

    sheet.autofilter(
        SUB_HEADER_ROW - 1,
        FIRST_CHART_COLUMN - 1,
        frame.bottom - 1,
        right - 1,
    )?;

    debug!(rows = chart.rows.len(), columns = right, "wrote chart sheet");
    Ok(())
}

/// Row 5; returns the first column of the Notes group
fn write_main_headers(
    sheet: &mut Worksheet,
    chart: &RenderedChart,
    frame: &Frame,
) -> ConversionResult<u16> {
    let base = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let groups = &chart.headers.main;
    let notes_label = chart.headers.sub.last().map(String::as_str).unwrap_or_default();

    let mut cursor: u16 = 1;
    let mut notes_start = frame.right;
    for (i, group) in groups.iter().enumerate() {
        let span = u16::try_from(group.span.max(1)).map_err(|_| too_wide(group.span))?;
        let start = cursor;
        let end = start
            .checked_add(span - 1)
            .ok_or_else(|| too_wide(usize::from(start) + group.span))?;
        cursor = end.saturating_add(1);

        // The leading blank column sits outside the chart
        if i == 0 {
            continue;
        }

        if i == groups.len() - 1 {
            notes_start = start;
            let rows = (MAIN_HEADER_ROW, SUB_HEADER_ROW);
            let format = frame.apply(base.clone(), rows, (start, end));
            put_range(
                sheet,
                (MAIN_HEADER_ROW, start),
                (SUB_HEADER_ROW, end),
                notes_label,
                &format,
            )?;
        } else if group.title.is_empty() {
            for col in start..=end {
                let rows = (MAIN_HEADER_ROW, MAIN_HEADER_ROW);
                let format = frame.apply(base.clone(), rows, (col, col));
                put(sheet, MAIN_HEADER_ROW, col, "", &format)?;
            }
        } else {
            let rows = (MAIN_HEADER_ROW, MAIN_HEADER_ROW);
            let format = frame.apply(base.clone(), rows, (start, end));
            put_range(
                sheet,
                (MAIN_HEADER_ROW, start),
                (MAIN_HEADER_ROW, end),
                &group.title,
                &format,
            )?;
        }
    }

    Ok(notes_start)
}

/// Row 6, up to the Notes group
fn write_sub_headers(
    sheet: &mut Worksheet,
    chart: &RenderedChart,
    frame: &Frame,
    notes_start: u16,
) -> ConversionResult<()> {
    let base = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    for (i, label) in chart.headers.sub.iter().enumerate() {
        let col = i as u16 + 1;
        if col >= notes_start {
            break;
        }
        let format = frame.apply(base.clone(), (SUB_HEADER_ROW, SUB_HEADER_ROW), (col, col));
        put(sheet, SUB_HEADER_ROW, col, label, &format)?;
    }
    Ok(())
}

fn write_data_row(sheet: &mut Worksheet, row: &RenderedRow, frame: &Frame) -> ConversionResult<()> {
    let r = row.layout.sheet_row;
    let mut base = Format::new()
        .set_border_left(FormatBorder::Thin)
        .set_border_right(FormatBorder::Thin)
        .set_border_bottom(emphasis_border(row.layout.emphasis));
    if let Some(rgb) = row.layout.shading.and_then(|c| c.fill()) {
        base = base.set_background_color(Color::RGB(rgb));
    }

    let mut col: u16 = 1;
    while (col as usize) <= row.values.len() {
        let end = row
            .layout
            .merges
            .iter()
            .find(|m| m.start_col == col)
            .map(|m| m.end_col)
            .unwrap_or(col);
        let text = &row.values[col as usize - 1];
        let format = frame.apply(base.clone(), (r, r), (col, end));
        put_range(sheet, (r, col), (r, end), text, &format)?;
        col = end + 1;
    }
    Ok(())
}

fn write_legend_sheet(sheet: &mut Worksheet, entries: &[(String, usize)]) -> ConversionResult<()> {
    let header = Format::new().set_bold();
    sheet.write_string_with_format(0, 0, LEGEND_CODE_LABEL, &header)?;
    sheet.write_string_with_format(0, 1, LEGEND_COUNT_LABEL, &header)?;

    for (i, (code, count)) in entries.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, code)?;
        sheet.write_number(row, 1, *count as f64)?;
    }

    sheet.set_column_width(0, LEGEND_CODE_WIDTH)?;
    sheet.set_column_width(1, LEGEND_COUNT_WIDTH)?;
    debug!(codes = entries.len(), "wrote legend sheet");
    Ok(())
}

/// Write one cell (1-based); empty text still carries its format
fn put(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: &Format,
) -> ConversionResult<()> {
    if text.is_empty() {
        sheet.write_blank(row - 1, col - 1, format)?;
    } else {
        sheet.write_string_with_format(row - 1, col - 1, text, format)?;
    }
    Ok(())
}

/// Write a (1-based, inclusive) range, merging when it covers more than one cell
fn put_range(
    sheet: &mut Worksheet,
    first: (u32, u16),
    last: (u32, u16),
    text: &str,
    format: &Format,
) -> ConversionResult<()> {
    if first == last {
        return put(sheet, first.0, first.1, text, format);
    }
    sheet.merge_range(first.0 - 1, first.1 - 1, last.0 - 1, last.1 - 1, text, format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::convert::ChartConverter;
    use crate::core::options::ChartOptions;

    const CHART: &str = r#"<document><chart>
        <row type="title1">
          <cell><main><lit>Row</lit></main></cell>
          <cell cols="2"><main><lit>Pre-nuclear</lit></main></cell>
          <cell><main><lit>Notes</lit></main></cell>
        </row>
        <row type="title2">
          <cell><main><lit>Row</lit></main></cell>
          <cell><main><lit>Outer</lit></main></cell>
          <cell><main><lit>Inner</lit></main></cell>
          <cell><main><lit>Notes</lit></main></cell>
        </row>
        <row type="normal" id="1a" clauseType="speech" endPara="true">
          <cell><main><rownum>1a</rownum></main></cell>
          <cell cols="2"><main><word>kuma</word><listRef>T</listRef></main>
            <glosses><gloss>go</gloss></glosses></cell>
          <cell><main><note>n</note></main></cell>
        </row>
        <row type="normal" id="1b" endSent="true">
          <cell><main><rownum>1b</rownum></main></cell>
          <cell><main><word>ni</word></main></cell>
          <cell><main><word>abc</word></main></cell>
          <cell/>
        </row>
      </chart></document>"#;

    fn rendered() -> RenderedChart {
        ChartConverter::new(ChartOptions::default())
            .convert_str(CHART)
            .unwrap()
    }

    #[test]
    fn test_frame_bounds() {
        let chart = rendered();
        let frame = Frame::of(&chart).unwrap();
        assert_eq!(frame.top, 5);
        assert_eq!(frame.bottom, 8);
        assert_eq!(frame.left, 2);
        assert_eq!(frame.right, 6);
    }

    #[test]
    fn test_frame_without_rows_closes_under_headers() {
        let mut chart = rendered();
        chart.rows.clear();
        assert_eq!(Frame::of(&chart).unwrap().bottom, SUB_HEADER_ROW);
    }

    #[test]
    fn test_too_many_columns_is_a_render_error() {
        let mut chart = rendered();
        let width = usize::from(u16::MAX) + 1;
        chart.headers.sub.resize(width, String::new());
        let err = Frame::of(&chart).unwrap_err();
        assert_eq!(
            err,
            ConversionError::render(format!("{} columns do not fit in a worksheet", width))
        );
        assert!(workbook_to_bytes(&chart).is_err());
    }

    #[test]
    fn test_oversized_header_group_is_a_render_error() {
        let mut chart = rendered();
        chart.headers.main[2].span = usize::from(u16::MAX) + 1;
        let err = workbook_to_bytes(&chart).unwrap_err();
        assert!(matches!(err, ConversionError::RenderError { .. }));
    }

    #[test]
    fn test_emphasis_border() {
        assert_eq!(emphasis_border(BreakEmphasis::Strong), FormatBorder::Medium);
        assert_eq!(emphasis_border(BreakEmphasis::Secondary), FormatBorder::Dashed);
        assert_eq!(emphasis_border(BreakEmphasis::None), FormatBorder::None);
    }

    #[test]
    fn test_column_widths_skip_merged_cells() {
        let chart = rendered();
        let widths = column_widths(&chart);
        assert_eq!(widths.len(), 6);
        // Column A is always blank
        assert_eq!(widths[0], 2.0);
        // "kuma (go) (T)" is merged over C..D and does not widen C
        assert_eq!(widths[2], "Outer".len() as f64 + 2.0);
        // The "Inner" header outweighs "abc" on row 1b
        assert_eq!(widths[3], "Inner".len() as f64 + 2.0);
    }

    #[test]
    fn test_column_widths_ignore_title_and_group_headers() {
        let mut chart = rendered();
        chart.title = "A title far wider than any column of the chart".to_string();
        let widths = column_widths(&chart);
        // Column B holds the merged title's anchor but sizes to "Row"
        assert_eq!(widths[1], "Row".len() as f64 + 2.0);
        // "Pre-nuclear" is merged over C..D and counts for neither
        assert!(widths[2] < "Pre-nuclear".len() as f64 + 2.0);
        assert!(widths[3] < "Pre-nuclear".len() as f64 + 2.0);
    }

    #[test]
    fn test_workbook_bytes() {
        let bytes = workbook_to_bytes(&rendered()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_write_workbook_to_file() {
        let path = std::env::temp_dir().join("textchart_workbook_test.xlsx");
        write_workbook(&rendered(), &path).unwrap();
        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
        let _ = std::fs::remove_file(&path);
    }
}
