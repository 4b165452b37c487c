use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};
use umya_spreadsheet::{Cell, SheetProtection, Spreadsheet, Worksheet};

use crate::gametext::tools::config::Settings;
use crate::gametext::tools::error::{Result, ToolError};
use crate::gametext::tools::io::cell_meta::{self, CellMetadata};
use crate::gametext::tools::io::{
    DESCRIPTION_COLUMN, ENUM_NAME_COLUMN, GUID_COLUMN, RECORD_START_ROW, SHEET_GUID_ADDRESS,
    SHEET_NAME_ADDRESS, TEXT_START_COLUMN,
};
use crate::gametext::tools::model::{IndexData, SheetData};

/// Font size of the sheet guid cell. Small but still legible.
const GUID_FONT_SIZE: f64 = 6.0;

/// Fixed width of the record guid column, regardless of content.
const GUID_COLUMN_WIDTH: f64 = 6.0;

/// Upper bound for automatic column growth, in column width units.
const MAX_COLUMN_WIDTH: f64 = 80.0;

/// Upper bound for automatic row growth, in points.
const MAX_ROW_HEIGHT: f64 = 120.0;

/// Font size the width estimate is normalized against.
const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Height of a single text line at the default font size, in points.
const BASE_LINE_HEIGHT: f64 = 15.0;

/// Width of a column that has no explicit dimension record.
const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Extra width added to every estimate so text does not touch the
/// cell border.
const CELL_WIDTH_PADDING: f64 = 1.5;

/// Synthesizes the edit workbook from structured sheets.
///
/// The template workbook is copied to the edit path, one worksheet is
/// cloned from the template sheet per `SheetData`, values and cell
/// metadata are written in, and the result is saved with a single
/// terminal save call. Any structural failure aborts before that save,
/// leaving at worst the raw template copy on disk.
pub fn build_edit_workbook(
    workspace: &Path,
    index: Option<&IndexData>,
    sheets: &[SheetData],
    settings: &Settings,
) -> Result<()> {
    let origin = settings.template_excel_path(workspace);
    if !origin.exists() {
        return Err(ToolError::MissingTemplate(origin));
    }

    let edit_path = settings.edit_excel_path(workspace);
    fs::copy(&origin, &edit_path)?;

    let mut book = umya_spreadsheet::reader::xlsx::read(&edit_path)?;

    // The template sheet is matched case-insensitively; remember its
    // real name for lookups.
    let template_name = book
        .get_sheet_collection_no_check()
        .iter()
        .map(|worksheet| worksheet.get_name().to_string())
        .find(|name| settings.is_template_sheet(name))
        .ok_or_else(|| ToolError::TemplateSheetNotFound(settings.template_sheet_name.clone()))?;

    let template = book
        .get_sheet_by_name(&template_name)
        .ok_or_else(|| ToolError::TemplateSheetNotFound(template_name.clone()))?
        .clone();

    for sheet in sheets {
        if sheet.display_name.is_empty() {
            continue;
        }
        if book.get_sheet_by_name(&sheet.display_name).is_some() {
            return Err(ToolError::WorksheetCollision(sheet.display_name.clone()));
        }

        let mut worksheet = template.clone();
        worksheet.set_name(sheet.display_name.clone());
        worksheet.set_sheet_protection(SheetProtection::default());
        for view in worksheet.get_sheet_views_mut().get_sheet_view_list_mut() {
            view.set_tab_selected(false);
        }
        book.add_sheet(worksheet)
            .map_err(|error| ToolError::InvalidWorkbook(error.to_string()))?;
    }

    reorder_sheets(&mut book, index, sheets);

    book.set_active_sheet(0);
    if let Some(first) = book.get_sheet_collection_mut().first_mut() {
        for view in first.get_sheet_views_mut().get_sheet_view_list_mut() {
            view.set_tab_selected(true);
        }
    }

    for sheet in sheets {
        if sheet.display_name.is_empty() {
            continue;
        }
        let Some(worksheet) = book.get_sheet_by_name_mut(&sheet.display_name) else {
            warn!(sheet = %sheet.display_name, "worksheet not found, skipping");
            continue;
        };
        write_sheet(worksheet, sheet);
        info!(sheet = %sheet.display_name, records = sheet.records.len(), "built worksheet");
    }

    umya_spreadsheet::writer::xlsx::write(&book, &edit_path)?;
    Ok(())
}

/// Applies the index order with a single stable sort.
///
/// Sheets named by the index come first, in index order; everything
/// else (the template sheet included) trails in its prior relative
/// order.
fn reorder_sheets(book: &mut Spreadsheet, index: Option<&IndexData>, sheets: &[SheetData]) {
    let Some(index) = index else {
        return;
    };

    let display_names: HashMap<&str, &str> = sheets
        .iter()
        .map(|sheet| (sheet.sheet_name.as_str(), sheet.display_name.as_str()))
        .collect();

    let order: HashMap<String, usize> = index
        .sheet_names
        .iter()
        .enumerate()
        .filter_map(|(position, sheet_name)| {
            display_names
                .get(sheet_name.as_str())
                .map(|name| ((*name).to_string(), position))
        })
        .collect();

    book.get_sheet_collection_mut()
        .sort_by_key(|worksheet| order.get(worksheet.get_name()).copied().unwrap_or(usize::MAX));
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetData) {
    let template_highest_row = worksheet.get_highest_row();
    let highest_column = worksheet.get_highest_column();

    // Template widths are the floor the auto-size pass grows from.
    let mut base_widths = HashMap::new();
    for col in 1..=highest_column {
        base_widths.insert(col, column_width(worksheet, col));
    }

    worksheet
        .get_cell_mut(SHEET_NAME_ADDRESS)
        .set_value(&sheet.sheet_name);
    let guid_cell = worksheet.get_cell_mut(SHEET_GUID_ADDRESS);
    guid_cell.set_value(&sheet.guid);
    guid_cell.get_style_mut().get_font_mut().set_size(GUID_FONT_SIZE);

    // Rows past the template's used range take the format of the
    // canonical first data row.
    for record_index in 0..sheet.records.len() {
        let row = RECORD_START_ROW + record_index as u32;
        if row <= template_highest_row {
            continue;
        }
        for col in 1..=highest_column {
            let style = worksheet
                .get_cell((col, RECORD_START_ROW))
                .map(|cell| cell.get_style().clone());
            if let Some(style) = style {
                worksheet.get_cell_mut((col, row)).set_style(style);
            }
        }
    }

    for (record_index, record) in sheet.records.iter().enumerate() {
        let row = RECORD_START_ROW + record_index as u32;

        worksheet.get_cell_mut((GUID_COLUMN, row)).set_value(&record.guid);
        if let Some(description) = &record.description {
            worksheet
                .get_cell_mut((DESCRIPTION_COLUMN, row))
                .set_value(description);
        }
        worksheet
            .get_cell_mut((ENUM_NAME_COLUMN, row))
            .set_value(&record.enum_name);

        for (content_index, content) in record.contents.iter().enumerate() {
            let col = TEXT_START_COLUMN + content_index as u32;
            if !content.text.is_empty() {
                worksheet.get_cell_mut((col, row)).set_value(&content.text);
            }
            if let Some(metadata) = CellMetadata::from_content(content) {
                cell_meta::encode(worksheet, col, row, &metadata);
            }
        }
    }

    autofit(worksheet, &base_widths, highest_column);
}

/// Grows columns and rows to fit their content.
///
/// Column width grows to the widest populated cell, clamped to
/// [`MAX_COLUMN_WIDTH`], never shrinking below the template width. The
/// guid column is pinned to a constant narrow width. Cells that contain
/// a line break or overflow the column cap get wrap text, and their row
/// grows to fit the wrapped line count, clamped to [`MAX_ROW_HEIGHT`].
fn autofit(worksheet: &mut Worksheet, base_widths: &HashMap<u32, f64>, highest_column: u32) {
    let highest_row = worksheet.get_highest_row();

    for col in 1..=highest_column {
        if col == GUID_COLUMN {
            worksheet
                .get_column_dimension_by_number_mut(&col)
                .set_width(GUID_COLUMN_WIDTH);
            continue;
        }

        let base = base_widths.get(&col).copied().unwrap_or(DEFAULT_COLUMN_WIDTH);
        let mut width = base;
        for row in 1..=highest_row {
            let text = worksheet.get_value((col, row));
            if text.is_empty() {
                continue;
            }
            let text = normalize_line_endings(&text);
            let size = font_size_at(worksheet, col, row);
            width = width.max(estimate_width(&text, size));
        }

        width = width.min(MAX_COLUMN_WIDTH);
        if width > base {
            worksheet
                .get_column_dimension_by_number_mut(&col)
                .set_width(width);
        }
    }

    for row in RECORD_START_ROW..=highest_row {
        let mut row_height = BASE_LINE_HEIGHT;
        for col in 1..=highest_column {
            if col == GUID_COLUMN {
                continue;
            }
            let text = worksheet.get_value((col, row));
            if text.is_empty() {
                continue;
            }
            let text = normalize_line_endings(&text);
            let size = font_size_at(worksheet, col, row);
            let current_width = column_width(worksheet, col);

            if !text.contains('\n') && estimate_width(&text, size) <= current_width {
                continue;
            }

            worksheet
                .get_cell_mut((col, row))
                .get_style_mut()
                .get_alignment_mut()
                .set_wrap_text(true);

            let lines = wrapped_line_count(&text, size, current_width);
            let height = lines as f64 * BASE_LINE_HEIGHT * (size / DEFAULT_FONT_SIZE);
            row_height = row_height.max(height);
        }

        if row_height > BASE_LINE_HEIGHT {
            worksheet
                .get_row_dimension_mut(&row)
                .set_height(row_height.min(MAX_ROW_HEIGHT));
        }
    }
}

fn column_width(worksheet: &Worksheet, col: u32) -> f64 {
    let width = worksheet
        .get_column_dimension_by_number(&col)
        .map(|column| *column.get_width())
        .unwrap_or(0.0);
    if width <= 0.0 { DEFAULT_COLUMN_WIDTH } else { width }
}

fn font_size_at(worksheet: &Worksheet, col: u32, row: u32) -> f64 {
    worksheet
        .get_cell((col, row))
        .map(font_size_of)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn font_size_of(cell: &Cell) -> f64 {
    if let Some(font) = cell.get_style().get_font() {
        let size = *font.get_size();
        if size > 0.0 {
            return size;
        }
    }
    DEFAULT_FONT_SIZE
}

/// Estimated rendered width of a text block in column width units.
fn estimate_width(text: &str, font_size: f64) -> f64 {
    let widest = text.lines().map(display_width).fold(0, usize::max);
    widest as f64 * (font_size / DEFAULT_FONT_SIZE) + CELL_WIDTH_PADDING
}

/// Number of display lines after wrapping at the given column width.
fn wrapped_line_count(text: &str, font_size: f64, column_width: f64) -> usize {
    let scale = font_size / DEFAULT_FONT_SIZE;
    text.lines()
        .map(|line| {
            let width = display_width(line) as f64 * scale;
            (width / column_width).ceil().max(1.0) as usize
        })
        .sum::<usize>()
        .max(1)
}

/// Approximate display columns of a line; CJK glyphs take two.
fn display_width(line: &str) -> usize {
    line.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(
        c,
        '\u{1100}'..='\u{115F}'
            | '\u{2E80}'..='\u{303E}'
            | '\u{3041}'..='\u{33FF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{A000}'..='\u{A4CF}'
            | '\u{AC00}'..='\u{D7A3}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{FE30}'..='\u{FE4F}'
            | '\u{FF00}'..='\u{FF60}'
            | '\u{FFE0}'..='\u{FFE6}'
            | '\u{20000}'..='\u{2FFFD}'
            | '\u{30000}'..='\u{3FFFD}'
    )
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_double_the_estimate() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("あいう"), 6);
    }

    #[test]
    fn wrapped_lines_count_explicit_breaks() {
        assert_eq!(wrapped_line_count("a\nb", DEFAULT_FONT_SIZE, 20.0), 2);
        assert_eq!(wrapped_line_count("short", DEFAULT_FONT_SIZE, 20.0), 1);
    }

    #[test]
    fn long_lines_wrap_by_column_width() {
        let line = "x".repeat(50);
        assert_eq!(wrapped_line_count(&line, DEFAULT_FONT_SIZE, 20.0), 3);
    }

    #[test]
    fn line_endings_normalize_to_newline() {
        assert_eq!(normalize_line_endings("a\r\nb\rc"), "a\nb\nc");
    }
}
