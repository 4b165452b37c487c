use tracing::warn;
use umya_spreadsheet::{Color, Comment, PatternValues, Style, Worksheet};

use crate::gametext::tools::model::{CellColor, ContentData};

/// Author tag written on generated cell comments.
pub const COMMENT_AUTHOR: &str = "REF";

/// Font color of an untouched cell.
const DEFAULT_FONT_ARGB: &str = "FF000000";

/// Fill color of an untouched cell.
const DEFAULT_FILL_ARGB: &str = "FFFFFFFF";

/// Presentation metadata of one cell: comment plus font and background
/// color, with default appearance filtered out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMetadata {
    pub comment: Option<String>,
    pub font_color: Option<CellColor>,
    pub background_color: Option<CellColor>,
}

impl CellMetadata {
    fn is_empty(&self) -> bool {
        self.comment.is_none() && self.font_color.is_none() && self.background_color.is_none()
    }

    /// Metadata carried by a stored content entry, if any.
    pub fn from_content(content: &ContentData) -> Option<Self> {
        if !content.has_metadata() {
            return None;
        }
        Some(Self {
            comment: content.comment.clone(),
            font_color: content.font_color.clone(),
            background_color: content.background_color.clone(),
        })
    }
}

/// Reads the metadata of a cell, returning `None` when the cell has no
/// comment and default colors.
///
/// Theme-indexed colors cannot be expressed as a literal value and
/// degrade to an absent color with a warning instead of a wrong literal.
pub fn decode(sheet: &Worksheet, col: u32, row: u32) -> Option<CellMetadata> {
    let comment = read_comment(sheet, col, row);

    let mut font_color = None;
    let mut background_color = None;
    if let Some(cell) = sheet.get_cell((col, row)) {
        let style = cell.get_style();
        if let Some(font) = style.get_font() {
            font_color = filter_color(font.get_color(), DEFAULT_FONT_ARGB, sheet, col, row);
        }
        if let Some(fill) = style.get_fill() {
            if let Some(pattern) = fill.get_pattern_fill() {
                if let Some(color) = pattern.get_foreground_color() {
                    background_color = filter_color(color, DEFAULT_FILL_ARGB, sheet, col, row);
                }
            }
        }
    }

    let metadata = CellMetadata {
        comment,
        font_color,
        background_color,
    };

    (!metadata.is_empty()).then_some(metadata)
}

/// Applies metadata to a cell. A `None` metadata value is a no-op.
pub fn encode(sheet: &mut Worksheet, col: u32, row: u32, metadata: &CellMetadata) {
    if let Some(comment) = &metadata.comment {
        write_comment(sheet, col, row, comment);
    }

    if metadata.font_color.is_none() && metadata.background_color.is_none() {
        return;
    }

    let style = sheet.get_cell_mut((col, row)).get_style_mut();
    if let Some(color) = &metadata.font_color {
        apply_color(style.get_font_mut().get_color_mut(), color);
    }
    if let Some(color) = &metadata.background_color {
        apply_background(style, color);
    }
}

fn read_comment(sheet: &Worksheet, col: u32, row: u32) -> Option<String> {
    let comment = sheet.get_comments().iter().find(|comment| {
        let coordinate = comment.get_coordinate();
        *coordinate.get_col_num() == col && *coordinate.get_row_num() == row
    })?;

    let raw = comment.get_text().get_text().to_string();
    let author = comment.get_author();

    // Spreadsheet applications prepend "Author:" to the comment body.
    let prefix = format!("{author}:");
    let text = if !author.is_empty() && raw.starts_with(&prefix) {
        &raw[prefix.len()..]
    } else {
        raw.as_str()
    };

    let text = text.trim_matches('\n');
    (!text.is_empty()).then(|| text.to_string())
}

fn write_comment(sheet: &mut Worksheet, col: u32, row: u32, text: &str) {
    let mut comment = Comment::default();
    comment.set_author(COMMENT_AUTHOR);
    comment.get_coordinate_mut().set_col_num(col);
    comment.get_coordinate_mut().set_row_num(row);
    comment.set_text_string(text);
    sheet.add_comments(comment);
}

/// Converts a workbook color into its stored form, dropping default and
/// theme-indexed colors.
fn filter_color(
    color: &Color,
    default_argb: &str,
    sheet: &Worksheet,
    col: u32,
    row: u32,
) -> Option<CellColor> {
    let argb = color.get_argb().to_uppercase();
    if !argb.is_empty() {
        if argb == default_argb {
            return None;
        }
        return Some(CellColor::Rgb(argb));
    }

    if *color.get_theme_index() != 0 {
        warn!(
            sheet = %sheet.get_name(),
            col,
            row,
            "theme color cannot be round-tripped, saving default color"
        );
    }

    None
}

fn apply_color(target: &mut Color, color: &CellColor) {
    match color {
        CellColor::Rgb(argb) => {
            target.set_argb(argb.clone());
        }
        CellColor::Theme { index, tint } => {
            target.set_theme_index(*index);
            if let Some(tint) = tint {
                target.set_tint(*tint);
            }
        }
    }
}

fn apply_background(style: &mut Style, color: &CellColor) {
    let pattern = style.get_fill_mut().get_pattern_fill_mut();
    pattern.set_pattern_type(PatternValues::Solid);
    apply_color(pattern.get_foreground_color_mut(), color);
}
