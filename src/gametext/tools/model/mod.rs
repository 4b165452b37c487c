use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mints a fresh stable identifier in the 32 hex digit form used
/// throughout the store.
pub fn new_guid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Ordered sheet identifiers defining the worksheet order used when the
/// edit workbook is rebuilt. Regenerated on every export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexData {
    pub sheet_names: Vec<String>,
}

/// One worksheet worth of localization records.
///
/// `sheet_name` is the stable machine identifier written into the
/// worksheet itself; `display_name` is the human worksheet title. The
/// guid survives re-export cycles once minted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub guid: String,
    pub sheet_name: String,
    pub display_name: String,
    pub records: Vec<RecordData>,
}

/// A single localization record, one per data row.
///
/// `contents` holds one entry per language column, in column order,
/// including logically empty entries so that column alignment survives
/// the round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    pub guid: String,
    pub enum_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contents: Vec<ContentData>,
}

/// Text plus presentation metadata for one language cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentData {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<CellColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<CellColor>,
}

impl ContentData {
    /// True when the entry carries neither a comment nor a color, i.e.
    /// only its text participates in the round trip.
    pub fn has_metadata(&self) -> bool {
        self.comment.is_some() || self.font_color.is_some() || self.background_color.is_some()
    }
}

/// A cell color as stored in the content files.
///
/// Literal colors are ARGB hex strings such as `FF70AD47`. Theme colors
/// reference the workbook palette and can be written into a workbook but
/// never recovered from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellColor {
    Rgb(String),
    Theme {
        index: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tint: Option<f64>,
    },
}
