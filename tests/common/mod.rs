#![allow(dead_code)]

use std::path::{Path, PathBuf};

use gametext_tools::config::{FileFormat, Settings};
use gametext_tools::model::{ContentData, IndexData, RecordData, SheetData};

pub const TEMPLATE_SHEET: &str = "Template";
pub const LANGUAGES: [&str; 3] = ["Ja", "En", "Fr"];

pub const SHEET_GUID: &str = "5f183c4499704e5eb4c2a9a47a6f1b3a";
pub const GREETING_GUID: &str = "0d0a1f52c44e4f53a6b19c49f2f0f9d1";
pub const FAREWELL_GUID: &str = "8b6f3d8af0c04fb49f2a6d6f2f6f4e2b";

pub fn settings() -> Settings {
    Settings {
        format: FileFormat::Json,
        edit_excel_file_name: "GameText.xlsx".to_string(),
        excel_template_path: PathBuf::from("origin.xlsx"),
        template_sheet_name: TEMPLATE_SHEET.to_string(),
        ignore_sheet_names: Vec::new(),
    }
}

/// Writes a minimal template workbook: one `Template` worksheet with the
/// column labels and the language-type header row.
pub fn write_template(workspace: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let worksheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("default worksheet");
    worksheet.set_name(TEMPLATE_SHEET);
    worksheet.get_cell_mut((1, 2)).set_value("GUID");
    worksheet.get_cell_mut((2, 2)).set_value("Description");
    worksheet.get_cell_mut((3, 2)).set_value("EnumName");
    for (offset, language) in LANGUAGES.iter().enumerate() {
        worksheet
            .get_cell_mut((4 + offset as u32, 2))
            .set_value(*language);
    }

    umya_spreadsheet::writer::xlsx::write(&book, workspace.join("origin.xlsx"))
        .expect("template workbook written");
}

pub fn content(text: &str) -> ContentData {
    ContentData {
        text: text.to_string(),
        ..ContentData::default()
    }
}

/// One sheet with two records, including metadata and a multi-line text.
pub fn sample_sheets() -> Vec<SheetData> {
    vec![SheetData {
        guid: SHEET_GUID.to_string(),
        sheet_name: "SYSTEM_TEXT".to_string(),
        display_name: "System".to_string(),
        records: vec![
            RecordData {
                guid: GREETING_GUID.to_string(),
                enum_name: "GREETING".to_string(),
                description: Some("Shown on the title screen".to_string()),
                contents: vec![
                    ContentData {
                        text: "こんにちは\nようこそ".to_string(),
                        comment: Some("要チェック".to_string()),
                        font_color: Some(gametext_tools::model::CellColor::Rgb(
                            "FFFF0000".to_string(),
                        )),
                        background_color: Some(gametext_tools::model::CellColor::Rgb(
                            "FF00B050".to_string(),
                        )),
                    },
                    content("Hello"),
                    content(""),
                ],
            },
            RecordData {
                guid: FAREWELL_GUID.to_string(),
                enum_name: "FAREWELL".to_string(),
                description: None,
                contents: vec![content("さようなら"), content("Goodbye"), content("")],
            },
        ],
    }]
}

pub fn index_of(sheets: &[SheetData]) -> IndexData {
    IndexData {
        sheet_names: sheets.iter().map(|sheet| sheet.sheet_name.clone()).collect(),
    }
}

pub fn sorted(mut sheets: Vec<SheetData>) -> Vec<SheetData> {
    sheets.sort_by(|lhs, rhs| lhs.sheet_name.cmp(&rhs.sheet_name));
    sheets
}
