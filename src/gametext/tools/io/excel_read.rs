use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};
use umya_spreadsheet::Worksheet;

use crate::gametext::tools::config::Settings;
use crate::gametext::tools::error::{Result, ToolError};
use crate::gametext::tools::io::{
    DESCRIPTION_COLUMN, ENUM_NAME_COLUMN, GUID_COLUMN, RECORD_START_ROW, SHEET_NAME_ADDRESS,
    TEXT_START_COLUMN, TEXT_TYPE_ROW,
};
use crate::gametext::tools::io::cell_meta;
use crate::gametext::tools::model::{ContentData, RecordData, SheetData, new_guid};
use crate::gametext::tools::store;

/// Reads every data worksheet of the edit workbook into structured
/// sheets, reconciling identities against the previously exported store.
///
/// Returns `Ok(None)` when the workbook does not exist; the caller
/// decides whether that is a problem. Sheets come back in workbook
/// order, records in row order.
pub fn read_workbook(workspace: &Path, settings: &Settings) -> Result<Option<Vec<SheetData>>> {
    let path = settings.edit_excel_path(workspace);
    if !path.exists() {
        return Ok(None);
    }

    let book = umya_spreadsheet::reader::xlsx::read(&path)?;

    let mut sheets = Vec::new();
    let mut seen_names = HashSet::new();

    for worksheet in book.get_sheet_collection_no_check() {
        let display_name = worksheet.get_name().to_string();
        if settings.is_template_sheet(&display_name) || settings.is_ignored_sheet(&display_name) {
            continue;
        }

        // A worksheet without a sheet identifier is not a data sheet.
        let sheet_name = worksheet.get_value(SHEET_NAME_ADDRESS).trim().to_string();
        if sheet_name.is_empty() {
            debug!(worksheet = %display_name, "no sheet identifier, skipping");
            continue;
        }

        if !seen_names.insert(sheet_name.clone()) {
            return Err(ToolError::DuplicateSheetName(sheet_name));
        }

        let prior = store::load_sheet_by_name(workspace, &sheet_name, settings);
        let sheet = read_sheet(worksheet, sheet_name, display_name, prior.as_ref())?;
        info!(sheet = %sheet.display_name, records = sheet.records.len(), "read worksheet");
        sheets.push(sheet);
    }

    Ok(Some(sheets))
}

fn read_sheet(
    worksheet: &Worksheet,
    sheet_name: String,
    display_name: String,
    prior: Option<&SheetData>,
) -> Result<SheetData> {
    let guid = match prior {
        Some(prior) => prior.guid.clone(),
        None => new_guid(),
    };

    let column_count = language_column_count(worksheet);
    let highest_row = worksheet.get_highest_row();

    let mut records = Vec::new();
    let mut seen_names = HashSet::new();

    for row in RECORD_START_ROW..=highest_row {
        let enum_name = worksheet.get_value((ENUM_NAME_COLUMN, row)).trim().to_string();
        if enum_name.is_empty() {
            continue;
        }

        if !seen_names.insert(enum_name.clone()) {
            return Err(ToolError::DuplicateEnumName {
                sheet: sheet_name.clone(),
                name: enum_name,
            });
        }

        let guid = resolve_record_guid(worksheet, row, &enum_name, prior);

        let description = worksheet.get_value((DESCRIPTION_COLUMN, row));
        let description = (!description.is_empty()).then_some(description);

        let mut contents = Vec::with_capacity(column_count as usize);
        for offset in 0..column_count {
            let col = TEXT_START_COLUMN + offset;
            let metadata = cell_meta::decode(worksheet, col, row).unwrap_or_default();
            contents.push(ContentData {
                text: worksheet.get_value((col, row)),
                comment: metadata.comment,
                font_color: metadata.font_color,
                background_color: metadata.background_color,
            });
        }

        records.push(RecordData {
            guid,
            enum_name,
            description,
            contents,
        });
    }

    Ok(SheetData {
        guid,
        sheet_name,
        display_name,
        records,
    })
}

/// Number of language columns, defined by the contiguous run of
/// non-empty header cells starting at the text start column.
fn language_column_count(worksheet: &Worksheet) -> u32 {
    let mut count = 0;
    loop {
        let col = TEXT_START_COLUMN + count;
        if worksheet.get_value((col, TEXT_TYPE_ROW)).trim().is_empty() {
            return count;
        }
        count += 1;
    }
}

/// Resolves the stable identifier for a data row.
///
/// Matching against the prior sheet goes by enum name first so identity
/// survives row reordering and content edits; the literal guid already
/// in the row's guid cell is the fallback for rows whose enum name was
/// itself renamed. Rows matching neither get a fresh guid.
fn resolve_record_guid(
    worksheet: &Worksheet,
    row: u32,
    enum_name: &str,
    prior: Option<&SheetData>,
) -> String {
    let Some(prior) = prior else {
        return new_guid();
    };

    if let Some(record) = prior.records.iter().find(|record| record.enum_name == enum_name) {
        return record.guid.clone();
    }

    let cell_guid = worksheet.get_value((GUID_COLUMN, row)).trim().to_string();
    if !cell_guid.is_empty() {
        if let Some(record) = prior.records.iter().find(|record| record.guid == cell_guid) {
            return record.guid.clone();
        }
    }

    new_guid()
}
