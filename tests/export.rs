mod common;

use std::fs;
use std::path::Path;

use gametext_tools::model::SheetData;
use gametext_tools::{ToolError, store, sync};
use tempfile::tempdir;

#[test]
fn record_identity_survives_row_move_and_edit() {
    let temp = tempdir().expect("temporary directory");
    let workspace = temp.path();
    let settings = common::settings();
    common::write_template(workspace);

    let sheets = common::sample_sheets();
    store::write_all_sheets(workspace, &sheets, &settings).expect("store written");
    store::write_index(workspace, &common::index_of(&sheets), &settings).expect("index written");
    sync::import(workspace, &settings).expect("workbook built");

    // Swap the two records' rows and edit the moved description.
    let edit_path = settings.edit_excel_path(workspace);
    let mut book = umya_spreadsheet::reader::xlsx::read(&edit_path).expect("workbook read");
    let worksheet = book.get_sheet_by_name_mut("System").expect("data sheet");
    worksheet.get_cell_mut((3, 3)).set_value("FAREWELL");
    worksheet.get_cell_mut((3, 4)).set_value("GREETING");
    worksheet.get_cell_mut((2, 4)).set_value("moved and reworded");
    umya_spreadsheet::writer::xlsx::write(&book, &edit_path).expect("workbook written");

    sync::export(workspace, &settings).expect("workbook exported");

    let restored = store::load_all_sheets(workspace, &settings).expect("store loaded");
    let greeting = find_record(&restored[0], "GREETING");
    let farewell = find_record(&restored[0], "FAREWELL");
    assert_eq!(greeting.guid, common::GREETING_GUID);
    assert_eq!(farewell.guid, common::FAREWELL_GUID);
    assert_eq!(greeting.description.as_deref(), Some("moved and reworded"));

    // Row order in the store follows the workbook, so FAREWELL now leads.
    assert_eq!(restored[0].records[0].enum_name, "FAREWELL");
}

#[test]
fn renamed_record_keeps_guid_through_guid_cell() {
    let temp = tempdir().expect("temporary directory");
    let workspace = temp.path();
    let settings = common::settings();
    common::write_template(workspace);

    let sheets = common::sample_sheets();
    store::write_all_sheets(workspace, &sheets, &settings).expect("store written");
    store::write_index(workspace, &common::index_of(&sheets), &settings).expect("index written");
    sync::import(workspace, &settings).expect("workbook built");

    // Rename the enum; the guid cell in the same row still carries the
    // old identifier.
    let edit_path = settings.edit_excel_path(workspace);
    let mut book = umya_spreadsheet::reader::xlsx::read(&edit_path).expect("workbook read");
    let worksheet = book.get_sheet_by_name_mut("System").expect("data sheet");
    worksheet.get_cell_mut((3, 3)).set_value("HELLO");
    umya_spreadsheet::writer::xlsx::write(&book, &edit_path).expect("workbook written");

    sync::export(workspace, &settings).expect("workbook exported");

    let restored = store::load_all_sheets(workspace, &settings).expect("store loaded");
    assert_eq!(find_record(&restored[0], "HELLO").guid, common::GREETING_GUID);
}

#[test]
fn sparse_rows_produce_no_records() {
    let temp = tempdir().expect("temporary directory");
    let workspace = temp.path();
    let settings = common::settings();

    write_data_workbook(workspace, |worksheet| {
        worksheet.get_cell_mut((3, 3)).set_value("FIRST");
        worksheet.get_cell_mut((4, 3)).set_value("one");
        // Row 4 has text but no enum name.
        worksheet.get_cell_mut((4, 4)).set_value("orphan");
        worksheet.get_cell_mut((3, 5)).set_value("SECOND");
        worksheet.get_cell_mut((4, 5)).set_value("two");
    });

    sync::export(workspace, &settings).expect("workbook exported");

    let restored = store::load_all_sheets(workspace, &settings).expect("store loaded");
    let names: Vec<&str> = restored[0]
        .records
        .iter()
        .map(|record| record.enum_name.as_str())
        .collect();
    assert_eq!(names, vec!["FIRST", "SECOND"]);
}

#[test]
fn language_columns_stop_at_first_empty_header() {
    let temp = tempdir().expect("temporary directory");
    let workspace = temp.path();
    let settings = common::settings();

    write_data_workbook(workspace, |worksheet| {
        // Column 7 header is empty; column 8 has one anyway.
        worksheet.get_cell_mut((8, 2)).set_value("Zh");
        worksheet.get_cell_mut((3, 3)).set_value("FIRST");
        for col in 4..=8 {
            worksheet.get_cell_mut((col, 3)).set_value("text");
        }
    });

    sync::export(workspace, &settings).expect("workbook exported");

    let restored = store::load_all_sheets(workspace, &settings).expect("store loaded");
    assert_eq!(restored[0].records[0].contents.len(), common::LANGUAGES.len());
}

#[test]
fn duplicate_sheet_identifier_aborts_export() {
    let temp = tempdir().expect("temporary directory");
    let workspace = temp.path();
    let settings = common::settings();

    write_data_workbook(workspace, |worksheet| {
        worksheet.get_cell_mut((3, 3)).set_value("FIRST");
    });

    // Second worksheet claiming the same identifier.
    let edit_path = settings.edit_excel_path(workspace);
    let mut book = umya_spreadsheet::reader::xlsx::read(&edit_path).expect("workbook read");
    {
        let worksheet = book.new_sheet("Strings Copy").expect("worksheet created");
        worksheet.get_cell_mut((2, 1)).set_value("STRINGS");
        for (offset, language) in common::LANGUAGES.iter().enumerate() {
            worksheet
                .get_cell_mut((4 + offset as u32, 2))
                .set_value(*language);
        }
        worksheet.get_cell_mut((3, 3)).set_value("OTHER");
    }
    umya_spreadsheet::writer::xlsx::write(&book, &edit_path).expect("workbook written");

    let error = sync::export(workspace, &settings).expect_err("duplicate must fail");
    assert!(matches!(error, ToolError::DuplicateSheetName(name) if name == "STRINGS"));

    // Nothing may have been written before the failure.
    assert!(!store::contents_dir(workspace).exists());
}

#[test]
fn unreadable_sheet_file_is_skipped() {
    let temp = tempdir().expect("temporary directory");
    let workspace = temp.path();
    let settings = common::settings();

    let root = store::contents_dir(workspace);
    fs::create_dir_all(&root).expect("content directory created");
    let sheets = common::sample_sheets();
    fs::write(
        root.join("SYSTEM_TEXT.json"),
        serde_json::to_string_pretty(&sheets[0]).expect("sheet serialized"),
    )
    .expect("sheet file written");
    fs::write(root.join("BROKEN.json"), "not a sheet").expect("broken file written");

    let loaded = store::load_all_sheets(workspace, &settings).expect("store loaded");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].sheet_name, "SYSTEM_TEXT");
}

/// Builds an edit workbook with one data worksheet named `Strings`
/// (identifier `STRINGS`) and the standard language header row, then
/// lets the caller fill in rows before saving.
fn write_data_workbook<F>(workspace: &Path, fill: F)
where
    F: FnOnce(&mut umya_spreadsheet::Worksheet),
{
    let mut book = umya_spreadsheet::new_file();
    let worksheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("default worksheet");
    worksheet.set_name("Strings");
    worksheet.get_cell_mut((2, 1)).set_value("STRINGS");
    for (offset, language) in common::LANGUAGES.iter().enumerate() {
        worksheet
            .get_cell_mut((4 + offset as u32, 2))
            .set_value(*language);
    }
    fill(worksheet);

    let settings = common::settings();
    umya_spreadsheet::writer::xlsx::write(&book, settings.edit_excel_path(workspace))
        .expect("workbook written");
}

fn find_record<'a>(sheet: &'a SheetData, enum_name: &str) -> &'a gametext_tools::model::RecordData {
    sheet
        .records
        .iter()
        .find(|record| record.enum_name == enum_name)
        .unwrap_or_else(|| panic!("record {enum_name} not found"))
}
