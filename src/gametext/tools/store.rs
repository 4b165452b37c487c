use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::gametext::tools::config::{FileFormat, Settings};
use crate::gametext::tools::error::{Result, ToolError};
use crate::gametext::tools::fsutil;
use crate::gametext::tools::model::{IndexData, SheetData};

/// Name of the content directory inside the workspace.
pub const CONTENTS_DIR_NAME: &str = "Contents";

/// Extension of the sheet index file, independent of the store format.
pub const INDEX_FILE_EXTENSION: &str = ".index";

/// Path of the content directory for a workspace.
pub fn contents_dir(workspace: &Path) -> PathBuf {
    workspace.join(CONTENTS_DIR_NAME)
}

fn index_file_path(workspace: &Path, settings: &Settings) -> PathBuf {
    contents_dir(workspace).join(format!(
        "{}{INDEX_FILE_EXTENSION}",
        settings.index_file_stem()
    ))
}

fn sheet_file_path(workspace: &Path, sheet_name: &str, settings: &Settings) -> PathBuf {
    contents_dir(workspace).join(format!("{sheet_name}{}", settings.format.extension()))
}

/// Reads the sheet index, if the content directory has one.
pub fn load_index(workspace: &Path, settings: &Settings) -> Result<Option<IndexData>> {
    let path = index_file_path(workspace, settings);
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(&path)?;
    Ok(Some(deserialize(&data, settings.format)?))
}

/// Loads every sheet file in the content directory, ordered by file name.
///
/// A file that fails to deserialize is skipped with a warning; a corrupt
/// sheet must not take the rest of the store down with it.
pub fn load_all_sheets(workspace: &Path, settings: &Settings) -> Result<Vec<SheetData>> {
    let root = contents_dir(workspace);
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let extension = settings.format.extension();
    let mut paths: Vec<PathBuf> = fs::read_dir(&root)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.file_name().is_some_and(|name| {
            name.to_string_lossy().ends_with(extension)
        }))
        .collect();
    paths.sort();

    let mut sheets = Vec::new();
    for path in paths {
        match load_sheet(&path, settings.format) {
            Some(sheet) => {
                debug!(sheet = %sheet.display_name, "loaded sheet data");
                sheets.push(sheet);
            }
            None => warn!(file = %path.display(), "skipping unreadable sheet file"),
        }
    }

    Ok(sheets)
}

/// Loads one sheet file, returning `None` when the file is missing or
/// cannot be deserialized.
pub fn load_sheet(path: &Path, format: FileFormat) -> Option<SheetData> {
    let data = fs::read_to_string(path).ok()?;
    deserialize(&data, format).ok()
}

/// Loads the previously exported sheet with the given identifier, if any.
pub fn load_sheet_by_name(
    workspace: &Path,
    sheet_name: &str,
    settings: &Settings,
) -> Option<SheetData> {
    let path = sheet_file_path(workspace, sheet_name, settings);
    if !path.exists() {
        return None;
    }
    load_sheet(&path, settings.format)
}

/// Wipes the content directory and writes one file per non-empty sheet.
///
/// The wipe guarantees that records of sheets removed from the workbook
/// never survive into the new store state.
pub fn write_all_sheets(workspace: &Path, sheets: &[SheetData], settings: &Settings) -> Result<()> {
    let root = contents_dir(workspace);
    fsutil::clean_directory(&root)?;

    for sheet in sheets {
        if sheet.sheet_name.is_empty() || sheet.records.is_empty() {
            continue;
        }

        let path = sheet_file_path(workspace, &sheet.sheet_name, settings);
        fs::write(&path, serialize(sheet, settings.format)?)?;
        info!(sheet = %sheet.sheet_name, records = sheet.records.len(), "wrote sheet data");
    }

    Ok(())
}

/// Writes the sheet index into the existing content directory.
pub fn write_index(workspace: &Path, index: &IndexData, settings: &Settings) -> Result<()> {
    let root = contents_dir(workspace);
    if !root.is_dir() {
        return Err(ToolError::ContentsDirectoryMissing(root));
    }

    let path = index_file_path(workspace, settings);
    fs::write(&path, serialize(index, settings.format)?)?;
    Ok(())
}

fn serialize<T: Serialize>(value: &T, format: FileFormat) -> Result<String> {
    match format {
        FileFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        FileFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

fn deserialize<T: DeserializeOwned>(data: &str, format: FileFormat) -> Result<T> {
    match format {
        FileFormat::Json => Ok(serde_json::from_str(data)?),
        FileFormat::Yaml => Ok(serde_yaml::from_str(data)?),
    }
}
