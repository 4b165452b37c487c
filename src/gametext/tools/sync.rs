use std::path::Path;

use tracing::{info, instrument, warn};

use crate::gametext::tools::config::Settings;
use crate::gametext::tools::error::Result;
use crate::gametext::tools::io::{excel_read, excel_write};
use crate::gametext::tools::model::IndexData;
use crate::gametext::tools::store;

/// Rebuilds the edit workbook from the structured store.
#[instrument(level = "info", skip_all, fields(workspace = %workspace.display()))]
pub fn import(workspace: &Path, settings: &Settings) -> Result<()> {
    let index = store::load_index(workspace, settings)?;
    let sheets = store::load_all_sheets(workspace, settings)?;
    info!(sheet_count = sheets.len(), "loaded sheet data from store");

    excel_write::build_edit_workbook(workspace, index.as_ref(), &sheets, settings)
}

/// Extracts structured sheets from the edit workbook into the store,
/// preserving identities established by previous exports.
#[instrument(level = "info", skip_all, fields(workspace = %workspace.display()))]
pub fn export(workspace: &Path, settings: &Settings) -> Result<()> {
    let Some(sheets) = excel_read::read_workbook(workspace, settings)? else {
        warn!("edit workbook not found, nothing to export");
        return Ok(());
    };
    info!(sheet_count = sheets.len(), "read sheet data from workbook");

    store::write_all_sheets(workspace, &sheets, settings)?;

    let index = IndexData {
        sheet_names: sheets
            .iter()
            .filter(|sheet| !sheet.records.is_empty())
            .map(|sheet| sheet.sheet_name.clone())
            .collect(),
    };
    store::write_index(workspace, &index, settings)
}
