use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::gametext::tools::error::{Result, ToolError};

/// File name of the per-workspace settings record.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Serialization format used for the content directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// File extension (with leading dot) for sheet files in this format.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => ".json",
            FileFormat::Yaml => ".yaml",
        }
    }
}

/// Typed settings record loaded once per run.
///
/// Every field is read from `settings.json` in the workspace root; there
/// is no runtime reflection involved, unknown keys are simply ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Store serialization format.
    pub format: FileFormat,
    /// File name of the generated edit workbook, relative to the
    /// workspace. The `.xlsx` extension is enforced.
    pub edit_excel_file_name: String,
    /// Path of the pristine workbook copied to create the edit workbook.
    /// Relative paths resolve against the workspace.
    pub excel_template_path: PathBuf,
    /// Name of the template worksheet, matched case-insensitively.
    pub template_sheet_name: String,
    /// Worksheet names excluded from export, matched exactly.
    #[serde(default)]
    pub ignore_sheet_names: Vec<String>,
}

impl Settings {
    /// Loads the settings record from `settings.json` in the workspace.
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            return Err(ToolError::MissingSettings(path));
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Absolute path of the edit workbook inside the workspace.
    pub fn edit_excel_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(Path::new(&self.edit_excel_file_name).with_extension("xlsx"))
    }

    /// Absolute path of the template workbook the edit file is copied from.
    pub fn template_excel_path(&self, workspace: &Path) -> PathBuf {
        if self.excel_template_path.is_absolute() {
            self.excel_template_path.clone()
        } else {
            workspace.join(&self.excel_template_path)
        }
    }

    /// File stem used for the sheet index file.
    pub fn index_file_stem(&self) -> String {
        Path::new(&self.edit_excel_file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.edit_excel_file_name.clone())
    }

    /// Whether the given worksheet name designates the template sheet.
    pub fn is_template_sheet(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.template_sheet_name)
    }

    /// Whether the given worksheet name is excluded from export.
    pub fn is_ignored_sheet(&self, name: &str) -> bool {
        self.ignore_sheet_names.iter().any(|ignored| ignored == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_parse_from_json() {
        let raw = r#"{
            "format": "yaml",
            "editExcelFileName": "GameText",
            "excelTemplatePath": "template/origin.xlsx",
            "templateSheetName": "Template",
            "ignoreSheetNames": ["Notes", "Readme"]
        }"#;
        let settings: Settings = serde_json::from_str(raw).expect("settings parsed");

        assert_eq!(settings.format, FileFormat::Yaml);
        assert_eq!(settings.format.extension(), ".yaml");
        assert!(settings.is_template_sheet("TEMPLATE"));
        assert!(settings.is_ignored_sheet("Notes"));
        assert!(!settings.is_ignored_sheet("notes"));
        assert_eq!(settings.index_file_stem(), "GameText");
        assert_eq!(
            settings.edit_excel_path(Path::new("/ws")),
            PathBuf::from("/ws/GameText.xlsx")
        );
    }
}
