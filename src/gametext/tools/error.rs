use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while
/// converting between the edit workbook and the structured store.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when YAML parsing or serialization fails.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Errors bubbled up from the spreadsheet backend.
    #[error("workbook error: {0}")]
    Excel(#[from] umya_spreadsheet::XlsxError),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the settings file is missing from the workspace.
    #[error("settings file not found: {0}")]
    MissingSettings(PathBuf),

    /// Raised when the template workbook configured as the copy source
    /// does not exist.
    #[error("template workbook not found: {0}")]
    MissingTemplate(PathBuf),

    /// Raised when the template worksheet cannot be located in the
    /// copied workbook.
    #[error("template worksheet '{0}' not found")]
    TemplateSheetNotFound(String),

    /// Raised when a generated worksheet would overwrite an existing one.
    #[error("worksheet '{0}' already exists")]
    WorksheetCollision(String),

    /// Raised when two worksheets declare the same sheet identifier.
    #[error("duplicate sheet identifier '{0}'")]
    DuplicateSheetName(String),

    /// Raised when two rows of one worksheet declare the same enum name.
    #[error("duplicate enum name '{name}' in sheet '{sheet}'")]
    DuplicateEnumName { sheet: String, name: String },

    /// Raised when the edit workbook is held open by another process.
    #[error("file locked by another process: {0}")]
    FileLocked(PathBuf),

    /// Raised when the content directory is expected to exist but does
    /// not (the index is always written after the sheet files).
    #[error("content directory not found: {0}")]
    ContentsDirectoryMissing(PathBuf),

    /// Raised when the content directory cannot be recreated because a
    /// pending deletion never completed.
    #[error("directory still exists after cleanup: {0}")]
    DirectoryCleanup(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
