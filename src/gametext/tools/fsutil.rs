use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::gametext::tools::error::{Result, ToolError};

const DELETE_POLL_ATTEMPTS: u32 = 50;
const DELETE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Deletes and recreates a directory.
///
/// Directory deletion can complete asynchronously on some platforms, so
/// recreation waits until the path is actually gone before calling
/// `create_dir_all`. The wait is bounded; a path that never disappears
/// surfaces as [`ToolError::DirectoryCleanup`].
pub fn clean_directory(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }

    let mut attempts = 0;
    while path.exists() {
        if attempts >= DELETE_POLL_ATTEMPTS {
            return Err(ToolError::DirectoryCleanup(path.to_path_buf()));
        }
        attempts += 1;
        thread::sleep(DELETE_POLL_INTERVAL);
    }

    fs::create_dir_all(path)?;
    Ok(())
}

/// Whether another process currently holds the file open.
///
/// Opening for exclusive read/write fails while a spreadsheet
/// application has the workbook open. A missing file is not locked.
pub fn is_file_locked(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .is_err()
}
