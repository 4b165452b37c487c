use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gametext_tools::config::Settings;
use gametext_tools::{Result, ToolError, fsutil, sync};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;

    let workspace = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let settings = Settings::load(&workspace)?;

    // A workbook held open by a spreadsheet application must fail fast,
    // before either mode touches any file.
    let edit_path = settings.edit_excel_path(&workspace);
    if fsutil::is_file_locked(&edit_path) {
        return Err(ToolError::FileLocked(edit_path));
    }

    match cli.command {
        Command::Import => sync::import(&workspace, &settings),
        Command::Export => sync::export(&workspace, &settings),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert game localization text between an edit workbook and a structured store."
)]
struct Cli {
    /// Workspace directory holding the settings file, the edit workbook,
    /// and the content directory. Defaults to the current directory.
    #[arg(long)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the edit workbook from the structured store.
    Import,
    /// Extract the edit workbook into the structured store.
    Export,
}
