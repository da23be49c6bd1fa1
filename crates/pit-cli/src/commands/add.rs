//! Add command implementation

use std::path::Path;

use colored::Colorize;
use pit_core::AddOutcome;

use crate::context;
use crate::error::Result;

/// Run the add command
///
/// `file` is resolved against `path`, the working directory.
pub fn run_add(path: &Path, container: Option<&Path>, file: &Path) -> Result<()> {
    let engine = context::open_engine(path, container)?;
    let report = engine.add(file)?;

    match report.outcome {
        AddOutcome::Added => println!(
            "{} {} added",
            "+".green().bold(),
            report.local_name.cyan()
        ),
        AddOutcome::Updated { .. } => println!(
            "{} {} updated",
            "~".yellow().bold(),
            report.local_name.cyan()
        ),
        AddOutcome::AlreadyUpToDate => println!(
            "{} {} is already in the collection and up to date",
            "=".dimmed(),
            report.local_name.cyan()
        ),
    }
    Ok(())
}
