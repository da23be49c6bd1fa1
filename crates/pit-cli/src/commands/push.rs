//! Push command implementation

use std::path::Path;

use colored::Colorize;
use pit_core::PushOutcome;

use crate::context;
use crate::error::{CliError, Result};

/// Run the push command
///
/// Every document is attempted; the command fails afterwards if any of
/// them ended in a conflict or error.
pub fn run_push(path: &Path, container: Option<&Path>) -> Result<()> {
    println!("{} Pushing collection...", "=>".blue().bold());

    let engine = context::open_engine(path, container)?;
    let report = engine.push()?;

    for item in &report.items {
        let name = item.local_name.cyan();
        match &item.outcome {
            PushOutcome::Uploaded { .. } => {
                println!("   {} {} uploaded", "+".green(), name);
            }
            PushOutcome::Skipped => {
                println!("   {} {} up to date", "=".dimmed(), name);
            }
            PushOutcome::LocalMissing => {
                println!("   {} {} missing locally", "-".yellow(), name);
            }
            PushOutcome::Unstaged => println!(
                "   {} {} changed since add (run {})",
                "~".yellow(),
                name,
                format!("pit add {}", item.local_name).cyan()
            ),
            PushOutcome::Conflict { .. } => println!(
                "   {} {} {}: remote was changed elsewhere, not uploaded",
                "!".red(),
                name,
                "CONFLICT".red().bold()
            ),
            PushOutcome::IntegrityError { expected, found } => println!(
                "   {} {} {}: expected {}, remote reports {}",
                "!".red(),
                name,
                "INTEGRITY".red().bold(),
                expected,
                found.as_deref().unwrap_or("no digest")
            ),
            PushOutcome::Failed { message } => {
                println!("   {} {} {}: {}", "!".red(), name, "FAILED".red().bold(), message);
            }
        }
    }

    let failed = report.items.iter().filter(|i| i.outcome.is_failure()).count();
    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} document(s) could not be pushed"
        )));
    }

    let uploads = report.uploads().count();
    if uploads > 0 {
        println!("{} Pushed {} document(s).", "OK".green().bold(), uploads);
    } else if report.manifest_uploaded {
        println!("{} Collection manifest uploaded.", "OK".green().bold());
    } else {
        println!("{} Nothing to push.", "OK".green().bold());
    }
    Ok(())
}
