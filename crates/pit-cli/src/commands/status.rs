//! Status command implementation

use std::path::Path;

use colored::Colorize;
use pit_core::DocumentStatus;

use crate::context;
use crate::error::Result;

/// Run the status command
pub fn run_status(path: &Path, container: Option<&Path>) -> Result<()> {
    let engine = context::open_engine(path, container)?;

    if !engine.manifest_store().exists()? {
        println!("{}", "No collection initialized".red().bold());
        println!();
        println!("Run {} to create one.", "pit init".cyan());
        return Ok(());
    }

    let report = engine.status()?;

    println!("{}", "Collection Status".bold());
    println!();
    println!("{}:   {}", "Name".dimmed(), report.collection.cyan());
    println!("{}:  {}", "Token".dimmed(), report.remote_token.yellow());
    println!();

    println!("{}:", "Documents".bold());
    if report.documents.is_empty() {
        println!("  {} (use {} to add)", "None".dimmed(), "pit add".cyan());
        return Ok(());
    }

    let width = report
        .documents
        .iter()
        .map(|d| d.local_name.len())
        .max()
        .unwrap_or(0);
    for doc in &report.documents {
        let label = match &doc.status {
            DocumentStatus::Synced => doc.status.label().green(),
            DocumentStatus::NotYetPushed
            | DocumentStatus::PendingPush
            | DocumentStatus::Deleted
            | DocumentStatus::LocallyModifiedUnstaged => doc.status.label().yellow(),
            DocumentStatus::DivergedRemotely | DocumentStatus::Unavailable { .. } => {
                doc.status.label().red()
            }
        };
        print!("  {:<width$}  {}", doc.local_name, label);
        match &doc.status {
            DocumentStatus::Synced => print!(" as {}", doc.remote_name.dimmed()),
            DocumentStatus::Unavailable { message } => print!(" ({})", message.dimmed()),
            _ => {}
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn status_without_collection_is_ok() {
        let work = TempDir::new().unwrap();
        let container = TempDir::new().unwrap();
        assert!(run_status(work.path(), Some(container.path())).is_ok());
    }
}
