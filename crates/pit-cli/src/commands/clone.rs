//! Clone command implementation

use std::path::Path;

use colored::Colorize;
use pit_core::SyncEngine;

use crate::context;
use crate::error::Result;

/// Run the clone command
///
/// Without `directory`, the collection is cloned into `<path>/<token>`.
pub fn run_clone(
    path: &Path,
    container: Option<&Path>,
    token: &str,
    directory: Option<&Path>,
) -> Result<()> {
    let destination = match directory {
        Some(dir) => path.join(dir),
        None => path.join(token),
    };
    println!(
        "{} Cloning {} into {}...",
        "=>".blue().bold(),
        token.yellow(),
        destination.display()
    );

    let store = context::open_store(container)?;
    let report = SyncEngine::clone_collection(store.as_ref(), token, &destination)?;

    for name in &report.downloaded {
        println!("   {} {}", "+".green(), name.cyan());
    }
    for mismatch in &report.mismatches {
        println!(
            "   {} {} does not match its recorded digest",
            "!".yellow(),
            mismatch.local_name.cyan()
        );
    }
    println!(
        "{} Cloned {} ({} document(s))",
        "OK".green().bold(),
        report.collection.cyan(),
        report.downloaded.len()
    );
    Ok(())
}
