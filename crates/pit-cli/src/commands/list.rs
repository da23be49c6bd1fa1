//! List command implementation

use std::path::Path;

use colored::Colorize;

use crate::context;
use crate::error::Result;

/// Run the list command
///
/// Prints the names of the remote objects owned by the collection.
pub fn run_list(path: &Path, container: Option<&Path>) -> Result<()> {
    let engine = context::open_engine(path, container)?;
    let objects = engine.remote_objects()?;

    println!("{}", "Remote Objects".bold());
    println!();
    if objects.is_empty() {
        println!("  {} (use {} to upload)", "None".dimmed(), "pit push".cyan());
    }
    for name in objects {
        println!("  {}", name);
    }
    Ok(())
}
