//! Init command implementation
//!
//! Creates `pit.json` in the working directory.

use std::path::Path;

use colored::Colorize;

use crate::context;
use crate::error::Result;

/// Run the init command
pub fn run_init(path: &Path, container: Option<&Path>, name: Option<&str>) -> Result<()> {
    println!("{} Initializing collection...", "=>".blue().bold());

    let engine = context::open_engine(path, container)?;
    let collection = engine.init(name)?;

    println!(
        "{} Collection {} initialized (token {})",
        "OK".green().bold(),
        collection.local_name.cyan(),
        collection.remote_token().yellow()
    );
    println!();
    println!("Run {} to register documents.", "pit add <file>".cyan());
    Ok(())
}
