//! Pit CLI
//!
//! The command-line interface for sharing a folder of documents through a
//! remote container.

mod cli;
mod commands;
mod context;
mod error;

use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.container.as_deref()),
        None => {
            // No command provided - show help hint
            println!("{} Share your documents online", "pit".green().bold());
            println!();
            println!("Run {} for available commands.", "pit --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr on `--verbose`, and append to `~/.pit/log.txt` when that
/// file exists.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let console = verbose.then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::DEBUG)
    });
    let file = context::log_path()
        .and_then(|path| context::open_log_file(&path))
        .map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(level)
        });

    if tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .is_ok()
    {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands, container: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Init { name } => commands::run_init(&cwd, container, name.as_deref()),
        Commands::Add { path } => commands::run_add(&cwd, container, &path),
        Commands::Push => commands::run_push(&cwd, container),
        Commands::Status => commands::run_status(&cwd, container),
        Commands::Clone { token, directory } => {
            commands::run_clone(&cwd, container, &token, directory.as_deref())
        }
        Commands::List => commands::run_list(&cwd, container),
        Commands::Version => {
            println!("pit version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
