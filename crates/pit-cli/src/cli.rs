//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pit - Share a folder of documents through a remote container
#[derive(Parser, Debug)]
#[command(name = "pit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory of a local container, overriding ~/.pit/account.toml
    #[arg(long, global = true, env = "PIT_CONTAINER")]
    pub container: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a Pit collection in the current directory
    Init {
        /// Collection name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Add or update a collection document
    Add {
        /// File to register, relative to the current directory
        path: PathBuf,
    },

    /// Upload new or updated documents
    Push,

    /// Show the state of every document
    Status,

    /// Download a collection by its token
    ///
    /// Examples:
    ///   pit clone kq3vx9ms           # Clone into ./kq3vx9ms
    ///   pit clone kq3vx9ms thesis    # Clone into ./thesis
    Clone {
        /// Remote token of the collection
        token: String,

        /// Target directory
        directory: Option<PathBuf>,
    },

    /// List the remote objects owned by this collection
    List,

    /// Print version information
    Version,
}
