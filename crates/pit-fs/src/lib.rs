//! Filesystem layer for Pit
//!
//! Provides content digests, normalized paths, atomic writes and
//! format-agnostic config files for the crates above it.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::PitPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
