//! Fixed file and directory names used by Pit.
//!
//! These names are part of the on-disk contract: renaming any of them
//! orphans collections and accounts created by earlier versions.

use std::path::Path;

/// Well-known Pit filesystem names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitPath {
    /// The collection manifest at the root of a working directory
    Manifest,
    /// The per-user application folder under the home directory
    AppFolder,
    /// The account file inside the application folder
    AccountFile,
    /// Optional log file inside the application folder
    LogFile,
}

impl PitPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "pit.json",
            Self::AppFolder => ".pit",
            Self::AccountFile => "account.toml",
            Self::LogFile => "log.txt",
        }
    }
}

impl AsRef<Path> for PitPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PitPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
