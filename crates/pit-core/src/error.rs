//! Error types for pit-core

use std::path::PathBuf;

use crate::remote::StoreError;

/// Result type for pit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole operation.
///
/// Per-document problems found during a push (conflicts, failed
/// verification) are not errors; they are reported in
/// [`PushReport`](crate::sync::PushReport).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No manifest where one was expected
    #[error("No collection initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// `init` on a directory that already has a manifest
    #[error("Collection already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// Something other than a regular file occupies the manifest path
    #[error("A directory exists at the manifest path {path}")]
    ManifestIsDirectory { path: PathBuf },

    /// The manifest parsed but breaks a collection invariant
    #[error("Invalid manifest at {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// A local file named by the caller does not exist
    #[error("File \"{path}\" does not exist")]
    FileNotFound { path: PathBuf },

    /// A local file lies outside the collection root
    #[error("File \"{path}\" is not inside the collection directory")]
    OutsideCollection { path: PathBuf },

    /// A remote token failed its shape or checksum validation
    #[error("Invalid collection token: {token}")]
    InvalidToken { token: String },

    /// A fetched manifest belongs to a different collection
    #[error("Remote manifest belongs to {found}, expected {expected}")]
    TokenMismatch { expected: String, found: String },

    /// Clone target already has content
    #[error("Destination {path} already exists and is not empty")]
    DestinationNotEmpty { path: PathBuf },

    /// The store adapter could not be constructed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Remote store failure that cannot be attributed to one document
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Filesystem error from pit-fs
    #[error(transparent)]
    Fs(#[from] pit_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
