//! Remote object store abstraction
//!
//! The sync engine only needs five blocking operations from a store. The
//! store performs no compare-and-swap: `put` overwrites unconditionally and
//! every conflict check happens in the engine before calling it.
//!
//! Every write (content or metadata) must produce a fresh version tag, the
//! way blob services rotate ETags.

mod dir;
mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Custom metadata key under which the engine stamps a document's digest.
pub const DIGEST_METADATA_KEY: &str = "pitdigest";

/// Content type used when nothing more specific is known.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors returned by an [`ObjectStore`].
///
/// "Not found" is decided by the adapter and returned as a tagged variant;
/// callers never inspect message text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Remote object not found: {name}")]
    NotFound { name: String },

    #[error("Invalid remote object name: {name}")]
    InvalidName { name: String },

    #[error("Remote store failure on {name}: {source}")]
    Backend {
        name: String,
        #[source]
        source: pit_fs::Error,
    },

    #[error("Remote store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Properties of a stored object as returned by [`ObjectStore::head`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectHead {
    /// Opaque tag that changes on every write
    pub version_tag: String,
    pub content_type: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ObjectHead {
    /// The digest stamped by the engine, if any.
    pub fn digest(&self) -> Option<&str> {
        self.metadata.get(DIGEST_METADATA_KEY).map(String::as_str)
    }
}

/// Capability the sync engine consumes.
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's properties without its content.
    fn head(&self, name: &str) -> StoreResult<ObjectHead>;

    /// Create or overwrite an object. Custom metadata is reset.
    fn put(&self, name: &str, content: &[u8], content_type: &str) -> StoreResult<()>;

    /// Names of all objects starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Fetch an object's content.
    fn get(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Add or replace one custom metadata entry.
    fn set_custom_metadata(&self, name: &str, key: &str, value: &str) -> StoreResult<()>;
}

/// Content type hint for an object name, by extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => "application/json",
        "mp4" => "video/mp4",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "pdf" => "application/pdf",
        "html" => "text/html",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Which adapter backs a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// A directory on a local or mounted filesystem
    Local,
    /// Process memory; contents vanish on exit
    Memory,
}

/// Container settings from the account file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub kind: StoreKind,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Config for a directory-backed container.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: StoreKind::Local,
            path: Some(path.into()),
        }
    }
}

/// Construct the adapter described by `config`.
///
/// # Errors
///
/// [`Error::Config`] when the config is incomplete or the container
/// cannot be opened.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn ObjectStore>> {
    match config.kind {
        StoreKind::Memory => Ok(Box::new(MemoryStore::new())),
        StoreKind::Local => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| Error::config("local container requires a path"))?;
            let store = DirStore::open(path)
                .map_err(|e| Error::config(format!("cannot open container {}: {e}", path.display())))?;
            Ok(Box::new(store))
        }
    }
}

/// Reject names that could escape a container or address nothing.
pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || name.split('/').any(|s| s.is_empty() || s == "." || s == "..");
    if bad {
        Err(StoreError::InvalidName {
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abcdefgh.json", "application/json")]
    #[case("abcdefgh-talk.MP4", "video/mp4")]
    #[case("x-report.pdf", "application/pdf")]
    #[case("x-index.html", "text/html")]
    #[case("x-notes.txt", DEFAULT_CONTENT_TYPE)]
    #[case("x-noextension", DEFAULT_CONTENT_TYPE)]
    fn content_types(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(name), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/abs")]
    #[case("a/../b")]
    #[case("a//b")]
    #[case("a\\b")]
    fn invalid_names(#[case] name: &str) {
        assert!(validate_name(name).is_err());
    }

    #[test]
    fn local_config_without_path_is_config_error() {
        let config = StoreConfig {
            kind: StoreKind::Local,
            path: None,
        };
        assert!(matches!(open_store(&config), Err(Error::Config { .. })));
    }

    #[test]
    fn store_config_deserializes_lowercase_kind() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"kind":"local","path":"/srv/pit"}"#).unwrap();
        assert_eq!(config, StoreConfig::local("/srv/pit"));
    }
}
