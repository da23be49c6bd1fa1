//! Core orchestration layer for Pit
//!
//! This crate keeps a local set of files ("documents") mirrored to a remote
//! object store, implementing:
//!
//! - **Collection model**: the manifest record and its per-document digest
//!   bookkeeping
//! - **Manifest store**: atomic load/save of `pit.json`
//! - **Remote store abstraction**: the [`ObjectStore`] trait with in-memory
//!   and directory-backed adapters
//! - **SyncEngine**: status, add, push and clone, refusing to overwrite
//!   remote changes it cannot account for
//!
//! # Architecture
//!
//! `pit-core` sits above `pit-fs` and below the CLI:
//!
//! ```text
//!        pit-cli
//!           |
//!       pit-core
//!           |
//!        pit-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pit_core::{EngineConfig, MemoryStore, SyncEngine};
//!
//! fn example() -> pit_core::Result<()> {
//!     let engine = SyncEngine::new(EngineConfig::new("."), Box::new(MemoryStore::new()));
//!     engine.init(Some("notes"))?;
//!     engine.add("report.pdf")?;
//!     let report = engine.push()?;
//!     assert!(!report.has_failures());
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod error;
pub mod manifest;
pub mod remote;
pub mod sync;
pub mod token;

pub use collection::{AddOutcome, Collection, Document};
pub use error::{Error, Result};
pub use manifest::ManifestStore;
pub use remote::{
    DirStore, MemoryStore, ObjectHead, ObjectStore, StoreConfig, StoreError, StoreKind, open_store,
};
pub use sync::{
    AddReport, CloneReport, DocumentStatus, EngineConfig, PushOutcome, PushReport, StatusReport,
    SyncEngine,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_not_initialized_displays_path() {
        let path = PathBuf::from("/path/to/pit.json");
        let error = Error::NotInitialized { path: path.clone() };

        let display = format!("{}", error);
        assert!(
            display.contains("/path/to/pit.json"),
            "Error display should contain the path, got: {}",
            display
        );
    }

    #[test]
    fn store_errors_convert_transparently() {
        let error: Error = StoreError::NotFound {
            name: "abcdefgh.json".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Remote object not found: abcdefgh.json");
    }
}
