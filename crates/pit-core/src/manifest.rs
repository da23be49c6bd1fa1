//! Manifest persistence
//!
//! The manifest (`pit.json`) is the local, authoritative copy of a
//! [`Collection`]. It is read once at the start of an engine operation and
//! written at most once at the end.

use std::path::Path;

use pit_fs::{ConfigFormat, ConfigStore, NormalizedPath, PitPath};

use crate::collection::Collection;
use crate::{Error, Result};

/// Loads and saves the collection manifest at a fixed location.
#[derive(Debug)]
pub struct ManifestStore {
    path: NormalizedPath,
    config: ConfigStore,
}

impl ManifestStore {
    /// Manifest store for the working directory `root`.
    pub fn new(root: &NormalizedPath) -> Self {
        Self {
            path: root.join(PitPath::Manifest.as_str()),
            config: ConfigStore::new(),
        }
    }

    /// Path of the manifest file
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Whether a manifest is present.
    ///
    /// # Errors
    ///
    /// A directory at the manifest path is reported as
    /// [`Error::ManifestIsDirectory`] rather than "absent".
    pub fn exists(&self) -> Result<bool> {
        if self.path.is_dir() {
            return Err(Error::ManifestIsDirectory {
                path: self.path.to_native(),
            });
        }
        Ok(self.path.is_file())
    }

    /// Load the collection.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] if there is no manifest; parse and
    /// invariant failures otherwise.
    pub fn load(&self) -> Result<Collection> {
        if !self.exists()? {
            return Err(Error::NotInitialized {
                path: self.path.to_native(),
            });
        }
        let collection: Collection = self.config.load(&self.path)?;
        validate(&collection, &self.path.to_native())?;
        Ok(collection)
    }

    /// Overwrite the manifest atomically.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidManifest`] if `collection` would not load back; the
    /// file on disk is left untouched.
    pub fn save(&self, collection: &Collection) -> Result<()> {
        validate(collection, &self.path.to_native())?;
        self.config.save(&self.path, collection)?;
        tracing::debug!(path = %self.path, documents = collection.documents().len(), "manifest saved");
        Ok(())
    }
}

/// Serialize a collection exactly as it is written to disk.
pub fn to_bytes(collection: &Collection) -> Result<Vec<u8>> {
    let origin = Path::new(PitPath::Manifest.as_str());
    Ok(ConfigFormat::Json.render(collection, origin)?.into_bytes())
}

/// Parse a manifest fetched from the store; `origin` labels errors.
pub fn from_bytes(bytes: &[u8], origin: &str) -> Result<Collection> {
    let origin = Path::new(origin);
    let content = std::str::from_utf8(bytes).map_err(|e| Error::InvalidManifest {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    let collection: Collection = ConfigFormat::Json.parse(content, origin)?;
    validate(&collection, origin)?;
    Ok(collection)
}

fn validate(collection: &Collection, origin: &Path) -> Result<()> {
    collection
        .check_invariants()
        .map_err(|message| Error::InvalidManifest {
            path: origin.to_path_buf(),
            message,
        })
}
