//! SyncEngine implementation
//!
//! The SyncEngine coordinates state between the local working directory,
//! the manifest (`pit.json`) and a remote [`ObjectStore`].
//!
//! Every operation loads the manifest once at the start and saves it at
//! most once at the end. Remote calls are made one document at a time, in
//! manifest order.

use std::fs;
use std::path::{Path, PathBuf};

use pit_fs::checksum::{compute_bytes_checksum, compute_file_checksum};
use pit_fs::{NormalizedPath, RobustnessConfig, io};

use crate::collection::{AddOutcome, Collection, Document, manifest_object_name};
use crate::manifest::{self, ManifestStore};
use crate::remote::{DIGEST_METADATA_KEY, ObjectHead, ObjectStore, StoreResult, content_type_for};
use crate::{Error, Result, token};

use super::report::{
    AddReport, CloneReport, DigestMismatch, DocumentState, DocumentStatus, PushItem, PushOutcome,
    PushReport, StatusReport,
};

/// Name used by `init` when the root has no usable directory name
const FALLBACK_COLLECTION_NAME: &str = "collection";

/// How a remote object relates to a document's recorded versions
#[derive(Debug, PartialEq, Eq)]
enum RemoteState {
    /// Holds the current digest under the recorded tag
    UpToDate,
    /// Holds content this document has moved past; safe to overwrite
    Replaceable,
    /// Holds content the document cannot account for
    Unaccounted { digest: Option<String> },
}

/// Settings for a [`SyncEngine`].
///
/// The engine reads nothing from the environment; everything it needs is
/// passed in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Working directory that holds `pit.json` and the tracked files
    pub root: NormalizedPath,
}

impl EngineConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: NormalizedPath::new(root),
        }
    }
}

/// Engine for synchronizing a collection with a remote store
///
/// The SyncEngine provides the main operations:
/// - **init**: Create a new collection in the working directory
/// - **status**: Compare local files, manifest and remote
/// - **add**: Register the current content of a local file
/// - **push**: Upload registered changes, refusing to clobber remote edits
/// - **clone_collection**: Materialize a remote collection locally
pub struct SyncEngine {
    config: EngineConfig,
    manifest: ManifestStore,
    store: Box<dyn ObjectStore>,
}

impl SyncEngine {
    /// Create a new SyncEngine over `store`.
    pub fn new(config: EngineConfig, store: Box<dyn ObjectStore>) -> Self {
        let manifest = ManifestStore::new(&config.root);
        Self {
            config,
            manifest,
            store,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.config.root
    }

    pub fn manifest_store(&self) -> &ManifestStore {
        &self.manifest
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Load the current collection.
    pub fn collection(&self) -> Result<Collection> {
        self.manifest.load()
    }

    /// Create a collection in the working directory.
    ///
    /// `local_name` defaults to the root directory's name.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyInitialized`] if a manifest already exists.
    pub fn init(&self, local_name: Option<&str>) -> Result<Collection> {
        if self.manifest.exists()? {
            return Err(Error::AlreadyInitialized {
                path: self.manifest.path().to_native(),
            });
        }
        fs::create_dir_all(self.config.root.to_native())?;

        let name = match local_name {
            Some(name) => name.to_string(),
            None => self.default_name()?,
        };
        let collection = Collection::new(name, token::generate_collection_token());
        self.manifest.save(&collection)?;

        tracing::info!(
            collection = %collection.local_name,
            token = collection.remote_token(),
            "initialized collection"
        );
        Ok(collection)
    }

    fn default_name(&self) -> Result<String> {
        let root = NormalizedPath::canonicalize(self.config.root.to_native())?;
        Ok(root
            .file_name()
            .unwrap_or(FALLBACK_COLLECTION_NAME)
            .to_string())
    }

    /// Report per-document state. Performs no writes, local or remote.
    pub fn status(&self) -> Result<StatusReport> {
        let collection = self.manifest.load()?;

        let mut documents = Vec::with_capacity(collection.documents().len());
        for doc in collection.documents() {
            let status = self.document_status(&collection, doc)?;
            tracing::debug!(document = doc.local_name(), status = status.label(), "status");
            documents.push(DocumentState {
                local_name: doc.local_name().to_string(),
                remote_name: collection.remote_name(doc.local_name()),
                status,
            });
        }

        Ok(StatusReport {
            collection: collection.local_name.clone(),
            remote_token: collection.remote_token().to_string(),
            documents,
        })
    }

    fn document_status(&self, collection: &Collection, doc: &Document) -> Result<DocumentStatus> {
        let path = self.config.root.join(doc.local_name());
        if !path.is_file() {
            return Ok(DocumentStatus::Deleted);
        }
        if compute_file_checksum(&path.to_native())? != doc.current_digest() {
            return Ok(DocumentStatus::LocallyModifiedUnstaged);
        }

        let remote_name = collection.remote_name(doc.local_name());
        let state = self
            .store
            .head(&remote_name)
            .and_then(|head| self.remote_state(doc, &remote_name, &head));
        let status = match state {
            Ok(RemoteState::UpToDate) => DocumentStatus::Synced,
            Ok(RemoteState::Replaceable) => DocumentStatus::PendingPush,
            Ok(RemoteState::Unaccounted { .. }) => DocumentStatus::DivergedRemotely,
            Err(e) if e.is_not_found() => DocumentStatus::NotYetPushed,
            Err(e) => DocumentStatus::Unavailable {
                message: e.to_string(),
            },
        };
        Ok(status)
    }

    /// Classify an existing remote object against `doc`.
    ///
    /// An object without a digest stamp is left behind by an upload that
    /// failed after `put`; its content is fetched and hashed instead.
    fn remote_state(
        &self,
        doc: &Document,
        remote_name: &str,
        head: &ObjectHead,
    ) -> StoreResult<RemoteState> {
        if let Some(remote) = head.digest() {
            let state = if remote == doc.current_digest()
                && head.version_tag == doc.remote_version_tag()
            {
                RemoteState::UpToDate
            } else if doc.has_superseded(remote) {
                RemoteState::Replaceable
            } else {
                RemoteState::Unaccounted {
                    digest: Some(remote.to_string()),
                }
            };
            return Ok(state);
        }

        let found = compute_bytes_checksum(&self.store.get(remote_name)?);
        tracing::debug!(object = remote_name, %found, "remote object has no digest stamp");
        if found == doc.current_digest() || doc.has_superseded(&found) {
            Ok(RemoteState::Replaceable)
        } else {
            Ok(RemoteState::Unaccounted { digest: None })
        }
    }

    /// Register the current content of a local file.
    ///
    /// Relative paths are resolved against the root. The manifest is only
    /// written when the outcome is not [`AddOutcome::AlreadyUpToDate`].
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] if `path` is not an existing regular file,
    /// [`Error::OutsideCollection`] if it lies outside the root.
    pub fn add(&self, path: impl AsRef<Path>) -> Result<AddReport> {
        let mut collection = self.manifest.load()?;
        let local_name = self.local_name_for(path.as_ref())?;
        let file = self.config.root.join(&local_name);
        let digest = compute_file_checksum(&file.to_native())?;

        let outcome = collection.register(&local_name, &digest);
        match &outcome {
            AddOutcome::AlreadyUpToDate => {
                tracing::debug!(document = %local_name, "already up to date");
            }
            AddOutcome::Added | AddOutcome::Updated { .. } => {
                collection.touch();
                self.manifest.save(&collection)?;
                tracing::info!(document = %local_name, %digest, ?outcome, "registered");
            }
        }

        Ok(AddReport {
            local_name,
            digest,
            outcome,
        })
    }

    /// Root-relative, forward-slash name of a local file.
    fn local_name_for(&self, path: &Path) -> Result<String> {
        let candidate: PathBuf = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.root.to_native().join(path)
        };
        if !candidate.is_file() {
            return Err(Error::FileNotFound { path: candidate });
        }

        let root = NormalizedPath::canonicalize(self.config.root.to_native())?;
        let file = NormalizedPath::canonicalize(&candidate)?;
        let name = file
            .relative_to(&root)
            .ok_or_else(|| Error::OutsideCollection {
                path: candidate.clone(),
            })?;
        if name == pit_fs::PitPath::Manifest.as_str() {
            return Err(Error::OutsideCollection { path: candidate });
        }
        Ok(name)
    }

    /// Upload every registered change.
    ///
    /// Each document is decided independently; a conflict or store failure
    /// on one never stops the others. If anything was uploaded, the
    /// manifest is saved and then uploaded as `<token>.json`. The manifest
    /// object is also uploaded when it lags behind documents that are
    /// already up to date remotely, which finishes an earlier push that
    /// failed at that step.
    ///
    /// # Errors
    ///
    /// Manifest errors, local I/O errors and a failed manifest upload abort
    /// the whole push. Version tags recorded before a local I/O error are
    /// still saved.
    pub fn push(&self) -> Result<PushReport> {
        let mut collection = self.manifest.load()?;
        let mut report = PushReport::default();

        for index in 0..collection.documents().len() {
            let local_name = collection.documents()[index].local_name().to_string();
            let remote_name = collection.remote_name(&local_name);
            let doc = &mut collection.documents_mut()[index];

            let outcome = match self.push_document(doc, &remote_name) {
                Ok(outcome) => outcome,
                Err(e) => {
                    if report.uploads().next().is_some() {
                        collection.touch();
                        self.manifest.save(&collection)?;
                    }
                    return Err(e);
                }
            };
            report.items.push(PushItem {
                local_name,
                remote_name,
                outcome,
            });
        }

        let uploaded = report.uploads().next().is_some();
        if uploaded {
            collection.touch();
            self.manifest.save(&collection)?;
        }

        if uploaded || self.remote_manifest_behind(&collection, &report)? {
            let name = collection.manifest_object_name();
            let bytes = manifest::to_bytes(&collection)?;
            self.store.put(&name, &bytes, content_type_for(&name))?;
            report.manifest_uploaded = true;
            tracing::info!(object = %name, "manifest uploaded");
        }

        Ok(report)
    }

    /// Whether the remote manifest misses a push this collection verified.
    ///
    /// Only documents that were skipped as up to date are compared: their
    /// remote object still carries the tag we recorded, so no other writer
    /// has touched them since.
    fn remote_manifest_behind(&self, collection: &Collection, report: &PushReport) -> Result<bool> {
        let mut skipped = report
            .items
            .iter()
            .filter(|i| i.outcome == PushOutcome::Skipped)
            .filter_map(|i| collection.document(&i.local_name))
            .peekable();
        if skipped.peek().is_none() {
            return Ok(false);
        }

        let name = collection.manifest_object_name();
        let remote = match self.store.get(&name) {
            Ok(bytes) => match manifest::from_bytes(&bytes, &name) {
                Ok(remote) => remote,
                Err(e) => {
                    tracing::warn!(object = %name, error = %e, "remote manifest unreadable");
                    return Ok(true);
                }
            },
            Err(e) if e.is_not_found() => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let behind = skipped.any(|local| {
            remote.document(local.local_name()).is_none_or(|r| {
                r.current_digest() != local.current_digest()
                    || r.remote_version_tag() != local.remote_version_tag()
            })
        });
        if behind {
            tracing::debug!(object = %name, "remote manifest is behind");
        }
        Ok(behind)
    }

    fn push_document(&self, doc: &mut Document, remote_name: &str) -> Result<PushOutcome> {
        let path = self.config.root.join(doc.local_name());
        if !path.is_file() {
            tracing::warn!(document = doc.local_name(), "registered file is missing");
            return Ok(PushOutcome::LocalMissing);
        }
        let content = io::read_bytes(&path)?;
        if compute_bytes_checksum(&content) != doc.current_digest() {
            tracing::warn!(document = doc.local_name(), "content changed since add, skipping");
            return Ok(PushOutcome::Unstaged);
        }

        let state = self
            .store
            .head(remote_name)
            .and_then(|head| self.remote_state(doc, remote_name, &head));
        match state {
            Ok(RemoteState::UpToDate) => {
                tracing::debug!(document = doc.local_name(), "remote up to date");
                return Ok(PushOutcome::Skipped);
            }
            Ok(RemoteState::Replaceable) => {}
            Ok(RemoteState::Unaccounted { digest }) => {
                tracing::warn!(
                    document = doc.local_name(),
                    remote_digest = ?digest,
                    "remote changed elsewhere, refusing to overwrite"
                );
                return Ok(PushOutcome::Conflict {
                    remote_digest: digest,
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                return Ok(PushOutcome::Failed {
                    message: e.to_string(),
                });
            }
        }

        Ok(self.upload(doc, remote_name, &content))
    }

    /// `put`, stamp the digest, then read it back before trusting the tag.
    fn upload(&self, doc: &mut Document, remote_name: &str, content: &[u8]) -> PushOutcome {
        let digest = doc.current_digest().to_string();
        let written = self
            .store
            .put(remote_name, content, content_type_for(remote_name))
            .and_then(|()| {
                self.store
                    .set_custom_metadata(remote_name, DIGEST_METADATA_KEY, &digest)
            })
            .and_then(|()| self.store.head(remote_name));

        let head = match written {
            Ok(head) => head,
            Err(e) => {
                tracing::warn!(document = doc.local_name(), error = %e, "upload failed");
                return PushOutcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        if head.digest() != Some(digest.as_str()) {
            tracing::warn!(
                document = doc.local_name(),
                expected = %digest,
                found = ?head.digest(),
                "remote digest does not match upload"
            );
            return PushOutcome::IntegrityError {
                expected: digest,
                found: head.digest().map(str::to_string),
            };
        }

        doc.record_push(head.version_tag.clone());
        tracing::info!(document = doc.local_name(), object = remote_name, "uploaded");
        PushOutcome::Uploaded {
            version_tag: head.version_tag,
        }
    }

    /// Names of every remote object this collection owns, manifest included.
    pub fn remote_objects(&self) -> Result<Vec<String>> {
        let collection = self.manifest.load()?;
        let token = collection.remote_token();
        let document_prefix = collection.remote_name("");
        let manifest_name = collection.manifest_object_name();

        Ok(self
            .store
            .list(token)?
            .into_iter()
            .filter(|n| n.starts_with(&document_prefix) || *n == manifest_name)
            .collect())
    }

    /// Download the collection `token` into `destination`.
    ///
    /// `destination` must not exist or be an empty directory. Documents
    /// whose downloaded content does not match the manifest are written
    /// anyway and reported in [`CloneReport::mismatches`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidToken`], [`Error::DestinationNotEmpty`],
    /// [`Error::TokenMismatch`], or the first store or I/O failure.
    pub fn clone_collection(
        store: &dyn ObjectStore,
        token: &str,
        destination: impl AsRef<Path>,
    ) -> Result<CloneReport> {
        if !token::is_valid(token) {
            return Err(Error::InvalidToken {
                token: token.to_string(),
            });
        }
        let destination = destination.as_ref();
        ensure_empty_destination(destination)?;

        let object = manifest_object_name(token);
        let bytes = store.get(&object)?;
        let collection = manifest::from_bytes(&bytes, &object)?;
        if collection.remote_token() != token {
            return Err(Error::TokenMismatch {
                expected: token.to_string(),
                found: collection.remote_token().to_string(),
            });
        }

        fs::create_dir_all(destination)?;
        let root = NormalizedPath::new(destination);
        let mut report = CloneReport {
            collection: collection.local_name.clone(),
            remote_token: token.to_string(),
            downloaded: Vec::new(),
            mismatches: Vec::new(),
        };

        for doc in collection.documents() {
            let content = store.get(&collection.remote_name(doc.local_name()))?;
            io::write_atomic(
                &root.join(doc.local_name()),
                &content,
                RobustnessConfig::default(),
            )?;

            let found = compute_bytes_checksum(&content);
            if found != doc.current_digest() {
                tracing::warn!(
                    document = doc.local_name(),
                    expected = doc.current_digest(),
                    %found,
                    "downloaded content does not match manifest"
                );
                report.mismatches.push(DigestMismatch {
                    local_name: doc.local_name().to_string(),
                    expected: doc.current_digest().to_string(),
                    found,
                });
            }
            report.downloaded.push(doc.local_name().to_string());
        }

        ManifestStore::new(&root).save(&collection)?;
        tracing::info!(
            collection = %collection.local_name,
            documents = report.downloaded.len(),
            "cloned"
        );
        Ok(report)
    }
}

fn ensure_empty_destination(destination: &Path) -> Result<()> {
    if !destination.exists() {
        return Ok(());
    }
    let not_empty = || Error::DestinationNotEmpty {
        path: destination.to_path_buf(),
    };
    if !destination.is_dir() {
        return Err(not_empty());
    }
    if fs::read_dir(destination)?.next().is_some() {
        return Err(not_empty());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryStore;
    use tempfile::tempdir;

    fn engine(root: &Path) -> (SyncEngine, MemoryStore) {
        let store = MemoryStore::new();
        let engine = SyncEngine::new(EngineConfig::new(root), Box::new(store.clone()));
        (engine, store)
    }

    #[test]
    fn init_defaults_name_to_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("holiday-photos");
        std::fs::create_dir(&root).unwrap();
        let (engine, _) = engine(&root);

        let collection = engine.init(None).unwrap();
        assert_eq!(collection.local_name, "holiday-photos");
        assert!(token::is_valid(collection.remote_token()));
        assert_eq!(collection.created(), collection.updated());
    }

    #[test]
    fn adding_the_manifest_itself_is_rejected() {
        let dir = tempdir().unwrap();
        let (engine, _) = engine(dir.path());
        engine.init(Some("notes")).unwrap();

        assert!(matches!(
            engine.add("pit.json"),
            Err(Error::OutsideCollection { .. })
        ));
    }

    #[test]
    fn destination_checks() {
        let dir = tempdir().unwrap();
        assert!(ensure_empty_destination(&dir.path().join("missing")).is_ok());
        assert!(ensure_empty_destination(dir.path()).is_ok());

        std::fs::write(dir.path().join("x"), "x").unwrap();
        assert!(matches!(
            ensure_empty_destination(dir.path()),
            Err(Error::DestinationNotEmpty { .. })
        ));
        assert!(matches!(
            ensure_empty_destination(&dir.path().join("x")),
            Err(Error::DestinationNotEmpty { .. })
        ));
    }

    #[test]
    fn remote_objects_lists_documents_and_manifest_only() {
        let dir = tempdir().unwrap();
        let (engine, store) = engine(dir.path());
        let collection = engine.init(Some("notes")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        engine.add("a.txt").unwrap();
        engine.push().unwrap();

        // Another collection whose token shares our prefix
        let token = collection.remote_token();
        store
            .put(&format!("{token}x-other"), b"", "text/plain")
            .unwrap();

        assert_eq!(
            engine.remote_objects().unwrap(),
            vec![format!("{token}-a.txt"), format!("{token}.json")]
        );
    }
}
