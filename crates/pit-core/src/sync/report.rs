//! Report types returned by SyncEngine operations
//!
//! Operations never print; they return one of these and the caller decides
//! how to render it.

use serde::{Deserialize, Serialize};

use crate::collection::AddOutcome;

/// State of one document relative to the manifest and the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Local file, manifest and remote all agree
    Synced,
    /// The local file no longer exists
    Deleted,
    /// The local file differs from the registered digest
    LocallyModifiedUnstaged,
    /// No remote object yet
    NotYetPushed,
    /// The remote holds a version we superseded locally; a push will upload
    PendingPush,
    /// The remote changed in a way this manifest does not account for
    DivergedRemotely,
    /// The remote could not be queried
    Unavailable { message: String },
}

impl DocumentStatus {
    /// Short human label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::Deleted => "deleted",
            Self::LocallyModifiedUnstaged => "modified (not added)",
            Self::NotYetPushed => "not yet pushed",
            Self::PendingPush => "pending push",
            Self::DivergedRemotely => "diverged remotely",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// One row of a [`StatusReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    pub local_name: String,
    /// Object name the document is shared under
    pub remote_name: String,
    pub status: DocumentStatus,
}

/// Result of [`SyncEngine::status`](super::SyncEngine::status)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub collection: String,
    pub remote_token: String,
    /// One entry per document, in manifest order
    pub documents: Vec<DocumentState>,
}

impl StatusReport {
    /// Status of a document by local name
    pub fn status_of(&self, local_name: &str) -> Option<&DocumentStatus> {
        self.documents
            .iter()
            .find(|d| d.local_name == local_name)
            .map(|d| &d.status)
    }

    /// Whether every document is [`DocumentStatus::Synced`]
    pub fn is_clean(&self) -> bool {
        self.documents
            .iter()
            .all(|d| d.status == DocumentStatus::Synced)
    }
}

/// Result of [`SyncEngine::add`](super::SyncEngine::add)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReport {
    /// Root-relative name the file is tracked under
    pub local_name: String,
    pub digest: String,
    pub outcome: AddOutcome,
}

/// What happened to one document during a push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushOutcome {
    /// Content uploaded and its digest verified
    Uploaded { version_tag: String },
    /// Remote already holds the registered content
    Skipped,
    /// The registered file is gone locally
    LocalMissing,
    /// Local content differs from the registered digest; run `add` first
    Unstaged,
    /// Remote content was changed elsewhere; nothing was uploaded
    Conflict { remote_digest: Option<String> },
    /// The store reported a different digest than the one just written
    IntegrityError {
        expected: String,
        found: Option<String>,
    },
    /// A store call failed for this document
    Failed { message: String },
}

impl PushOutcome {
    /// Whether this outcome should make the overall push fail
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::IntegrityError { .. } | Self::Failed { .. }
        )
    }
}

/// Per-document entry of a [`PushReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushItem {
    pub local_name: String,
    pub remote_name: String,
    pub outcome: PushOutcome,
}

/// Result of [`SyncEngine::push`](super::SyncEngine::push)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReport {
    pub items: Vec<PushItem>,
    /// Whether the manifest was saved and uploaded
    pub manifest_uploaded: bool,
}

impl PushReport {
    /// Documents that were uploaded
    pub fn uploads(&self) -> impl Iterator<Item = &PushItem> {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, PushOutcome::Uploaded { .. }))
    }

    /// Documents refused because of a remote conflict
    pub fn conflicts(&self) -> impl Iterator<Item = &PushItem> {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, PushOutcome::Conflict { .. }))
    }

    /// Outcome for a document by local name
    pub fn outcome_of(&self, local_name: &str) -> Option<&PushOutcome> {
        self.items
            .iter()
            .find(|i| i.local_name == local_name)
            .map(|i| &i.outcome)
    }

    /// Whether any document ended in a conflict or error
    pub fn has_failures(&self) -> bool {
        self.items.iter().any(|i| i.outcome.is_failure())
    }
}

/// A downloaded document whose content does not match the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestMismatch {
    pub local_name: String,
    pub expected: String,
    pub found: String,
}

/// Result of [`SyncEngine::clone_collection`](super::SyncEngine::clone_collection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneReport {
    pub collection: String,
    pub remote_token: String,
    /// Local names written under the destination
    pub downloaded: Vec<String>,
    pub mismatches: Vec<DigestMismatch>,
}
