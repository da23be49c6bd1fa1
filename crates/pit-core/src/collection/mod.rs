//! Collection model
//!
//! A collection is the root record for a synchronized set of documents. It
//! is identified locally by a human label and remotely by a random token
//! that prefixes every object the collection owns.

mod document;

pub use document::Document;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Separator between the collection token and a document name in remote
/// object names.
pub const REMOTE_SEPARATOR: &str = "-";

/// Suffix of the remote object holding the manifest itself.
pub const MANIFEST_OBJECT_SUFFIX: &str = ".json";

/// Result of registering a local file with [`Collection::register`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOutcome {
    /// A new document was created
    Added,
    /// The document's digest changed; the old one moved into history
    Updated { previous: String },
    /// The file content matches the recorded digest
    AlreadyUpToDate,
}

/// Root record for a synchronized set of documents.
///
/// Field order and names are the persisted manifest format; renaming or
/// reordering them breaks manifests written by earlier versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Human label, defaults to the working directory name
    pub local_name: String,
    remote_token: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    #[serde(default)]
    documents: Vec<Document>,
}

impl Collection {
    /// Create an empty collection stamped with the current time.
    pub fn new(local_name: impl Into<String>, remote_token: impl Into<String>) -> Self {
        let now = Utc::now().trunc_subsecs(0);
        Self {
            local_name: local_name.into(),
            remote_token: remote_token.into(),
            created: now,
            updated: now,
            documents: Vec::new(),
        }
    }

    /// The remote namespace token; immutable after creation.
    pub fn remote_token(&self) -> &str {
        &self.remote_token
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub(crate) fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    /// Get a document by local name
    pub fn document(&self, local_name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.local_name() == local_name)
    }

    /// Remote object name for a document: `token-lowercase(name)`.
    pub fn remote_name(&self, local_name: &str) -> String {
        format!(
            "{}{}{}",
            self.remote_token,
            REMOTE_SEPARATOR,
            local_name.to_lowercase()
        )
    }

    /// Remote object name of the manifest itself.
    pub fn manifest_object_name(&self) -> String {
        manifest_object_name(&self.remote_token)
    }

    /// Register the current digest of a local file.
    pub fn register(&mut self, local_name: &str, digest: &str) -> AddOutcome {
        match self.documents.iter_mut().find(|d| d.local_name() == local_name) {
            None => {
                self.documents.push(Document::new(local_name, digest));
                AddOutcome::Added
            }
            Some(doc) => match doc.supersede(digest) {
                Some(previous) => AddOutcome::Updated { previous },
                None => AddOutcome::AlreadyUpToDate,
            },
        }
    }

    /// Refresh the `updated` timestamp.
    pub fn touch(&mut self) {
        self.updated = Utc::now().trunc_subsecs(0);
    }

    /// Verify invariants that the type system cannot enforce on
    /// deserialized data.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.remote_token.is_empty() {
            return Err("empty remote token".to_string());
        }
        for (i, doc) in self.documents.iter().enumerate() {
            doc.check_invariants()?;
            if self.documents[..i]
                .iter()
                .any(|d| d.local_name() == doc.local_name())
            {
                return Err(format!("duplicate document {}", doc.local_name()));
            }
        }
        Ok(())
    }
}

/// Remote object name of the manifest for a collection token.
pub fn manifest_object_name(remote_token: &str) -> String {
    format!("{remote_token}{MANIFEST_OBJECT_SUFFIX}")
}
