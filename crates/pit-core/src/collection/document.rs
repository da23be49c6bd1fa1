//! A single tracked file and its synchronization bookkeeping

use serde::{Deserialize, Serialize};

/// One tracked local file.
///
/// The digest history never contains the current digest: a digest moves
/// into history only when another one replaces it. Reverting to a digest
/// already in history takes it back out, so each digest appears at most
/// once across `current_digest` and `digest_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    local_name: String,
    #[serde(default)]
    remote_version_tag: String,
    current_digest: String,
    #[serde(default)]
    digest_history: Vec<String>,
}

impl Document {
    /// Create a document that has never been pushed.
    pub fn new(local_name: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            remote_version_tag: String::new(),
            current_digest: digest.into(),
            digest_history: Vec::new(),
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn current_digest(&self) -> &str {
        &self.current_digest
    }

    /// The store-assigned tag of the last verified upload, `""` if none.
    pub fn remote_version_tag(&self) -> &str {
        &self.remote_version_tag
    }

    pub fn digest_history(&self) -> &[String] {
        &self.digest_history
    }

    /// Whether this document has ever pushed anything.
    pub fn is_pushed(&self) -> bool {
        !self.remote_version_tag.is_empty()
    }

    /// Whether `digest` is a content version this document has superseded.
    pub fn has_superseded(&self, digest: &str) -> bool {
        self.digest_history.iter().any(|d| d == digest)
    }

    /// Replace the current digest, moving the old one into history.
    ///
    /// Returns the superseded digest, or `None` if `digest` is already current.
    pub fn supersede(&mut self, digest: impl Into<String>) -> Option<String> {
        let digest = digest.into();
        if digest == self.current_digest {
            return None;
        }
        self.digest_history.retain(|d| *d != digest);
        let previous = std::mem::replace(&mut self.current_digest, digest);
        self.digest_history.push(previous.clone());
        Some(previous)
    }

    /// Record a verified upload of the current content.
    pub(crate) fn record_push(&mut self, version_tag: impl Into<String>) {
        self.remote_version_tag = version_tag.into();
    }

    /// Invariant check used when loading a manifest from disk or the store.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        if self.local_name.is_empty() {
            return Err("document with empty local name".to_string());
        }
        // Names are joined onto a local root on clone
        let escapes = self.local_name.starts_with('/')
            || self.local_name.contains('\\')
            || self
                .local_name
                .split('/')
                .any(|s| s.is_empty() || s == "." || s == "..");
        if escapes {
            return Err(format!("{}: not a relative forward-slash path", self.local_name));
        }
        if self.has_superseded(&self.current_digest) {
            return Err(format!(
                "{}: current digest also appears in its history",
                self.local_name
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supersede_moves_old_digest_into_history() {
        let mut doc = Document::new("a.txt", "d1");
        assert_eq!(doc.supersede("d2"), Some("d1".to_string()));
        assert_eq!(doc.current_digest(), "d2");
        assert_eq!(doc.digest_history(), ["d1".to_string()]);
    }

    #[test]
    fn supersede_with_same_digest_is_noop() {
        let mut doc = Document::new("a.txt", "d1");
        assert_eq!(doc.supersede("d1"), None);
        assert!(doc.digest_history().is_empty());
    }

    #[test]
    fn reverting_takes_the_digest_back_out_of_history() {
        let mut doc = Document::new("a.txt", "d1");
        doc.supersede("d2");
        doc.supersede("d3");

        assert_eq!(doc.supersede("d1"), Some("d3".to_string()));
        assert_eq!(doc.current_digest(), "d1");
        assert_eq!(doc.digest_history(), ["d2".to_string(), "d3".to_string()]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let doc: Document =
            serde_json::from_str(r#"{"localName":"a.txt","currentDigest":"d1"}"#).unwrap();
        assert_eq!(doc.remote_version_tag(), "");
        assert!(doc.digest_history().is_empty());
        assert!(!doc.is_pushed());
    }

    #[test]
    fn invariant_check_catches_current_in_history() {
        let doc: Document = serde_json::from_str(
            r#"{"localName":"a.txt","currentDigest":"d1","digestHistory":["d1"]}"#,
        )
        .unwrap();
        assert!(doc.check_invariants().is_err());
    }

    #[test]
    fn invariant_check_rejects_escaping_names() {
        for name in ["../secret", "/etc/passwd", "a//b", "a\\b"] {
            let doc = Document::new(name, "d1");
            assert!(doc.check_invariants().is_err(), "{name} accepted");
        }
        assert!(Document::new("docs/a.txt", "d1").check_invariants().is_ok());
    }
}
