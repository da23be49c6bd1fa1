//! SHA-256 content digests
//!
//! Provides a single canonical digest format (`sha256:<hex>`) used to decide
//! whether a document has changed since it was last recorded. The digest is
//! a change detector, not a tamper seal.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix for all digests produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 digest of raw bytes.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 digest of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(compute_bytes_checksum(&content))
}
