//! Normalized path handling for cross-platform compatibility
//!
//! Document names are stored in the manifest with forward slashes so a
//! collection written on Windows can be cloned on Unix and vice versa.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Resolve symlinks and `..` segments without the `\\?\` prefix on Windows.
    pub fn canonicalize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resolved = dunce::canonicalize(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(resolved))
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a forward-slash relative segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Express this path relative to `root`.
    ///
    /// Returns `None` when the path is not strictly inside `root`.
    pub fn relative_to(&self, root: &NormalizedPath) -> Option<String> {
        let root = root.inner.trim_end_matches('/');
        let rest = self.inner.strip_prefix(root)?.strip_prefix('/')?;
        if rest.is_empty() || rest.split('/').any(|s| s == "..") {
            None
        } else {
            Some(rest.to_string())
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|n| !n.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_to_strips_root() {
        let root = NormalizedPath::new("/work/notes");
        let file = NormalizedPath::new("/work/notes/drafts/a.md");
        assert_eq!(file.relative_to(&root).as_deref(), Some("drafts/a.md"));
    }

    #[test]
    fn relative_to_rejects_siblings_and_root_itself() {
        let root = NormalizedPath::new("/work/notes");
        assert_eq!(NormalizedPath::new("/work/notes2/a.md").relative_to(&root), None);
        assert_eq!(NormalizedPath::new("/work/notes").relative_to(&root), None);
        assert_eq!(NormalizedPath::new("/work/other/a.md").relative_to(&root), None);
    }

    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("C:\\docs\\report.pdf");
        assert_eq!(path.as_str(), "C:/docs/report.pdf");
        assert_eq!(path.extension(), Some("pdf"));
        assert_eq!(path.file_name(), Some("report.pdf"));
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(NormalizedPath::new("/a/.hidden").extension(), None);
    }
}
