//! [`TestCollection`] fixture for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary working directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use pit_test_utils::collection::TestCollection;
///
/// let dir = TestCollection::new();
/// dir.write_file("report.pdf", "v1");
/// dir.assert_file_contains("report.pdf", "v1");
/// ```
pub struct TestCollection {
    temp_dir: TempDir,
}

impl Default for TestCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCollection {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `path` relative to the root.
    pub fn path(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Write `content` to `path` (relative to root), creating parents.
    pub fn write_file(&self, path: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Remove the file at `path` (relative to root).
    pub fn remove_file(&self, path: &str) {
        fs::remove_file(self.path(path))
            .unwrap_or_else(|e| panic!("Could not remove {path}: {e}"));
    }

    /// Read the file at `path` (relative to root) as bytes.
    pub fn read_file(&self, path: &str) -> Vec<u8> {
        let full_path = self.path(path);
        fs::read(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = String::from_utf8_lossy(&self.read_file(path)).into_owned();
        assert!(
            file_content.contains(content),
            "Expected {path} to contain {content:?}, got: {file_content}"
        );
    }
}
