//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Tuning knobs for atomic writes.
///
/// The final rename is retried with exponential backoff because on some
/// platforms a freshly written file can be briefly held open by indexers
/// or virus scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// Maximum number of rename retries after the first attempt
    pub max_retries: u32,
    /// Whether to fsync the temp file before renaming
    pub fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], robustness: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    if robustness.fsync {
        temp_file
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;
    }

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    drop(temp_file);

    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_elapsed_time: Some(Duration::from_secs(2)),
        ..ExponentialBackoff::default()
    };
    let mut attempts = 0u32;
    let rename = || {
        attempts += 1;
        fs::rename(&temp_path, &native_path).map_err(|e| {
            if attempts > robustness.max_retries {
                backoff::Error::permanent(e)
            } else {
                tracing::debug!(path = %native_path.display(), attempt = attempts, "rename failed, retrying");
                backoff::Error::transient(e)
            }
        })
    };

    backoff::retry(policy, rename).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        let source = match e {
            backoff::Error::Permanent(err) => err,
            backoff::Error::Transient { err, .. } => err,
        };
        Error::io(&native_path, source)
    })
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}
