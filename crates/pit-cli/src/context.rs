//! Account and container resolution
//!
//! Decides which container a command talks to. The `--container` flag (or
//! `PIT_CONTAINER`) wins; otherwise the `[container]` table of
//! `~/.pit/account.toml` is used:
//!
//! ```toml
//! [container]
//! kind = "local"
//! path = "/mnt/shared/pit"
//! ```
//!
//! A relative `path` is resolved against `~/.pit`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use pit_core::{EngineConfig, ObjectStore, StoreConfig, StoreKind, SyncEngine};
use pit_fs::{ConfigStore, NormalizedPath, PitPath};
use serde::Deserialize;

use crate::error::Result;

/// Contents of the account file
#[derive(Debug, Deserialize)]
pub struct AccountFile {
    pub container: StoreConfig,
}

/// Location of the account file, if a home directory is known.
pub fn account_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(PitPath::AppFolder.as_str())
            .join(PitPath::AccountFile.as_str())
    })
}

/// Location of the log file, if a home directory is known.
pub fn log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(PitPath::AppFolder.as_str())
            .join(PitPath::LogFile.as_str())
    })
}

/// Open the log file for appending. It is never created here; logging to a
/// file is enabled by creating it.
pub fn open_log_file(path: &Path) -> Option<File> {
    OpenOptions::new().append(true).open(path).ok()
}

/// Resolve the container configuration for this invocation.
pub fn resolve_store_config(container: Option<&Path>) -> Result<StoreConfig> {
    if let Some(path) = container {
        tracing::debug!(path = %path.display(), "using container from command line");
        return Ok(StoreConfig::local(path));
    }

    let account = account_path()
        .ok_or_else(|| pit_core::Error::config("cannot determine the home directory"))?;
    load_account(&account)
}

/// Load the container configuration from an account file.
pub fn load_account(account: &Path) -> Result<StoreConfig> {
    if !account.is_file() {
        return Err(pit_core::Error::config(format!(
            "no container configured: pass --container, set PIT_CONTAINER or create {}",
            account.display()
        ))
        .into());
    }

    let file: AccountFile = ConfigStore::new().load(&NormalizedPath::new(account))?;
    let mut config = file.container;
    if config.kind == StoreKind::Local
        && let Some(path) = config.path.as_mut()
        && path.is_relative()
        && let Some(base) = account.parent()
    {
        *path = base.join(&*path);
    }
    tracing::debug!(account = %account.display(), kind = ?config.kind, "loaded account");
    Ok(config)
}

/// Open the store for this invocation.
pub fn open_store(container: Option<&Path>) -> Result<Box<dyn ObjectStore>> {
    let config = resolve_store_config(container)?;
    Ok(pit_core::open_store(&config)?)
}

/// Build an engine rooted at `root` over the resolved store.
pub fn open_engine(root: &Path, container: Option<&Path>) -> Result<SyncEngine> {
    let store = open_store(container)?;
    Ok(SyncEngine::new(EngineConfig::new(root), store))
}
