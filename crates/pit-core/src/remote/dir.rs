//! Directory-backed object store
//!
//! A "local container": object content lives under `objects/<name>` and
//! the object's properties (version tag, content type, custom metadata)
//! under `properties/<name>.json`. Content is written before properties, so
//! an object only becomes visible to `head` once both are in place.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use pit_fs::{ConfigStore, NormalizedPath, RobustnessConfig, io};
use uuid::Uuid;

use super::{ObjectHead, ObjectStore, StoreError, StoreResult, validate_name};

const OBJECTS_DIR: &str = "objects";
const PROPERTIES_DIR: &str = "properties";
const PROPERTIES_SUFFIX: &str = ".json";

/// Object store rooted at a directory.
#[derive(Debug)]
pub struct DirStore {
    root: NormalizedPath,
    config: ConfigStore,
}

impl DirStore {
    /// Open a container, creating its directory layout if needed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = NormalizedPath::new(root.as_ref());
        for sub in [OBJECTS_DIR, PROPERTIES_DIR] {
            let dir = root.join(sub).to_native();
            fs::create_dir_all(&dir).map_err(|e| StoreError::Unavailable {
                message: format!("{}: {e}", dir.display()),
            })?;
        }
        tracing::debug!(root = %root, "opened local container");
        Ok(Self {
            root,
            config: ConfigStore::new(),
        })
    }

    /// Root directory of the container
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn object_path(&self, name: &str) -> NormalizedPath {
        self.root.join(OBJECTS_DIR).join(name)
    }

    fn properties_path(&self, name: &str) -> NormalizedPath {
        self.root
            .join(PROPERTIES_DIR)
            .join(&format!("{name}{PROPERTIES_SUFFIX}"))
    }

    fn load_head(&self, name: &str) -> StoreResult<ObjectHead> {
        self.config
            .load(&self.properties_path(name))
            .map_err(|e| map_fs_error(name, e))
    }

    fn save_head(&self, name: &str, head: &ObjectHead) -> StoreResult<()> {
        self.config
            .save(&self.properties_path(name), head)
            .map_err(|e| map_fs_error(name, e))
    }

    fn collect_names(&self, dir: &Path, prefix: &str, names: &mut Vec<String>) -> StoreResult<()> {
        let entries = fs::read_dir(dir).map_err(|e| StoreError::Backend {
            name: prefix.to_string(),
            source: pit_fs::Error::io(dir, e),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Backend {
                name: prefix.to_string(),
                source: pit_fs::Error::io(dir, e),
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.collect_names(&path, prefix, names)?;
                continue;
            }
            let relative = NormalizedPath::new(&path)
                .relative_to(&self.root.join(PROPERTIES_DIR));
            if let Some(name) = relative.as_deref().and_then(|r| r.strip_suffix(PROPERTIES_SUFFIX))
                && name.starts_with(prefix)
                && !is_temp_file(&path)
            {
                names.push(name.to_string());
            }
        }
        Ok(())
    }
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn map_fs_error(name: &str, error: pit_fs::Error) -> StoreError {
    if error.is_not_found() {
        StoreError::NotFound {
            name: name.to_string(),
        }
    } else {
        StoreError::Backend {
            name: name.to_string(),
            source: error,
        }
    }
}

fn fresh_tag() -> String {
    format!("\"{}\"", Uuid::new_v4().simple())
}

impl ObjectStore for DirStore {
    fn head(&self, name: &str) -> StoreResult<ObjectHead> {
        validate_name(name)?;
        self.load_head(name)
    }

    fn put(&self, name: &str, content: &[u8], content_type: &str) -> StoreResult<()> {
        validate_name(name)?;
        io::write_atomic(&self.object_path(name), content, RobustnessConfig::default())
            .map_err(|e| map_fs_error(name, e))?;
        let head = ObjectHead {
            version_tag: fresh_tag(),
            content_type: content_type.to_string(),
            metadata: BTreeMap::new(),
        };
        self.save_head(name, &head)?;
        tracing::debug!(name, bytes = content.len(), "object written");
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        let properties = self.root.join(PROPERTIES_DIR).to_native();
        self.collect_names(&properties, prefix, &mut names)?;
        names.sort();
        Ok(names)
    }

    fn get(&self, name: &str) -> StoreResult<Vec<u8>> {
        validate_name(name)?;
        // Properties gate visibility; content alone is a torn write
        self.load_head(name)?;
        io::read_bytes(&self.object_path(name)).map_err(|e| map_fs_error(name, e))
    }

    fn set_custom_metadata(&self, name: &str, key: &str, value: &str) -> StoreResult<()> {
        validate_name(name)?;
        let mut head = self.load_head(name)?;
        head.metadata.insert(key.to_string(), value.to_string());
        head.version_tag = fresh_tag();
        self.save_head(name, &head)
    }
}
