//! In-process object store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ObjectHead, ObjectStore, StoreError, StoreResult, validate_name};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Vec<u8>,
    head: ObjectHead,
}

#[derive(Debug, Default)]
struct Shared {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    next_tag: AtomicU64,
    writes: AtomicUsize,
}

/// Object store held in memory.
///
/// Clones share the same contents, so a test can hand one clone to the
/// engine and inspect or tamper with the store through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutating calls (`put` and `set_custom_metadata`) so far.
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, StoredObject>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.shared
            .objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fresh_tag(&self) -> String {
        let n = self.shared.next_tag.fetch_add(1, Ordering::SeqCst) + 1;
        format!("0x{n:016X}")
    }

    fn not_found(name: &str) -> StoreError {
        StoreError::NotFound {
            name: name.to_string(),
        }
    }
}

impl ObjectStore for MemoryStore {
    fn head(&self, name: &str) -> StoreResult<ObjectHead> {
        validate_name(name)?;
        self.objects()
            .get(name)
            .map(|o| o.head.clone())
            .ok_or_else(|| Self::not_found(name))
    }

    fn put(&self, name: &str, content: &[u8], content_type: &str) -> StoreResult<()> {
        validate_name(name)?;
        let head = ObjectHead {
            version_tag: self.fresh_tag(),
            content_type: content_type.to_string(),
            metadata: BTreeMap::new(),
        };
        self.objects().insert(
            name.to_string(),
            StoredObject {
                content: content.to_vec(),
                head,
            },
        );
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .objects()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn get(&self, name: &str) -> StoreResult<Vec<u8>> {
        validate_name(name)?;
        self.objects()
            .get(name)
            .map(|o| o.content.clone())
            .ok_or_else(|| Self::not_found(name))
    }

    fn set_custom_metadata(&self, name: &str, key: &str, value: &str) -> StoreResult<()> {
        validate_name(name)?;
        let tag = self.fresh_tag();
        let mut objects = self.objects();
        let object = objects.get_mut(name).ok_or_else(|| Self::not_found(name))?;
        object.head.metadata.insert(key.to_string(), value.to_string());
        object.head.version_tag = tag;
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
