//! In-memory key-value store with nested undo frames.

use crate::domain::StoreError;
use crate::ports::{KvStore, Transactional};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Prior value of each key touched inside a frame. `None` means absent.
type UndoFrame = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

#[derive(Default)]
struct Inner {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    frames: Vec<UndoFrame>,
}

impl Inner {
    fn record(&mut self, key: &[u8]) {
        let old = self.data.get(key).cloned();
        if let Some(frame) = self.frames.last_mut() {
            frame.entry(key.to_vec()).or_insert(old);
        }
    }
}

/// In-memory implementation of `KvStore`.
///
/// Writes apply directly; each open frame keeps the first prior value of
/// every key it touched so rollback can restore it.
#[derive(Default)]
pub struct InMemoryKvStore {
    inner: RwLock<Inner>,
}

impl InMemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().data.is_empty()
    }

    /// Open frame depth.
    pub fn depth(&self) -> usize {
        self.inner.read().frames.len()
    }
}

impl Transactional for InMemoryKvStore {
    fn begin(&self) {
        self.inner.write().frames.push(UndoFrame::new());
    }

    fn commit(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let frame = inner.frames.pop().ok_or(StoreError::NoOpenFrame)?;
        if let Some(parent) = inner.frames.last_mut() {
            for (key, old) in frame {
                parent.entry(key).or_insert(old);
            }
        }
        Ok(())
    }

    fn rollback(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let frame = inner.frames.pop().ok_or(StoreError::NoOpenFrame)?;
        for (key, old) in frame {
            match old {
                Some(value) => {
                    inner.data.insert(key, value);
                }
                None => {
                    inner.data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.read().data.get(key).cloned())
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.inner.read().data.contains_key(key))
    }

    fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.record(key);
        inner.data.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.data.contains_key(key) {
            inner.record(key);
            inner.data.remove(key);
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
