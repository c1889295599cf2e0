//! In-memory [`TxStore`].
//!
//! A `HashMap` behind a `parking_lot::RwLock`. Nothing survives the process;
//! use it for tests, tooling, and as the reference for backend semantics.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{StoreError, TxStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl TxStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
