//! # SledStore — Persistent Transaction Storage
//!
//! [`TxStore`] over sled's embedded key-value store. All values live in one
//! named tree:
//!
//! | Tree           | Key                   | Value                     |
//! |----------------|-----------------------|---------------------------|
//! | `transactions` | `hash(true)` (32B)    | canonical wire bytes      |
//!
//! sled is thread-safe on its own, so a `SledStore` can be shared through
//! `Arc` without extra locking. Writes are buffered by sled; call
//! [`SledStore::flush`] when a caller needs them on disk.

use std::path::Path;

use sled::{Db, Tree};
use tracing::debug;

use super::{StoreError, TxStore};

const TRANSACTIONS_TREE: &str = "transactions";

#[derive(Debug, Clone)]
pub struct SledStore {
    db: Db,
    transactions: Tree,
}

impl SledStore {
    /// Open or create a store at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        debug!(path = %path.display(), "opened sled store");
        Self::from_db(db)
    }

    /// A store that is deleted when dropped.
    pub fn open_temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self, StoreError> {
        let transactions = db.open_tree(TRANSACTIONS_TREE)?;
        Ok(Self { db, transactions })
    }

    /// Flushes buffered writes to disk, returning the bytes written.
    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.db.flush()?)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TxStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        match self.transactions.get(key)? {
            Some(value) => Ok(value.to_vec()),
            None => Err(StoreError::not_found(key)),
        }
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.transactions.insert(key, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let store = SledStore::open_temporary().unwrap();
        assert!(store.is_empty());
        store.put(b"key", b"value").unwrap();
        assert_eq!(store.get(b"key").unwrap(), b"value");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let store = SledStore::open_temporary().unwrap();
        assert!(matches!(
            store.get(b"nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            store.put(&[1, 2, 3], &[4, 5, 6]).unwrap();
            store.flush().unwrap();
        }
        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.get(&[1, 2, 3]).unwrap(), vec![4, 5, 6]);
    }
}
