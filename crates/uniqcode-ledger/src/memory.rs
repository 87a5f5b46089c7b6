//! In-memory implementation of the Ledger trait.
//!
//! Same semantics as SQLite but nothing is persisted. Useful for tests and
//! for embedding the services in a host that owns durability itself.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{LedgerError, Result};
use crate::traits::{Ledger, Write, WriteSet};

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
}

#[derive(Default)]
struct MemoryLedgerInner {
    /// Public state.
    state: BTreeMap<String, Bytes>,

    /// Private data, per collection.
    private: HashMap<String, BTreeMap<String, Bytes>>,
}

impl MemoryLedgerInner {
    fn apply(&mut self, write: Write) {
        match write {
            Write::State { key, value } | Write::CreateState { key, value } => {
                self.state.insert(key, value);
            }
            Write::Private {
                collection,
                key,
                value,
            } => {
                self.private.entry(collection).or_default().insert(key, value);
            }
        }
    }
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryLedgerInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryLedgerInner>> {
        self.inner
            .read()
            .map_err(|e| LedgerError::Task(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryLedgerInner>> {
        self.inner
            .write()
            .map_err(|e| LedgerError::Task(format!("lock poisoned: {}", e)))
    }

    /// All public state keys, in key order.
    pub fn state_keys(&self) -> Result<Vec<String>> {
        Ok(self.read()?.state.keys().cloned().collect())
    }

    /// Number of entries in a private collection.
    pub fn private_len(&self, collection: &str) -> Result<usize> {
        Ok(self
            .read()?
            .private
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0))
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.read()?.state.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        self.write()?.state.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Bytes>> {
        Ok(self
            .read()?
            .private
            .get(collection)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put_private_data(&self, collection: &str, key: &str, value: Bytes) -> Result<()> {
        self.write()?
            .private
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        // One write lock for the whole set: readers see all of it or none.
        let mut inner = self.write()?;
        for write in writes.iter() {
            if let Write::CreateState { key, .. } = write {
                if inner.state.contains_key(key) {
                    return Err(LedgerError::AlreadyExists { key: key.clone() });
                }
            }
        }
        for write in writes {
            inner.apply(write);
        }
        tracing::debug!("memory ledger commit applied");
        Ok(())
    }
}
