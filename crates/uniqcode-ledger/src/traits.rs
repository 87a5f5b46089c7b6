//! Ledger trait: the abstract interface over public state and private data.
//!
//! This trait keeps the services storage-agnostic. Implementations include
//! SQLite (persistent) and in-memory (tests, embedding).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{LedgerError, Result};

/// A single pending write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Write to public state.
    State { key: String, value: Bytes },
    /// Create a public state entry. Fails the commit if the key is taken.
    CreateState { key: String, value: Bytes },
    /// Write to a private data collection.
    Private {
        collection: String,
        key: String,
        value: Bytes,
    },
}

impl Write {
    /// The key this write targets.
    pub fn key(&self) -> &str {
        match self {
            Write::State { key, .. }
            | Write::CreateState { key, .. }
            | Write::Private { key, .. } => key,
        }
    }
}

/// An ordered group of writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    writes: Vec<Write>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a public state write.
    pub fn put_state(&mut self, key: impl Into<String>, value: impl Into<Bytes>) -> &mut Self {
        self.writes.push(Write::State {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue a create-only public state write.
    ///
    /// The commit fails with [`LedgerError::AlreadyExists`] if `key` holds
    /// a value when the set is applied.
    pub fn create_state(&mut self, key: impl Into<String>, value: impl Into<Bytes>) -> &mut Self {
        self.writes.push(Write::CreateState {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue a private data write.
    pub fn put_private(
        &mut self,
        collection: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> &mut Self {
        self.writes.push(Write::Private {
            collection: collection.into(),
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Write> {
        self.writes.iter()
    }
}

impl IntoIterator for WriteSet {
    type Item = Write;
    type IntoIter = std::vec::IntoIter<Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// The Ledger trait: async interface to the host's key-value ledger.
///
/// # Design Notes
///
/// - **Absent is not an error**: reads return `Ok(None)` for missing keys.
///   Errors are reserved for backend failures.
/// - **Ordered commit**: [`Ledger::commit`] applies writes in order. The
///   default implementation stops at the first failure, so a later write is
///   never applied when an earlier one failed. Backends that can commit
///   several keys atomically override it.
#[async_trait]
pub trait Ledger: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Public State
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a public state entry.
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write a public state entry.
    async fn put_state(&self, key: &str, value: Bytes) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Private Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Read an entry from a private data collection.
    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Bytes>>;

    /// Write an entry to a private data collection.
    async fn put_private_data(&self, collection: &str, key: &str, value: Bytes) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Commit
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a write set in order. See [`commit_in_order`].
    async fn commit(&self, writes: WriteSet) -> Result<()> {
        commit_in_order(self, writes).await
    }

    /// Whether a public state entry exists.
    async fn has_state(&self, key: &str) -> Result<bool> {
        Ok(self.get_state(key).await?.is_some())
    }
}

/// Apply writes one at a time through `ledger`'s single-key operations.
///
/// Create-only keys are all checked before anything is written, so a taken
/// key leaves the ledger untouched. Between that check and the writes
/// nothing is locked; backends with transactions override
/// [`Ledger::commit`] instead.
pub async fn commit_in_order<L: Ledger + ?Sized>(ledger: &L, writes: WriteSet) -> Result<()> {
    for write in writes.iter() {
        if let Write::CreateState { key, .. } = write {
            if ledger.has_state(key).await? {
                return Err(LedgerError::AlreadyExists { key: key.clone() });
            }
        }
    }

    for write in writes {
        match write {
            Write::State { key, value } | Write::CreateState { key, value } => {
                ledger.put_state(&key, value).await?
            }
            Write::Private {
                collection,
                key,
                value,
            } => ledger.put_private_data(&collection, &key, value).await?,
        }
    }
    Ok(())
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for std::sync::Arc<L> {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        (**self).put_state(key, value).await
    }

    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Bytes>> {
        (**self).get_private_data(collection, key).await
    }

    async fn put_private_data(&self, collection: &str, key: &str, value: Bytes) -> Result<()> {
        (**self).put_private_data(collection, key, value).await
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        (**self).commit(writes).await
    }
}
