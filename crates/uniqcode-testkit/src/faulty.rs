//! Fault injection for ledger backends.

use std::collections::HashSet;

use async_trait::async_trait;
use bytes::Bytes;

use uniqcode_ledger::{commit_in_order, Ledger, LedgerError, Result, WriteSet};

/// A ledger wrapper that fails reads or writes of chosen keys.
///
/// Keys are matched in both namespaces. By default a commit is applied
/// write by write and stops at the first rejected key, like a backend with
/// no multi-key transactions. [`FaultyLedger::atomic`] switches to
/// all-or-nothing commits.
#[derive(Debug)]
pub struct FaultyLedger<L> {
    inner: L,
    failing_writes: HashSet<String>,
    failing_reads: HashSet<String>,
    stale_reads: HashSet<String>,
    atomic: bool,
}

impl<L: Ledger> FaultyLedger<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            failing_writes: HashSet::new(),
            failing_reads: HashSet::new(),
            stale_reads: HashSet::new(),
            atomic: false,
        }
    }

    /// Reject every write to `key`.
    pub fn fail_writes_to(mut self, key: impl Into<String>) -> Self {
        self.failing_writes.insert(key.into());
        self
    }

    /// Fail every read of `key` with an I/O error.
    pub fn fail_reads_of(mut self, key: impl Into<String>) -> Self {
        self.failing_reads.insert(key.into());
        self
    }

    /// Report public state `key` as absent, like a read from a snapshot
    /// taken before another writer created it. Commits still see the real
    /// value.
    pub fn stale_reads_of(mut self, key: impl Into<String>) -> Self {
        self.stale_reads.insert(key.into());
        self
    }

    /// Reject a whole write set when any of its keys is failing.
    pub fn atomic(mut self) -> Self {
        self.atomic = true;
        self
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn check_write(&self, key: &str) -> Result<()> {
        if self.failing_writes.contains(key) {
            return Err(LedgerError::WriteRejected {
                key: key.to_string(),
                reason: "injected fault".to_string(),
            });
        }
        Ok(())
    }

    fn check_read(&self, key: &str) -> Result<()> {
        if self.failing_reads.contains(key) {
            return Err(LedgerError::Io(std::io::Error::other(format!(
                "injected read fault on {key}"
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl<L: Ledger> Ledger for FaultyLedger<L> {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        self.check_read(key)?;
        if self.stale_reads.contains(key) {
            return Ok(None);
        }
        self.inner.get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        self.check_write(key)?;
        self.inner.put_state(key, value).await
    }

    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Bytes>> {
        self.check_read(key)?;
        self.inner.get_private_data(collection, key).await
    }

    async fn put_private_data(&self, collection: &str, key: &str, value: Bytes) -> Result<()> {
        self.check_write(key)?;
        self.inner.put_private_data(collection, key, value).await
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        if self.atomic {
            for write in writes.iter() {
                self.check_write(write.key())?;
            }
            return self.inner.commit(writes).await;
        }

        commit_in_order(self, writes).await
    }
}
