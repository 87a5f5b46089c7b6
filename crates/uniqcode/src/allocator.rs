//! Batch id allocation.
//!
//! The last allocated batch id lives in a single public state entry. It is
//! read fresh on every invocation and never cached, so the host's conflict
//! detection sees the read and serializes concurrent issuances.

use bytes::Bytes;
use uniqcode_core::BatchId;
use uniqcode_ledger::{Ledger, LedgerError, WriteSet};

use crate::error::{Result, UniqueCodeError};

/// Public state key of the last-batch-id pointer.
pub const LAST_BATCH_ID_KEY: &str = "LAST_CODE_ID";

/// Reads and writes the last-batch-id pointer.
pub struct BatchAllocator<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: Ledger + ?Sized> BatchAllocator<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// The most recently allocated batch id, if any batch was ever allocated.
    pub async fn last_batch_id(&self) -> Result<Option<BatchId>> {
        let Some(raw) = self.ledger.get_state(LAST_BATCH_ID_KEY).await? else {
            return Ok(None);
        };

        let id = std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| text.parse::<BatchId>().ok())
            .ok_or_else(|| {
                LedgerError::InvalidData(format!(
                    "{} holds a non-numeric value: {:?}",
                    LAST_BATCH_ID_KEY,
                    String::from_utf8_lossy(&raw)
                ))
            })?;

        Ok(Some(id))
    }

    /// The id the next issuance will take. Does not advance the pointer.
    pub async fn next_batch_id(&self) -> Result<BatchId> {
        match self.last_batch_id().await? {
            None => Ok(BatchId::FIRST),
            Some(last) => last
                .next()
                .ok_or(UniqueCodeError::CapacityExhausted(last)),
        }
    }

    /// Overwrite the pointer unconditionally.
    ///
    /// No consistency check against issued batches; callers are trusted.
    pub async fn set_last_batch_id(&self, id: BatchId) -> Result<()> {
        self.ledger
            .put_state(LAST_BATCH_ID_KEY, pointer_value(id))
            .await?;
        tracing::info!(batch = %id, "last batch id overridden");
        Ok(())
    }

    /// Queue the pointer advance as part of a larger commit.
    pub fn advance(writes: &mut WriteSet, id: BatchId) {
        writes.put_state(LAST_BATCH_ID_KEY, pointer_value(id));
    }
}

fn pointer_value(id: BatchId) -> Bytes {
    Bytes::from(id.key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniqcode_ledger::MemoryLedger;

    #[tokio::test]
    async fn test_empty_ledger_starts_at_zero() {
        let ledger = MemoryLedger::new();
        let allocator = BatchAllocator::new(&ledger);
        assert_eq!(allocator.last_batch_id().await.unwrap(), None);
        assert_eq!(allocator.next_batch_id().await.unwrap(), BatchId::FIRST);
    }

    #[tokio::test]
    async fn test_next_is_pure_read() {
        let ledger = MemoryLedger::new();
        let allocator = BatchAllocator::new(&ledger);
        allocator.next_batch_id().await.unwrap();
        allocator.next_batch_id().await.unwrap();
        assert_eq!(ledger.get_state(LAST_BATCH_ID_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_override() {
        let ledger = MemoryLedger::new();
        let allocator = BatchAllocator::new(&ledger);
        allocator.set_last_batch_id(BatchId::new(41)).await.unwrap();
        assert_eq!(
            ledger.get_state(LAST_BATCH_ID_KEY).await.unwrap(),
            Some(Bytes::from_static(b"41"))
        );
        assert_eq!(allocator.next_batch_id().await.unwrap(), BatchId::new(42));
    }

    #[tokio::test]
    async fn test_corrupt_pointer_is_persistence_error() {
        let ledger = MemoryLedger::new();
        ledger
            .put_state(LAST_BATCH_ID_KEY, Bytes::from_static(b"seven"))
            .await
            .unwrap();
        let allocator = BatchAllocator::new(&ledger);
        assert!(matches!(
            allocator.next_batch_id().await,
            Err(UniqueCodeError::Persistence(LedgerError::InvalidData(_)))
        ));
    }

    #[tokio::test]
    async fn test_pointer_at_max_is_exhausted() {
        let ledger = MemoryLedger::new();
        let allocator = BatchAllocator::new(&ledger);
        allocator.set_last_batch_id(BatchId::new(u64::MAX)).await.unwrap();
        assert!(matches!(
            allocator.next_batch_id().await,
            Err(UniqueCodeError::CapacityExhausted(_))
        ));
    }

    #[test]
    fn test_advance_queues_pointer_write() {
        let mut writes = WriteSet::new();
        BatchAllocator::<MemoryLedger>::advance(&mut writes, BatchId::new(3));
        assert_eq!(writes.len(), 1);
        assert_eq!(writes.iter().next().map(|w| w.key()), Some(LAST_BATCH_ID_KEY));
    }
}
