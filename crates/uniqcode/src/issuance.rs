//! Batch issuance.

use bytes::Bytes;
use uniqcode_core::{BatchId, BatchSecret};
use uniqcode_ledger::{Ledger, LedgerError, WriteSet};

use crate::allocator::BatchAllocator;
use crate::auth::require_admin;
use crate::context::TxContext;
use crate::error::{Result, UniqueCodeError};
use crate::service::CodeService;

impl<L: Ledger> CodeService<L> {
    /// Issue the next batch.
    ///
    /// `request_timestamp` is the caller's Unix-millisecond clock as decimal
    /// text. Together with the transaction id it seeds the batch secret, so
    /// it must be within the configured skew of server time.
    ///
    /// The secret, the public range entry and the pointer advance are
    /// committed as one ordered write set: the range is never written
    /// without the secret, and the pointer never moves past a batch whose
    /// secret was not persisted.
    pub async fn issue_batch<C: TxContext + ?Sized>(
        &self,
        ctx: &C,
        request_timestamp: &str,
    ) -> Result<BatchId> {
        let caller = require_admin(ctx, self.config())?;

        let batch_id = self.allocator().next_batch_id().await?;

        let timestamp = self.check_freshness(ctx.now_millis(), request_timestamp)?;

        if self.ledger().has_state(&batch_id.key()).await? {
            tracing::warn!(batch = %batch_id, "batch already has a public entry");
            return Err(UniqueCodeError::BatchAlreadyExists(batch_id));
        }

        let range = batch_id
            .ordinal_range()
            .encode()
            .map_err(|_| UniqueCodeError::CapacityExhausted(batch_id))?;

        let secret = BatchSecret::derive(&timestamp.to_string(), ctx.tx_id());

        let mut writes = WriteSet::new();
        writes.put_private(
            self.config().secret_collection.as_str(),
            batch_id.key(),
            Bytes::copy_from_slice(secret.as_bytes()),
        );
        writes.create_state(batch_id.key(), range);
        BatchAllocator::<L>::advance(&mut writes, batch_id);

        // A concurrent issuance may have taken this id since the check above.
        self.ledger().commit(writes).await.map_err(|e| match e {
            LedgerError::AlreadyExists { .. } => {
                tracing::warn!(batch = %batch_id, "batch created concurrently");
                UniqueCodeError::BatchAlreadyExists(batch_id)
            }
            other => UniqueCodeError::Persistence(other),
        })?;

        tracing::info!(
            batch = %batch_id,
            caller = caller.user_id().unwrap_or_default(),
            tx_id = ctx.tx_id(),
            "batch issued"
        );
        Ok(batch_id)
    }

    /// Parse the request timestamp and check it against server time.
    fn check_freshness(&self, now_millis: i64, request_timestamp: &str) -> Result<i64> {
        let timestamp: i64 = request_timestamp.parse().map_err(|_| {
            UniqueCodeError::StaleOrInvalidTimestamp(format!(
                "{:?} is not an integer",
                request_timestamp
            ))
        })?;

        let skew = now_millis.abs_diff(timestamp);
        if skew > self.config().max_clock_skew_ms {
            tracing::warn!(
                timestamp,
                now = now_millis,
                skew,
                "request timestamp outside accepted window"
            );
            return Err(UniqueCodeError::StaleOrInvalidTimestamp(format!(
                "{} is {} ms from server time",
                timestamp, skew
            )));
        }

        Ok(timestamp)
    }
}
