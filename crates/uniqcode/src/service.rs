//! The code service: shared state and ledger access for issuance, listing
//! and verification.
//!
//! Each operation lives in its own module as an `impl` block on
//! [`CodeService`]; this module holds the pieces they share.

use std::sync::Arc;

use uniqcode_core::{BatchId, BatchSecret, OrdinalRange};
use uniqcode_ledger::{Ledger, LedgerError};

use crate::allocator::BatchAllocator;
use crate::config::ChaincodeConfig;
use crate::error::{Result, UniqueCodeError};

/// Issues, lists and verifies unique-code batches on top of a [`Ledger`].
///
/// The service holds no state of its own between invocations; everything
/// is read from the ledger each time.
pub struct CodeService<L: Ledger> {
    /// The ledger backend.
    ledger: Arc<L>,
    /// Configuration.
    config: ChaincodeConfig,
}

impl<L: Ledger> CodeService<L> {
    /// Create a service over a ledger.
    pub fn new(ledger: L, config: ChaincodeConfig) -> Self {
        Self::with_shared(Arc::new(ledger), config)
    }

    /// Create a service over a ledger shared with other owners.
    pub fn with_shared(ledger: Arc<L>, config: ChaincodeConfig) -> Self {
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &ChaincodeConfig {
        &self.config
    }

    pub fn allocator(&self) -> BatchAllocator<'_, L> {
        BatchAllocator::new(self.ledger.as_ref())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Allocation
    // ─────────────────────────────────────────────────────────────────────────

    /// The id the next issuance would take.
    pub async fn peek_next_batch_id(&self) -> Result<BatchId> {
        self.allocator().next_batch_id().await
    }

    /// Administrative override of the last-batch-id pointer.
    pub async fn set_last_batch_id(&self, id: BatchId) -> Result<()> {
        self.allocator().set_last_batch_id(id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shared reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the public entry of an issued batch.
    ///
    /// The entry's presence is what makes a batch exist. Its stored range
    /// must match the range the batch id implies.
    pub(crate) async fn issued_range(&self, batch_id: BatchId) -> Result<OrdinalRange> {
        let raw = self
            .ledger
            .get_state(&batch_id.key())
            .await?
            .ok_or(UniqueCodeError::BatchNotFound(batch_id))?;

        let stored = std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| OrdinalRange::decode(text).ok())
            .filter(|range| *range == batch_id.ordinal_range())
            .ok_or_else(|| {
                LedgerError::InvalidData(format!(
                    "public entry of batch {} is not its ordinal range",
                    batch_id
                ))
            })?;

        Ok(stored)
    }

    /// Load the secret of a batch from the private collection.
    pub(crate) async fn load_secret(&self, batch_id: BatchId) -> Result<BatchSecret> {
        let raw = self
            .ledger
            .get_private_data(&self.config.secret_collection, &batch_id.key())
            .await?
            .ok_or_else(|| LedgerError::Missing {
                namespace: self.config.secret_collection.clone(),
                key: batch_id.key(),
            })?;

        let secret = BatchSecret::from_stored(&raw).map_err(|e| {
            LedgerError::InvalidData(format!("secret of batch {}: {}", batch_id, e))
        })?;

        Ok(secret)
    }
}
