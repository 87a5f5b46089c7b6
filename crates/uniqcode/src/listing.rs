//! Batch listing: regenerate every code of an issued batch.

use uniqcode_core::{BatchId, OrderCode, UniqueCode};
use uniqcode_ledger::{Ledger, LedgerError};

use crate::auth::require_admin;
use crate::context::TxContext;
use crate::error::Result;
use crate::service::CodeService;

impl<L: Ledger> CodeService<L> {
    /// Materialize all codes of a batch in ascending ordinal order.
    ///
    /// Codes are a pure function of `(ordinal, secret)`, so repeated calls
    /// return identical output and nothing is written.
    pub async fn list_batch_codes<C: TxContext + ?Sized>(
        &self,
        ctx: &C,
        batch_id: BatchId,
    ) -> Result<Vec<UniqueCode>> {
        require_admin(ctx, self.config())?;

        let range = self.issued_range(batch_id).await?;
        let secret = self.load_secret(batch_id).await?;

        let codes = range
            .ordinals()
            .map(|ordinal| OrderCode::new(ordinal).map(|order| UniqueCode::issue(&order, &secret)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| LedgerError::InvalidData(format!("batch {}: {}", batch_id, e)))?;

        tracing::debug!(batch = %batch_id, count = codes.len(), "batch codes listed");
        Ok(codes)
    }
}
