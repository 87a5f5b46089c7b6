//! Code verification. Public: no caller check.

use uniqcode_core::UniqueCode;
use uniqcode_ledger::Ledger;

use crate::error::{Result, UniqueCodeError};
use crate::service::CodeService;

impl<L: Ledger> CodeService<L> {
    /// Check whether a presented code belongs to the batch its ordinal
    /// claims.
    ///
    /// Returns `Ok(false)` for a well-formed code of an issued batch whose
    /// suffix does not match, i.e. a forged or corrupted code.
    pub async fn verify_code(&self, presented: &str) -> Result<bool> {
        let code = UniqueCode::parse(presented)
            .map_err(|_| UniqueCodeError::MalformedCode(presented.to_string()))?;
        let batch_id = code.batch_id();

        self.issued_range(batch_id).await?;
        let secret = self.load_secret(batch_id).await?;

        let authentic = code.is_authentic(&secret);
        tracing::debug!(batch = %batch_id, authentic, "code verified");
        Ok(authentic)
    }
}
