//! Error types for the unique-code services.

use thiserror::Error;
use uniqcode_core::BatchId;
use uniqcode_ledger::LedgerError;

/// Errors that can occur during service operations.
///
/// Everything except [`UniqueCodeError::Persistence`] and
/// [`UniqueCodeError::UnknownMethod`] is a business failure: the caller can
/// retry with corrected input, and the dispatcher reports it as a
/// `success: false` response instead of failing the invocation.
#[derive(Debug, Error)]
pub enum UniqueCodeError {
    /// Caller lacks admin rights for a privileged operation.
    #[error("have no authority: '{0}'")]
    Unauthorized(String),

    /// Freshness check failed or the timestamp is unparseable.
    #[error("timestamp rejected: {0}")]
    StaleOrInvalidTimestamp(String),

    /// A public entry already exists for the allocated batch.
    #[error("batch {0} has already been created")]
    BatchAlreadyExists(BatchId),

    /// The referenced batch has no public entry.
    #[error("batch {0} has not been created")]
    BatchNotFound(BatchId),

    /// A presented code failed shape validation.
    #[error("malformed code: {0:?}")]
    MalformedCode(String),

    /// No further batch fits in the 10-digit ordinal space.
    #[error("no batch can follow {0}: ordinal space exhausted")]
    CapacityExhausted(BatchId),

    /// Missing or unparseable invocation argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The invoked method does not exist.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Ledger read or write failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] LedgerError),
}

impl UniqueCodeError {
    /// Whether this failure belongs in a `success: false` response rather
    /// than failing the whole invocation.
    pub fn is_business(&self) -> bool {
        !matches!(
            self,
            UniqueCodeError::Persistence(_) | UniqueCodeError::UnknownMethod(_)
        )
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, UniqueCodeError>;
