//! Error types for the ledger module.

use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Blocking task could not complete.
    #[error("ledger task failed: {0}")]
    Task(String),

    /// An entry that must exist is absent.
    #[error("missing {namespace} entry for key {key}")]
    Missing { namespace: String, key: String },

    /// Stored bytes do not have the expected shape.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A create-only write found its key already set.
    #[error("state key {key} already exists")]
    AlreadyExists { key: String },

    /// Write rejected by the backend.
    #[error("write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
