//! Transaction context supplied by the host ledger.

/// What the host tells us about the current invocation.
pub trait TxContext: Send + Sync {
    /// Opaque credential of the submitter, with an embedded PEM certificate.
    fn creator(&self) -> &[u8];

    /// Identifier unique to this transaction.
    fn tx_id(&self) -> &str;

    /// Server wall clock, Unix milliseconds.
    fn now_millis(&self) -> i64;
}

/// A plain transaction context a host fills in per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub creator: Vec<u8>,
    pub tx_id: String,
    pub now_millis: i64,
}

impl Invocation {
    /// Create a context stamped with the system clock.
    pub fn new(creator: impl Into<Vec<u8>>, tx_id: impl Into<String>) -> Self {
        Self::at(creator, tx_id, system_now_millis())
    }

    /// Create a context with an explicit server time.
    pub fn at(creator: impl Into<Vec<u8>>, tx_id: impl Into<String>, now_millis: i64) -> Self {
        Self {
            creator: creator.into(),
            tx_id: tx_id.into(),
            now_millis,
        }
    }
}

impl TxContext for Invocation {
    fn creator(&self) -> &[u8] {
        &self.creator
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}

/// Get current time in milliseconds.
pub fn system_now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
