//! Proptest generators for property-based testing.

use proptest::prelude::*;

use uniqcode_core::{BatchId, BatchSecret, OrderCode, MAX_ORDINAL};

/// Highest batch id whose range still encodes in 10 digits.
pub const MAX_ENCODABLE_BATCH: u64 = MAX_ORDINAL / 10_000 - 1;

/// Generate a valid ordinal.
pub fn ordinal() -> impl Strategy<Value = u64> {
    1u64..=MAX_ORDINAL
}

/// Generate a valid order code.
pub fn order_code() -> impl Strategy<Value = OrderCode> {
    ordinal().prop_filter_map("ordinal in range", |n| OrderCode::new(n).ok())
}

/// Generate a batch id whose range is encodable.
pub fn batch_id() -> impl Strategy<Value = BatchId> {
    (0u64..=MAX_ENCODABLE_BATCH).prop_map(BatchId::new)
}

/// Generate a reasonable Unix-ms timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000
}

/// Generate a host-style transaction id.
pub fn tx_id() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}".prop_map(String::from)
}

/// Generate 16-character strings that look like codes but carry arbitrary
/// suffixes.
pub fn presented_code() -> impl Strategy<Value = String> {
    (ordinal(), "[0-9a-fA-F]{6}").prop_map(|(n, suffix)| format!("{n:010}{suffix}"))
}

/// Generate arbitrary short text, including non-ASCII.
pub fn junk_text() -> impl Strategy<Value = String> {
    ".{0,24}".prop_map(String::from)
}

/// Parameters for deriving a batch secret.
#[derive(Debug, Clone)]
pub struct SecretParams {
    pub timestamp: i64,
    pub tx_id: String,
}

impl SecretParams {
    /// Derive the secret these parameters describe.
    pub fn secret(&self) -> BatchSecret {
        BatchSecret::derive(&self.timestamp.to_string(), &self.tx_id)
    }
}

impl Arbitrary for SecretParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (timestamp(), tx_id())
            .prop_map(|(timestamp, tx_id)| SecretParams { timestamp, tx_id })
            .boxed()
    }
}
