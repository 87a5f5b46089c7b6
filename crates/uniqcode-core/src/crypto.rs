//! Digest primitive and batch secret derivation.
//!
//! Both the batch secret and every code's check suffix come from the same
//! unkeyed 128-bit digest (MD5), rendered as 32 lowercase hex characters.
//! The security parameter is the 6-character suffix, not the full digest.

use md5::{Digest, Md5};
use std::fmt;

use crate::error::FormatError;

/// A 16-byte MD5 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Md5Hash(pub [u8; 16]);

impl Md5Hash {
    /// Compute the MD5 digest of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&Md5::digest(data));
        Self(out)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Convert to a lowercase hex string (32 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Md5Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Md5({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Md5Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Digest arbitrary input to a 32-character lowercase hex string.
pub fn digest(input: &[u8]) -> String {
    Md5Hash::hash(input).to_hex()
}

/// The confidential secret of one batch.
///
/// Derived once at issuance from the request timestamp and the issuing
/// transaction id, stored only in the private partition, and used to
/// regenerate or check codes. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BatchSecret(String);

impl BatchSecret {
    /// Derive `digest(timestamp_text ++ tx_id)`.
    pub fn derive(timestamp_text: &str, tx_id: &str) -> Self {
        let mut input = String::with_capacity(timestamp_text.len() + tx_id.len());
        input.push_str(timestamp_text);
        input.push_str(tx_id);
        Self(digest(input.as_bytes()))
    }

    /// Rebuild a secret from the bytes kept in the private partition.
    pub fn from_stored(bytes: &[u8]) -> Result<Self, FormatError> {
        std::str::from_utf8(bytes)
            .map(|s| Self(s.to_owned()))
            .map_err(|_| FormatError::InvalidSecret)
    }

    /// The secret text, as it is written to the private partition.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for BatchSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BatchSecret(<redacted>)")
    }
}
