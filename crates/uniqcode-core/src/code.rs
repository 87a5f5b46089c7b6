//! The unique-code format.
//!
//! A code is 16 characters: a 10-digit zero-padded ordinal (the order code)
//! followed by a 6-character check suffix. The suffix is the tail of
//! `digest(order_code ++ secret)`, so codes are never stored; they are
//! regenerated from the ordinal and the batch secret whenever needed.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crypto::{digest, BatchSecret};
use crate::error::FormatError;
use crate::types::{BatchId, BATCH_CAPACITY};

/// Width of the zero-padded ordinal.
pub const ORDINAL_WIDTH: usize = 10;

/// Length of the check suffix.
pub const SUFFIX_LEN: usize = 6;

/// Total code length.
pub const CODE_LEN: usize = ORDINAL_WIDTH + SUFFIX_LEN;

/// Largest ordinal that still fits in [`ORDINAL_WIDTH`] digits.
pub const MAX_ORDINAL: u64 = 9_999_999_999;

/// A positive ordinal rendered as 10 zero-padded digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderCode(u64);

impl OrderCode {
    /// Create an order code. Fails if the ordinal needs more than 10 digits.
    pub fn new(ordinal: u64) -> Result<Self, FormatError> {
        if ordinal > MAX_ORDINAL {
            return Err(FormatError::OrdinalOverflow(ordinal));
        }
        Ok(Self(ordinal))
    }

    /// Parse exactly 10 ASCII digits holding a positive ordinal.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        if text.len() != ORDINAL_WIDTH || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::MalformedCode(text.to_string()));
        }
        let ordinal: u64 = text
            .parse()
            .map_err(|_| FormatError::MalformedCode(text.to_string()))?;
        if ordinal == 0 {
            return Err(FormatError::MalformedCode(text.to_string()));
        }
        Ok(Self(ordinal))
    }

    pub const fn ordinal(&self) -> u64 {
        self.0
    }

    /// The batch this ordinal belongs to: `(ordinal - 1) / 10000`.
    pub fn batch_id(&self) -> BatchId {
        BatchId::new(self.0.saturating_sub(1) / BATCH_CAPACITY)
    }
}

impl fmt::Debug for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderCode({})", self)
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = ORDINAL_WIDTH)
    }
}

/// Render an ordinal as 10 zero-padded digits.
pub fn format_ordinal(n: u64) -> Result<String, FormatError> {
    OrderCode::new(n).map(|code| code.to_string())
}

/// Concatenate an order code and its suffix.
pub fn build_code(order_code: &OrderCode, suffix: &str) -> String {
    let mut code = String::with_capacity(CODE_LEN);
    code.push_str(&order_code.to_string());
    code.push_str(suffix);
    code
}

/// The check suffix: last 6 hex characters of `digest(order_code ++ secret)`.
pub fn check_suffix(order_code: &OrderCode, secret: &BatchSecret) -> String {
    let mut input = order_code.to_string();
    input.push_str(secret.as_str());
    let hash = digest(input.as_bytes());
    hash[hash.len() - SUFFIX_LEN..].to_string()
}

/// Map a presented code to the batch its ordinal falls in.
///
/// The code shape is validated first; see [`UniqueCode::parse`].
pub fn parse_batch_id(code: &str) -> Result<BatchId, FormatError> {
    UniqueCode::parse(code).map(|c| c.batch_id())
}

/// A 16-character code whose first 10 characters are a positive ordinal.
///
/// A parsed `UniqueCode` only has the right shape; whether it is authentic
/// depends on the batch secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UniqueCode {
    text: String,
    order_code: OrderCode,
}

impl UniqueCode {
    /// Validate shape: exactly 16 characters, the first 10 ASCII digits
    /// forming a positive ordinal. Suffix content is not checked.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedCode(text.to_string());

        if text.chars().count() != CODE_LEN {
            return Err(malformed());
        }
        let prefix = text.get(..ORDINAL_WIDTH).ok_or_else(malformed)?;
        let order_code = OrderCode::parse(prefix).map_err(|_| malformed())?;

        Ok(Self {
            text: text.to_string(),
            order_code,
        })
    }

    /// Generate the authentic code for an ordinal under a batch secret.
    pub fn issue(order_code: &OrderCode, secret: &BatchSecret) -> Self {
        Self {
            text: build_code(order_code, &check_suffix(order_code, secret)),
            order_code: *order_code,
        }
    }

    pub fn order_code(&self) -> OrderCode {
        self.order_code
    }

    pub fn suffix(&self) -> &str {
        &self.text[ORDINAL_WIDTH..]
    }

    pub fn batch_id(&self) -> BatchId {
        self.order_code.batch_id()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this code is the one `secret` generates for its ordinal.
    pub fn is_authentic(&self, secret: &BatchSecret) -> bool {
        Self::issue(&self.order_code, secret) == *self
    }
}

impl fmt::Debug for UniqueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UniqueCode({})", self.text)
    }
}

impl fmt::Display for UniqueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for UniqueCode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UniqueCode {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Serialize for UniqueCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_secret() -> BatchSecret {
        BatchSecret::derive("1576458896541", "tx1")
    }

    #[test]
    fn test_format_ordinal() {
        assert_eq!(format_ordinal(1).unwrap(), "0000000001");
        assert_eq!(format_ordinal(10_000).unwrap(), "0000010000");
        assert_eq!(format_ordinal(MAX_ORDINAL).unwrap(), "9999999999");
        assert_eq!(
            format_ordinal(MAX_ORDINAL + 1),
            Err(FormatError::OrdinalOverflow(MAX_ORDINAL + 1))
        );
    }

    #[test]
    fn test_known_codes() {
        let secret = scenario_secret();
        let first = UniqueCode::issue(&OrderCode::new(1).unwrap(), &secret);
        let second = UniqueCode::issue(&OrderCode::new(2).unwrap(), &secret);
        let last = UniqueCode::issue(&OrderCode::new(10_000).unwrap(), &secret);

        assert_eq!(first.as_str(), "0000000001532478");
        assert_eq!(second.as_str(), "00000000022fe1ca");
        assert_eq!(last.as_str(), "0000010000932e27");
        assert_eq!(first.suffix(), "532478");
    }

    #[test]
    fn test_build_code() {
        let order = OrderCode::new(7).unwrap();
        assert_eq!(build_code(&order, "abcdef"), "0000000007abcdef");
    }

    #[test]
    fn test_parse_batch_id() {
        assert_eq!(parse_batch_id("0000000001abcdef").unwrap(), BatchId::new(0));
        assert_eq!(parse_batch_id("0000010000abcdef").unwrap(), BatchId::new(0));
        assert_eq!(parse_batch_id("0000010001abcdef").unwrap(), BatchId::new(1));
        assert_eq!(parse_batch_id("0000020000abcdef").unwrap(), BatchId::new(1));
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        for bad in [
            "",
            "000000000153247",
            "00000000015324780",
            "000000000a532478",
            "0000000000532478",
            "-000000001532478",
            "０000000001532478",
        ] {
            assert!(
                matches!(UniqueCode::parse(bad), Err(FormatError::MalformedCode(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_accepts_any_suffix() {
        let code = UniqueCode::parse("0000000001ZZ€ZZZ").unwrap();
        assert_eq!(code.order_code().ordinal(), 1);
        assert!(!code.is_authentic(&scenario_secret()));
    }

    #[test]
    fn test_authenticity() {
        let secret = scenario_secret();
        let good = UniqueCode::parse("0000000001532478").unwrap();
        let wrong_suffix = UniqueCode::parse("0000000001000000").unwrap();
        assert!(good.is_authentic(&secret));
        assert!(!wrong_suffix.is_authentic(&secret));
        assert!(!good.is_authentic(&BatchSecret::derive("1576458896541", "tx2")));
    }

    proptest! {
        #[test]
        fn ordinal_maps_into_its_batch_range(ordinal in 1u64..=MAX_ORDINAL) {
            let order = OrderCode::new(ordinal).unwrap();
            prop_assert!(order.batch_id().ordinal_range().contains(ordinal));
        }

        #[test]
        fn format_then_parse_keeps_ordinal(ordinal in 1u64..=MAX_ORDINAL) {
            let text = format_ordinal(ordinal).unwrap();
            prop_assert_eq!(text.len(), ORDINAL_WIDTH);
            prop_assert_eq!(OrderCode::parse(&text).unwrap().ordinal(), ordinal);
        }

        #[test]
        fn suffix_mutation_is_rejected(ordinal in 1u64..=10_000u64, pos in 0usize..SUFFIX_LEN, delta in 1u8..16) {
            let secret = scenario_secret();
            let code = UniqueCode::issue(&OrderCode::new(ordinal).unwrap(), &secret);

            let mut bytes = code.as_str().as_bytes().to_vec();
            let idx = ORDINAL_WIDTH + pos;
            let nibble = u8::from_str_radix(std::str::from_utf8(&bytes[idx..=idx]).unwrap(), 16).unwrap();
            bytes[idx] = format!("{:x}", (nibble + delta) % 16).as_bytes()[0];
            let mutated = UniqueCode::parse(std::str::from_utf8(&bytes).unwrap()).unwrap();

            prop_assert!(!mutated.is_authentic(&secret));
        }
    }
}
