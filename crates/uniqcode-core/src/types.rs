//! Strong type definitions for batches.
//!
//! Identifiers are newtypes so a batch id can never be confused with an
//! ordinal at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::code::OrderCode;
use crate::error::FormatError;

/// Number of codes every batch owns.
pub const BATCH_CAPACITY: u64 = 10_000;

/// A sequential batch identifier, assigned from 0 upward.
///
/// The decimal rendering is also the key of the batch's public state entry
/// and of its secret in the private partition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub u64);

impl BatchId {
    /// The first batch ever issued.
    pub const FIRST: Self = Self(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id after this one, or `None` on overflow.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// The ordinals owned by this batch.
    pub fn ordinal_range(&self) -> OrdinalRange {
        OrdinalRange::for_batch(*self)
    }

    /// The ledger key for this batch.
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BatchId {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| FormatError::InvalidBatchId(s.to_string()))
    }
}

impl From<u64> for BatchId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The inclusive ordinal range `[start, end]` a batch owns.
///
/// Batch `n` owns `n*10000 + 1 ..= n*10000 + 10000`, so ranges of distinct
/// batches never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrdinalRange {
    pub start: u64,
    pub end: u64,
}

impl OrdinalRange {
    /// Compute the range for a batch.
    pub fn for_batch(batch_id: BatchId) -> Self {
        let base = batch_id.0.saturating_mul(BATCH_CAPACITY);
        Self {
            start: base.saturating_add(1),
            end: base.saturating_add(BATCH_CAPACITY),
        }
    }

    /// Whether an ordinal belongs to this range.
    pub fn contains(&self, ordinal: u64) -> bool {
        (self.start..=self.end).contains(&ordinal)
    }

    /// Number of ordinals in the range.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn ordinals(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }

    /// Render the public state value `"<padded start>-<padded end>"`.
    ///
    /// Fails if either end does not fit in 10 digits.
    pub fn encode(&self) -> Result<String, FormatError> {
        let start = OrderCode::new(self.start)?;
        let end = OrderCode::new(self.end)?;
        Ok(format!("{}-{}", start, end))
    }

    /// Parse a public state value back into a range.
    pub fn decode(text: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedRange(text.to_string());

        let (start, end) = text.split_once('-').ok_or_else(malformed)?;
        let start = OrderCode::parse(start).map_err(|_| malformed())?;
        let end = OrderCode::parse(end).map_err(|_| malformed())?;
        if end.ordinal() < start.ordinal() {
            return Err(malformed());
        }

        Ok(Self {
            start: start.ordinal(),
            end: end.ordinal(),
        })
    }
}
