//! Half-open index ranges used by range queries.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::value_object::ValueObject;

/// Half-open range of entry indices, `[start, end)`.
///
/// Construction rejects inverted bounds; checking the bounds against an
/// engine's capacity is the validator's job.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    start: u64,
    end: u64,
}

impl ValueObject for IndexRange {}

impl IndexRange {
    pub fn new(start: u64, end: u64) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of slots in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: u64) -> bool {
        self.start <= index && index < self.end
    }

    /// Ascending iterator over every index in the range.
    pub fn iter(&self) -> core::ops::Range<u64> {
        self.start..self.end
    }
}

impl IntoIterator for IndexRange {
    type Item = u64;
    type IntoIter = core::ops::Range<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl core::fmt::Display for IndexRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
