//! Response snapshots produced by the executor.
//!
//! A [`ResponseRecord`] is a **fully buffered** view of one target's reply:
//! the status code, the header multimap with canonical names, and the raw
//! body bytes. Records are never mutated after the executor builds them.

use crate::headers::HeaderMultiMap;
use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::fmt;

/// Which of the two targets a value belongs to.
///
/// `First` is index 0 (the first URL argument), `Second` is index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetIndex {
    First,
    Second,
}

impl TargetIndex {
    /// Both targets in index order
    pub const BOTH: [TargetIndex; 2] = [TargetIndex::First, TargetIndex::Second];

    /// Zero-based index
    pub fn as_usize(self) -> usize {
        match self {
            TargetIndex::First => 0,
            TargetIndex::Second => 1,
        }
    }

    /// The opposite side
    pub fn other(self) -> Self {
        match self {
            TargetIndex::First => TargetIndex::Second,
            TargetIndex::Second => TargetIndex::First,
        }
    }
}

impl fmt::Display for TargetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}

impl Serialize for TargetIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_usize() as u64)
    }
}

/// Snapshot of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    /// Side this response came from
    pub target: TargetIndex,
    /// URL the request was sent to
    pub url: String,
    /// Numeric HTTP status code (e.g. `200`, `404`)
    pub status: u16,
    /// Response headers keyed by canonical name, values in arrival order
    pub headers: HeaderMultiMap,
    /// Raw body bytes, exactly as received
    pub body: Bytes,
}

impl ResponseRecord {
    pub fn new(
        target: TargetIndex,
        url: impl Into<String>,
        status: u16,
        headers: HeaderMultiMap,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            target,
            url: url.into(),
            status,
            headers,
            body: body.into(),
        }
    }
}

/// The two records of a successful dispatch, index order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePair {
    pub first: ResponseRecord,
    pub second: ResponseRecord,
}

impl ResponsePair {
    pub fn new(first: ResponseRecord, second: ResponseRecord) -> Self {
        Self { first, second }
    }

    /// Record for the given side
    pub fn get(&self, target: TargetIndex) -> &ResponseRecord {
        match target {
            TargetIndex::First => &self.first,
            TargetIndex::Second => &self.second,
        }
    }
}
