//! Core type definitions for SealKV.

use std::fmt;

/// Unique identifier for a committed transaction.
///
/// Transaction IDs are monotonically increasing, never reused, and only
/// assigned to transactions that commit. The sequence has no gaps: the N-th
/// successful commit carries ID N.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next transaction ID.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx:{}", self.0)
    }
}

/// A key/value pair submitted in a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvPair {
    /// Key bytes. Must be non-empty and within the configured maximum length.
    pub key: Vec<u8>,
    /// Opaque value bytes. No length bound is imposed by the engine.
    pub value: Vec<u8>,
}

impl KvPair {
    /// Creates a new key/value pair.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A resolved key/value entry together with the transaction that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedEntry {
    /// Key bytes.
    pub key: Vec<u8>,
    /// Value bytes as of the resolved revision.
    pub value: Vec<u8>,
    /// Transaction that committed this revision.
    pub tx_id: TransactionId,
}

/// Metadata returned by a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxMetadata {
    /// ID assigned to the committed transaction.
    pub id: TransactionId,
    /// Number of entries written.
    pub entry_count: usize,
}
