//! Pooled transaction scratch buffers.

use crate::error::{CoreError, CoreResult};

/// A staged key/value entry inside a transaction buffer.
///
/// Entry buffers are recycled across leases: the key and value vectors keep
/// their allocations when the transaction is reset.
#[derive(Debug, Default)]
struct StagedEntry {
    key: Vec<u8>,
    value: Vec<u8>,
}

/// A reusable transaction-building buffer.
///
/// A `Transaction` accumulates pending key/value entries before they are
/// committed into the versioned index. Instances are owned by the
/// [`TxPool`](crate::pool::TxPool) while free and exclusively by the caller
/// while leased; they are recycled indefinitely rather than destroyed.
///
/// Staged entries below the watermark are the only visible contents; bytes
/// left over from a previous lease are overwritten before an entry becomes
/// visible again.
#[derive(Debug, Default)]
pub struct Transaction {
    /// Entry slots, reused across leases. Only `entries[..staged]` is live.
    entries: Vec<StagedEntry>,
    /// Number of currently staged entries.
    staged: usize,
    /// Per-transaction entry capacity.
    max_entries: usize,
    /// Maximum key length in bytes.
    max_key_len: usize,
}

impl Transaction {
    /// Creates a transaction buffer with the given capacity limits.
    pub(crate) fn new(max_entries: usize, max_key_len: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_entries),
            staged: 0,
            max_entries,
            max_key_len,
        }
    }

    /// Stages a key/value pair for commit.
    ///
    /// # Errors
    ///
    /// - [`CoreError::IllegalArguments`] for an empty or oversized key.
    /// - [`CoreError::MaxTxEntriesExceeded`] once the entry capacity is full.
    pub fn stage(&mut self, key: &[u8], value: &[u8]) -> CoreResult<()> {
        if key.is_empty() {
            return Err(CoreError::illegal_arguments("empty key"));
        }
        if key.len() > self.max_key_len {
            return Err(CoreError::illegal_arguments("key exceeds maximum length"));
        }
        if self.staged == self.max_entries {
            return Err(CoreError::MaxTxEntriesExceeded {
                limit: self.max_entries,
            });
        }

        if self.staged == self.entries.len() {
            let mut entry = StagedEntry {
                key: Vec::with_capacity(self.max_key_len),
                value: Vec::new(),
            };
            entry.key.extend_from_slice(key);
            entry.value.extend_from_slice(value);
            self.entries.push(entry);
        } else {
            // Reuse the slot's buffers from a previous lease.
            let entry = &mut self.entries[self.staged];
            entry.key.clear();
            entry.key.extend_from_slice(key);
            entry.value.clear();
            entry.value.extend_from_slice(value);
        }
        self.staged += 1;
        Ok(())
    }

    /// Returns the number of staged entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.staged
    }

    /// Iterates over the staged entries in insertion order.
    pub(crate) fn staged_entries(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries[..self.staged]
            .iter()
            .map(|entry| (entry.key.as_slice(), entry.value.as_slice()))
    }

    /// Clears the staged contents, retaining entry buffer allocations.
    pub(crate) fn reset(&mut self) {
        self.staged = 0;
    }
}
