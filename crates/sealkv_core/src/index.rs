//! Append-only versioned key index.

use crate::error::{CoreError, CoreResult};
use crate::types::{TransactionId, VersionedEntry};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::BTreeMap;

/// A historical value of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Transaction that committed this revision.
    pub tx_id: TransactionId,
    /// Value bytes at that transaction.
    pub value: Vec<u8>,
}

/// Index contents guarded by the read/write lock.
#[derive(Debug, Default)]
pub(crate) struct IndexState {
    /// Keys in lexicographic byte order; per key, revisions in strictly
    /// increasing transaction-ID order.
    pub(crate) keys: BTreeMap<Vec<u8>, Vec<Revision>>,
    /// ID of the most recently committed transaction.
    pub(crate) committed: TransactionId,
}

impl IndexState {
    /// Resolves a caller-supplied cutoff: zero means "current committed
    /// state", waiting on no pending transaction.
    pub(crate) fn resolve_cutoff(&self, since_tx: u64) -> TransactionId {
        if since_tx == 0 {
            self.committed
        } else {
            TransactionId::new(since_tx)
        }
    }

    /// Returns the revision with the greatest transaction ID at or below
    /// the cutoff, if any.
    pub(crate) fn visible<'a>(
        &self,
        revisions: &'a [Revision],
        cutoff: TransactionId,
    ) -> Option<&'a Revision> {
        let idx = revisions.partition_point(|rev| rev.tx_id <= cutoff);
        if idx == 0 {
            None
        } else {
            Some(&revisions[idx - 1])
        }
    }
}

/// An ordered, append-only mapping from key to `(transaction, value)`
/// revisions.
///
/// The index grows monotonically: revisions are never deleted or mutated in
/// place, only superseded by later ones. Transaction-ID assignment and
/// revision append happen as one atomic step under the write lock, so the
/// committed ID sequence is strictly increasing with no gaps and readers
/// always observe fully committed transactions.
pub struct VersionedIndex {
    state: RwLock<IndexState>,
}

impl VersionedIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Commits a batch of key/value entries, assigning the next transaction
    /// ID and appending one revision per key.
    ///
    /// Entries must already be validated; commit itself cannot fail, which
    /// is what keeps the ID sequence gap-free.
    pub fn commit<'a, I>(&self, entries: I) -> TransactionId
    where
        I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
    {
        let mut state = self.state.write();
        let id = state.committed.next();
        let mut count = 0usize;
        for (key, value) in entries {
            state.keys.entry(key.to_vec()).or_default().push(Revision {
                tx_id: id,
                value: value.to_vec(),
            });
            count += 1;
        }
        state.committed = id;
        tracing::debug!(tx = id.as_u64(), entries = count, "committed transaction");
        id
    }

    /// Resolves a key as of `since_tx` (zero = latest committed).
    ///
    /// # Errors
    ///
    /// [`CoreError::KeyNotFound`] when the key has no revision at or below
    /// the cutoff.
    pub fn get_visible(&self, key: &[u8], since_tx: u64) -> CoreResult<VersionedEntry> {
        let state = self.state.read();
        let cutoff = state.resolve_cutoff(since_tx);
        let revisions = state.keys.get(key).ok_or(CoreError::KeyNotFound)?;
        let revision = state
            .visible(revisions, cutoff)
            .ok_or(CoreError::KeyNotFound)?;
        Ok(VersionedEntry {
            key: key.to_vec(),
            value: revision.value.clone(),
            tx_id: revision.tx_id,
        })
    }

    /// Returns the ID of the most recently committed transaction.
    #[must_use]
    pub fn committed_tx(&self) -> TransactionId {
        self.state.read().committed
    }

    /// Returns the number of distinct keys in the index.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.state.read().keys.len()
    }

    /// Acquires the read lock for snapshot traversal.
    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read()
    }
}

impl Default for VersionedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VersionedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("VersionedIndex")
            .field("keys", &state.keys.len())
            .field("committed", &state.committed)
            .finish()
    }
}
