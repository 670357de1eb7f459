//! Bounded pool of reusable transaction buffers.

use crate::error::{CoreError, CoreResult};
use crate::transaction::Transaction;
use parking_lot::Mutex;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Snapshot of pool utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of currently leased transactions.
    pub used: usize,
    /// Number of constructed transactions sitting in the free list.
    pub free: usize,
    /// Hard ceiling on concurrently leased transactions.
    pub max: usize,
}

struct PoolInner {
    /// Free list. The most recently released transaction is allocated next,
    /// keeping cache-warm buffers circulating under load.
    free: Vec<Transaction>,
    /// Number of currently leased transactions.
    used: usize,
    /// Total transactions constructed so far (leased + free).
    created: usize,
}

/// A bounded pool of reusable [`Transaction`] buffers.
///
/// The pool is the backpressure point of the write path: at most `pool_size`
/// transactions can be leased concurrently, and the next allocation beyond
/// that fails with [`CoreError::MaxConcurrencyLimitExceeded`] instead of
/// growing without bound.
///
/// The internal mutex covers only the free-list bookkeeping; it is never
/// held while a caller uses a leased transaction, so lease holders can do
/// unbounded work without blocking other allocations or releases.
pub struct TxPool {
    inner: Mutex<PoolInner>,
    pool_size: usize,
    max_tx_entries: usize,
    max_key_len: usize,
}

impl TxPool {
    /// Creates a pool.
    ///
    /// With `preallocated` set, all `pool_size` transactions are constructed
    /// up front, paying the allocation cost at startup instead of under
    /// first-time load. Otherwise transactions are constructed lazily on
    /// first need, up to `pool_size`.
    ///
    /// # Errors
    ///
    /// [`CoreError::IllegalArguments`] if any parameter is zero.
    pub fn new(
        pool_size: usize,
        max_tx_entries: usize,
        max_key_len: usize,
        preallocated: bool,
    ) -> CoreResult<Self> {
        if pool_size == 0 || max_tx_entries == 0 || max_key_len == 0 {
            return Err(CoreError::illegal_arguments(
                "pool size, max transaction entries and max key length must be positive",
            ));
        }

        let mut free = Vec::with_capacity(pool_size);
        let mut created = 0;
        if preallocated {
            for _ in 0..pool_size {
                free.push(Transaction::new(max_tx_entries, max_key_len));
            }
            created = pool_size;
        }

        Ok(Self {
            inner: Mutex::new(PoolInner {
                free,
                used: 0,
                created,
            }),
            pool_size,
            max_tx_entries,
            max_key_len,
        })
    }

    /// Leases a transaction buffer.
    ///
    /// Returns the most recently released free transaction, constructing a
    /// new one while the pool is under capacity. The lease is returned to
    /// the pool when dropped, so release happens on every exit path.
    ///
    /// # Errors
    ///
    /// [`CoreError::MaxConcurrencyLimitExceeded`] when all `pool_size`
    /// transactions are leased.
    pub fn alloc(&self) -> CoreResult<TxLease<'_>> {
        let mut inner = self.inner.lock();

        let tx = match inner.free.pop() {
            Some(tx) => tx,
            None => {
                if inner.created >= self.pool_size {
                    return Err(CoreError::MaxConcurrencyLimitExceeded);
                }
                inner.created += 1;
                Transaction::new(self.max_tx_entries, self.max_key_len)
            }
        };
        inner.used += 1;

        Ok(TxLease { pool: self, tx })
    }

    /// Returns a snapshot of pool utilization.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock();
        PoolStats {
            used: inner.used,
            free: inner.free.len(),
            max: self.pool_size,
        }
    }

    /// Returns a leased transaction to the free list.
    fn release(&self, mut tx: Transaction) {
        tx.reset();
        let mut inner = self.inner.lock();
        inner.used -= 1;
        inner.free.push(tx);
    }
}

impl fmt::Debug for TxPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("TxPool")
            .field("used", &stats.used)
            .field("free", &stats.free)
            .field("max", &stats.max)
            .finish()
    }
}

/// An exclusive lease on a pooled [`Transaction`].
///
/// Dereferences to the transaction buffer. Dropping the lease resets the
/// buffer and returns it to the pool, whether the enclosing operation
/// succeeded, failed, or was cancelled.
pub struct TxLease<'a> {
    pool: &'a TxPool,
    tx: Transaction,
}

impl Deref for TxLease<'_> {
    type Target = Transaction;

    fn deref(&self) -> &Transaction {
        &self.tx
    }
}

impl DerefMut for TxLease<'_> {
    fn deref_mut(&mut self) -> &mut Transaction {
        &mut self.tx
    }
}

impl Drop for TxLease<'_> {
    fn drop(&mut self) {
        let tx = std::mem::take(&mut self.tx);
        self.pool.release(tx);
    }
}

impl fmt::Debug for TxLease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxLease")
            .field("staged", &self.tx.entry_count())
            .finish()
    }
}
