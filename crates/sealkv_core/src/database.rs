//! Database facade.

use crate::error::{CoreError, CoreResult};
use crate::index::VersionedIndex;
use crate::options::DbOptions;
use crate::pool::{PoolStats, TxPool};
use crate::scan::{ScanEngine, ScanRequest};
use crate::types::{KvPair, TransactionId, TxMetadata, VersionedEntry};
use std::sync::Arc;

/// Utilization snapshot of a database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    /// Transaction pool utilization.
    pub pool: PoolStats,
    /// ID of the most recently committed transaction.
    pub committed_tx: TransactionId,
    /// Number of distinct keys in the index.
    pub key_count: usize,
}

/// The main database handle.
///
/// `Database` composes the transaction pool, the versioned index, and the
/// scan engine into the `set`/`get`/`scan` operations, validating request
/// shape and enforcing the configured limits. A single instance is shared
/// across concurrent requests; all methods take `&self`.
///
/// # Example
///
/// ```
/// use sealkv_core::{Database, DbOptions, KvPair};
///
/// let db = Database::open(DbOptions::default()).unwrap();
/// let meta = db.set(&[KvPair::new(b"greeting".to_vec(), b"hello".to_vec())]).unwrap();
/// let entry = db.get(b"greeting", meta.id.as_u64()).unwrap();
/// assert_eq!(entry.value, b"hello");
/// ```
pub struct Database {
    options: DbOptions,
    pool: TxPool,
    index: Arc<VersionedIndex>,
    scan_engine: ScanEngine,
}

impl Database {
    /// Opens a database with the given options.
    ///
    /// # Errors
    ///
    /// [`CoreError::IllegalArguments`] when the options fail validation.
    pub fn open(options: DbOptions) -> CoreResult<Self> {
        options.validate()?;

        let pool = TxPool::new(
            options.pool_size,
            options.max_tx_entries,
            options.max_key_len,
            options.preallocated,
        )?;
        let index = Arc::new(VersionedIndex::new());
        let scan_engine = ScanEngine::new(Arc::clone(&index), options.max_scan_limit);

        tracing::info!(
            path = %options.db_root_path.display(),
            pool_size = options.pool_size,
            replica = options.replica,
            corruption_checker = options.corruption_checker,
            "database opened"
        );

        Ok(Self {
            options,
            pool,
            index,
            scan_engine,
        })
    }

    /// Commits an ordered batch of key/value pairs as one transaction.
    ///
    /// The batch is validated, a transaction buffer is leased from the pool,
    /// every pair is staged, and the staged entries are committed into the
    /// versioned index under a freshly assigned transaction ID. The lease is
    /// released on every path, including errors.
    ///
    /// # Errors
    ///
    /// - [`CoreError::IllegalArguments`] for an empty batch, an empty key,
    ///   an oversized key, or a write against a replica.
    /// - [`CoreError::MaxConcurrencyLimitExceeded`] on pool exhaustion.
    /// - [`CoreError::MaxTxEntriesExceeded`] when the batch exceeds the
    ///   per-transaction entry capacity.
    pub fn set(&self, kvs: &[KvPair]) -> CoreResult<TxMetadata> {
        if self.options.replica {
            return Err(CoreError::illegal_arguments(
                "database is a read-only replica",
            ));
        }
        if kvs.is_empty() {
            return Err(CoreError::illegal_arguments("empty write request"));
        }
        for kv in kvs {
            if kv.key.is_empty() {
                return Err(CoreError::illegal_arguments("empty key"));
            }
            if kv.key.len() > self.options.max_key_len {
                return Err(CoreError::illegal_arguments("key exceeds maximum length"));
            }
        }

        let mut lease = self.pool.alloc()?;
        for kv in kvs {
            lease.stage(&kv.key, &kv.value)?;
        }

        let id = self.index.commit(lease.staged_entries());
        Ok(TxMetadata {
            id,
            entry_count: lease.entry_count(),
        })
    }

    /// Reads the value of `key` as of `since_tx`.
    ///
    /// A `since_tx` of zero reads the most recent committed state, waiting
    /// on no pending transaction.
    ///
    /// # Errors
    ///
    /// - [`CoreError::IllegalArguments`] for an empty or oversized key.
    /// - [`CoreError::KeyNotFound`] when no revision satisfies the cutoff.
    pub fn get(&self, key: &[u8], since_tx: u64) -> CoreResult<VersionedEntry> {
        if key.is_empty() {
            return Err(CoreError::illegal_arguments("empty key"));
        }
        if key.len() > self.options.max_key_len {
            return Err(CoreError::illegal_arguments("key exceeds maximum length"));
        }
        self.index.get_visible(key, since_tx)
    }

    /// Runs a range scan. See [`ScanEngine::scan`].
    pub fn scan(&self, request: Option<&ScanRequest>) -> CoreResult<Vec<VersionedEntry>> {
        self.scan_engine.scan(request)
    }

    /// Returns the ID of the most recently committed transaction.
    #[must_use]
    pub fn current_tx(&self) -> TransactionId {
        self.index.committed_tx()
    }

    /// Returns a utilization snapshot.
    #[must_use]
    pub fn stats(&self) -> DbStats {
        DbStats {
            pool: self.pool.stats(),
            committed_tx: self.index.committed_tx(),
            key_count: self.index.key_count(),
        }
    }

    /// Returns the options this database was opened with.
    #[must_use]
    pub fn options(&self) -> &DbOptions {
        &self.options
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("committed_tx", &self.index.committed_tx())
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}
