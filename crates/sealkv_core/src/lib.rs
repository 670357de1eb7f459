//! # SealKV Core
//!
//! Embedded, tamper-evident key-value engine. Writes are committed as
//! immutable, strictly ordered transactions into an append-only versioned
//! index; reads resolve either the latest value of a key or the value "as
//! of" a specific transaction, and range scans traverse the keyspace with
//! seek/prefix/direction/limit filters under a visibility cutoff.
//!
//! The engine is built from four pieces:
//! - [`VersionedIndex`] — append-only mapping from key to ordered
//!   `(transaction, value)` revisions;
//! - [`TxPool`] — bounded pool of reusable transaction buffers, the write
//!   path's backpressure point;
//! - [`ScanEngine`] — stateless, snapshot-consistent range scans;
//! - [`Database`] — the facade composing the three into `set`/`get`/`scan`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod database;
pub mod error;
pub mod index;
pub mod options;
pub mod pool;
pub mod scan;
pub mod transaction;
pub mod types;

pub use database::{Database, DbStats};
pub use error::{CoreError, CoreResult};
pub use index::{Revision, VersionedIndex};
pub use options::DbOptions;
pub use pool::{PoolStats, TxLease, TxPool};
pub use scan::{ScanEngine, ScanRequest};
pub use transaction::Transaction;
pub use types::{KvPair, TransactionId, TxMetadata, VersionedEntry};
