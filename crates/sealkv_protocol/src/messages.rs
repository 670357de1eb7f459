//! Protocol messages for the SealKV service.

use serde::{Deserialize, Serialize};

/// Stable error codes carried in [`ErrorReply`].
pub mod codes {
    /// Malformed or missing request fields.
    pub const ILLEGAL_ARGUMENTS: u16 = 1;
    /// Transaction pool exhausted; retry with backoff.
    pub const MAX_CONCURRENCY_LIMIT_EXCEEDED: u16 = 2;
    /// Write batch exceeds the per-transaction entry capacity.
    pub const MAX_TX_ENTRIES_EXCEEDED: u16 = 3;
    /// Requested scan limit exceeds the configured ceiling.
    pub const MAX_KEY_SCAN_LIMIT_EXCEEDED: u16 = 4;
    /// No revision satisfies the visibility cutoff.
    pub const KEY_NOT_FOUND: u16 = 5;
    /// Unexpected server-side failure.
    pub const INTERNAL: u16 = 100;
}

/// A key/value pair in a write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Key bytes.
    pub key: Vec<u8>,
    /// Value bytes.
    pub value: Vec<u8>,
}

/// Write request: an ordered batch committed as one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRequest {
    /// Key/value pairs to commit.
    pub kvs: Vec<KeyValue>,
}

/// Point-read request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    /// Key to look up.
    pub key: Vec<u8>,
    /// Visibility cutoff; zero means "latest committed".
    pub since_tx: u64,
}

/// Range-scan request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// First key visited in traversal order, inclusive.
    pub seek_key: Option<Vec<u8>>,
    /// Restrict results to keys sharing this prefix.
    pub prefix: Option<Vec<u8>>,
    /// Maximum number of results; zero uses the server default.
    pub limit: u64,
    /// Traverse in reverse-lexicographic order.
    pub desc: bool,
    /// Visibility cutoff; zero means "latest committed".
    pub since_tx: u64,
}

/// Metadata of a committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMeta {
    /// Assigned transaction ID.
    pub id: u64,
    /// Number of entries written.
    pub entry_count: u64,
}

/// A resolved key/value entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Key bytes.
    pub key: Vec<u8>,
    /// Value bytes.
    pub value: Vec<u8>,
    /// Transaction that committed this revision.
    pub tx_id: u64,
}

/// An ordered list of resolved entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList {
    /// Entries in traversal order.
    pub entries: Vec<Entry>,
}

/// An error outcome for any request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Stable error code (see [`codes`]).
    pub code: u16,
    /// Human-readable description.
    pub message: String,
}

/// A client request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Commit a batch of key/value pairs.
    Set(SetRequest),
    /// Point read.
    Get(KeyRequest),
    /// Range scan. `None` models an absent request object and is rejected
    /// by the server with `ILLEGAL_ARGUMENTS`.
    Scan(Option<ScanRequest>),
}

impl Request {
    /// Returns the request type code.
    #[must_use]
    pub fn type_code(&self) -> u8 {
        match self {
            Request::Set(_) => 1,
            Request::Get(_) => 2,
            Request::Scan(_) => 3,
        }
    }
}

/// A server reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    /// Successful write.
    Tx(TxMeta),
    /// Successful point read.
    Entry(Entry),
    /// Successful scan.
    Entries(EntryList),
    /// Request failed.
    Error(ErrorReply),
}

impl Reply {
    /// Returns the reply type code.
    #[must_use]
    pub fn type_code(&self) -> u8 {
        match self {
            Reply::Tx(_) => 1,
            Reply::Entry(_) => 2,
            Reply::Entries(_) => 3,
            Reply::Error(_) => 4,
        }
    }
}
