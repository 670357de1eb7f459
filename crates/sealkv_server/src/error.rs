//! Error types for the SealKV server.

use sealkv_core::CoreError;
use sealkv_protocol::ProtocolError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
///
/// Engine errors never surface here: the request handler turns every
/// [`CoreError`] into an error reply for the client. `ServerError` covers
/// the transport itself.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A frame could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Engine failure outside the per-request path (e.g. at startup).
    #[error("database error: {0}")]
    Database(#[from] CoreError),

    /// Reading a request frame exceeded the configured timeout.
    #[error("request timed out")]
    RequestTimeout,

    /// I/O error on the listener or a connection.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
