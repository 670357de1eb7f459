//! Error types for the SealKV engine.

use thiserror::Error;

/// Result type for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in SealKV engine operations.
///
/// Every error is scoped to a single request and returned synchronously to
/// the caller; none is fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed or missing request fields.
    #[error("illegal arguments: {message}")]
    IllegalArguments {
        /// Description of the offending field.
        message: String,
    },

    /// The transaction pool has no capacity for a new lease.
    ///
    /// Not retried internally; callers are expected to retry with backoff.
    #[error("max concurrency limit exceeded")]
    MaxConcurrencyLimitExceeded,

    /// A write batch exceeds the per-transaction entry capacity.
    #[error("max transaction entries exceeded: limit is {limit}")]
    MaxTxEntriesExceeded {
        /// Configured per-transaction entry limit.
        limit: usize,
    },

    /// A requested scan limit exceeds the configured ceiling.
    #[error("max key scan limit exceeded: limit is {limit}")]
    MaxKeyScanLimitExceeded {
        /// Configured scan limit ceiling.
        limit: usize,
    },

    /// A point read has no revision satisfying the visibility cutoff.
    #[error("key not found")]
    KeyNotFound,
}

impl CoreError {
    /// Creates an illegal-arguments error.
    pub fn illegal_arguments(message: impl Into<String>) -> Self {
        Self::IllegalArguments {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_arguments_display() {
        let err = CoreError::illegal_arguments("empty key");
        assert_eq!(err.to_string(), "illegal arguments: empty key");
    }

    #[test]
    fn limit_errors_carry_limit() {
        let err = CoreError::MaxTxEntriesExceeded { limit: 16 };
        assert!(err.to_string().contains("16"));

        let err = CoreError::MaxKeyScanLimitExceeded { limit: 1000 };
        assert!(err.to_string().contains("1000"));
    }
}
