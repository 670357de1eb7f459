//! Database options.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

/// Default database root directory.
pub const DEFAULT_DB_ROOT_PATH: &str = "./data";
/// Default transaction pool size.
pub const DEFAULT_POOL_SIZE: usize = 128;
/// Default maximum number of entries per transaction.
pub const DEFAULT_MAX_TX_ENTRIES: usize = 1024;
/// Default maximum key length in bytes.
pub const DEFAULT_MAX_KEY_LEN: usize = 1024;
/// Default ceiling on scan result size.
pub const DEFAULT_MAX_SCAN_LIMIT: usize = 1000;

/// Configuration for opening a database.
///
/// All numeric fields must be positive; `validate()` rejects anything else
/// with [`CoreError::IllegalArguments`].
#[derive(Debug, Clone)]
pub struct DbOptions {
    /// Directory in which the database resides.
    pub db_root_path: PathBuf,

    /// Maximum number of concurrently leased transactions.
    pub pool_size: usize,

    /// Maximum number of key/value entries per transaction.
    pub max_tx_entries: usize,

    /// Maximum key length in bytes.
    pub max_key_len: usize,

    /// Whether to eagerly construct all pool transactions at startup.
    pub preallocated: bool,

    /// Ceiling on the number of entries a single scan may return.
    /// A scan with `limit = 0` falls back to this value.
    pub max_scan_limit: usize,

    /// Whether this database is a read-only replica.
    pub replica: bool,

    /// Whether the background corruption checker should run for this
    /// database instance.
    pub corruption_checker: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            db_root_path: PathBuf::from(DEFAULT_DB_ROOT_PATH),
            pool_size: DEFAULT_POOL_SIZE,
            max_tx_entries: DEFAULT_MAX_TX_ENTRIES,
            max_key_len: DEFAULT_MAX_KEY_LEN,
            preallocated: false,
            max_scan_limit: DEFAULT_MAX_SCAN_LIMIT,
            replica: false,
            corruption_checker: false,
        }
    }
}

impl DbOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database root directory.
    #[must_use]
    pub fn with_db_root_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_root_path = path.into();
        self
    }

    /// Sets the transaction pool size.
    #[must_use]
    pub const fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Sets the maximum number of entries per transaction.
    #[must_use]
    pub const fn with_max_tx_entries(mut self, max: usize) -> Self {
        self.max_tx_entries = max;
        self
    }

    /// Sets the maximum key length.
    #[must_use]
    pub const fn with_max_key_len(mut self, len: usize) -> Self {
        self.max_key_len = len;
        self
    }

    /// Sets whether the pool is preallocated at startup.
    #[must_use]
    pub const fn with_preallocated(mut self, value: bool) -> Self {
        self.preallocated = value;
        self
    }

    /// Sets the scan limit ceiling.
    #[must_use]
    pub const fn with_max_scan_limit(mut self, limit: usize) -> Self {
        self.max_scan_limit = limit;
        self
    }

    /// Sets whether this database is a read-only replica.
    #[must_use]
    pub const fn as_replica(mut self, replica: bool) -> Self {
        self.replica = replica;
        self
    }

    /// Sets whether the corruption checker should run.
    #[must_use]
    pub const fn with_corruption_checker(mut self, value: bool) -> Self {
        self.corruption_checker = value;
        self
    }

    /// Validates the options.
    pub fn validate(&self) -> CoreResult<()> {
        if self.db_root_path.as_os_str().is_empty() {
            return Err(CoreError::illegal_arguments("empty database root path"));
        }
        if self.pool_size == 0 {
            return Err(CoreError::illegal_arguments("pool size must be positive"));
        }
        if self.max_tx_entries == 0 {
            return Err(CoreError::illegal_arguments(
                "max transaction entries must be positive",
            ));
        }
        if self.max_key_len == 0 {
            return Err(CoreError::illegal_arguments(
                "max key length must be positive",
            ));
        }
        if self.max_scan_limit == 0 {
            return Err(CoreError::illegal_arguments(
                "max scan limit must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        let options = DbOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(options.max_scan_limit, DEFAULT_MAX_SCAN_LIMIT);
        assert!(!options.replica);
    }

    #[test]
    fn builder_pattern() {
        let options = DbOptions::new()
            .with_db_root_path("/tmp/seal")
            .with_pool_size(4)
            .with_max_tx_entries(8)
            .with_preallocated(true)
            .as_replica(true);

        assert_eq!(options.db_root_path, PathBuf::from("/tmp/seal"));
        assert_eq!(options.pool_size, 4);
        assert_eq!(options.max_tx_entries, 8);
        assert!(options.preallocated);
        assert!(options.replica);
    }

    #[test]
    fn zero_fields_rejected() {
        assert_eq!(
            DbOptions::new().with_pool_size(0).validate(),
            Err(CoreError::illegal_arguments("pool size must be positive"))
        );
        assert!(DbOptions::new().with_max_tx_entries(0).validate().is_err());
        assert!(DbOptions::new().with_max_key_len(0).validate().is_err());
        assert!(DbOptions::new().with_max_scan_limit(0).validate().is_err());
        assert!(DbOptions::new().with_db_root_path("").validate().is_err());
    }
}
