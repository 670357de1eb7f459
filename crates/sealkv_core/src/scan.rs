//! Snapshot-consistent range scans.

use crate::error::{CoreError, CoreResult};
use crate::index::VersionedIndex;
use crate::types::VersionedEntry;
use std::ops::Bound;
use std::sync::Arc;

/// Parameters of a range scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// First key visited in traversal order, inclusive. When unset the
    /// traversal starts at the natural start (ascending) or end
    /// (descending) of the keyspace.
    pub seek_key: Option<Vec<u8>>,
    /// Restrict results to keys sharing this byte prefix.
    pub prefix: Option<Vec<u8>>,
    /// Maximum number of results. Zero falls back to the configured scan
    /// ceiling; values above the ceiling are rejected.
    pub limit: usize,
    /// Traverse keys in reverse-lexicographic order.
    pub desc: bool,
    /// Visibility cutoff; zero means "latest committed".
    pub since_tx: u64,
}

impl ScanRequest {
    /// Creates a scan request with default parameters (full ascending scan
    /// of the latest committed state).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seek key.
    #[must_use]
    pub fn with_seek_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.seek_key = Some(key.into());
        self
    }

    /// Sets the key prefix filter.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the traversal direction.
    #[must_use]
    pub const fn descending(mut self, desc: bool) -> Self {
        self.desc = desc;
        self
    }

    /// Sets the visibility cutoff.
    #[must_use]
    pub const fn with_since_tx(mut self, since_tx: u64) -> Self {
        self.since_tx = since_tx;
        self
    }
}

/// Executes bounded, ordered, prefix/seek/direction-aware reads against the
/// versioned index.
///
/// Scans are stateless: each invocation is a fresh traversal with no
/// server-held cursor. The result set is collected under a single
/// read-lock acquisition, so a scan observes the committed state as of its
/// start; a commit finishing after the scan began may legally be missed
/// (read-committed-as-of-start).
#[derive(Debug)]
pub struct ScanEngine {
    index: Arc<VersionedIndex>,
    max_scan_limit: usize,
}

impl ScanEngine {
    /// Creates a scan engine over the given index.
    pub(crate) fn new(index: Arc<VersionedIndex>, max_scan_limit: usize) -> Self {
        Self {
            index,
            max_scan_limit,
        }
    }

    /// Runs a scan.
    ///
    /// # Errors
    ///
    /// - [`CoreError::IllegalArguments`] for an absent request.
    /// - [`CoreError::MaxKeyScanLimitExceeded`] when the requested limit is
    ///   above the configured ceiling.
    pub fn scan(&self, request: Option<&ScanRequest>) -> CoreResult<Vec<VersionedEntry>> {
        let request =
            request.ok_or_else(|| CoreError::illegal_arguments("missing scan request"))?;

        if request.limit > self.max_scan_limit {
            return Err(CoreError::MaxKeyScanLimitExceeded {
                limit: self.max_scan_limit,
            });
        }
        let limit = if request.limit == 0 {
            self.max_scan_limit
        } else {
            request.limit
        };

        let state = self.index.read_state();
        let cutoff = state.resolve_cutoff(request.since_tx);

        let keys = &state.keys;
        let visit: Box<dyn Iterator<Item = (&Vec<u8>, &Vec<crate::index::Revision>)> + '_> =
            match (&request.seek_key, request.desc) {
                (Some(seek), false) => Box::new(
                    keys.range::<[u8], _>((Bound::Included(seek.as_slice()), Bound::Unbounded)),
                ),
                (Some(seek), true) => Box::new(
                    keys.range::<[u8], _>((Bound::Unbounded, Bound::Included(seek.as_slice())))
                        .rev(),
                ),
                (None, false) => Box::new(keys.iter()),
                (None, true) => Box::new(keys.iter().rev()),
            };

        let mut entries = Vec::new();
        for (key, revisions) in visit {
            if entries.len() == limit {
                break;
            }
            if let Some(prefix) = &request.prefix {
                if !key.starts_with(prefix) {
                    continue;
                }
            }
            // Skip keys with no revision at or below the cutoff, e.g. keys
            // created after it.
            let Some(revision) = state.visible(revisions, cutoff) else {
                continue;
            };
            entries.push(VersionedEntry {
                key: key.clone(),
                value: revision.value.clone(),
                tx_id: revision.tx_id,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_keys(kvs: &[(&[u8], &[u8])]) -> (ScanEngine, u64) {
        let index = Arc::new(VersionedIndex::new());
        let mut last = 0;
        for (key, value) in kvs {
            last = index.commit([(*key, *value)]).as_u64();
        }
        (ScanEngine::new(index, 1000), last)
    }

    fn keys_of(entries: &[VersionedEntry]) -> Vec<&[u8]> {
        entries.iter().map(|e| e.key.as_slice()).collect()
    }

    #[test]
    fn missing_request_rejected() {
        let (engine, _) = engine_with_keys(&[]);
        assert_eq!(
            engine.scan(None),
            Err(CoreError::illegal_arguments("missing scan request"))
        );
    }

    #[test]
    fn full_ascending_scan() {
        let (engine, _) = engine_with_keys(&[(b"b", b"2"), (b"a", b"1"), (b"c", b"3")]);
        let entries = engine.scan(Some(&ScanRequest::new())).unwrap();
        assert_eq!(keys_of(&entries), vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
    }

    #[test]
    fn descending_scan_with_seek() {
        let (engine, last) = engine_with_keys(&[(b"aaa", b"1"), (b"bbb", b"2"), (b"abc", b"3")]);

        let request = ScanRequest::new()
            .with_seek_key(b"b".to_vec())
            .with_prefix(b"a".to_vec())
            .descending(true)
            .with_since_tx(last);
        let entries = engine.scan(Some(&request)).unwrap();

        assert_eq!(keys_of(&entries), vec![&b"abc"[..], &b"aaa"[..]]);
        assert_eq!(entries[0].value, b"3");
        assert_eq!(entries[1].value, b"1");
    }

    #[test]
    fn seek_key_is_inclusive() {
        let (engine, _) = engine_with_keys(&[(b"a", b"1"), (b"b", b"2"), (b"c", b"3")]);

        let asc = ScanRequest::new().with_seek_key(b"b".to_vec());
        let entries = engine.scan(Some(&asc)).unwrap();
        assert_eq!(keys_of(&entries), vec![&b"b"[..], &b"c"[..]]);

        let desc = ScanRequest::new().with_seek_key(b"b".to_vec()).descending(true);
        let entries = engine.scan(Some(&desc)).unwrap();
        assert_eq!(keys_of(&entries), vec![&b"b"[..], &b"a"[..]]);
    }

    #[test]
    fn limit_bounds_results() {
        let (engine, _) = engine_with_keys(&[(b"a", b"1"), (b"b", b"2"), (b"c", b"3")]);

        let request = ScanRequest::new().with_limit(2);
        let entries = engine.scan(Some(&request)).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn limit_over_ceiling_rejected() {
        let index = Arc::new(VersionedIndex::new());
        let engine = ScanEngine::new(index, 10);

        let request = ScanRequest::new().with_limit(11);
        assert_eq!(
            engine.scan(Some(&request)),
            Err(CoreError::MaxKeyScanLimitExceeded { limit: 10 })
        );

        // Zero falls back to the ceiling and never fails on limit alone.
        let request = ScanRequest::new().with_limit(0);
        assert!(engine.scan(Some(&request)).is_ok());
    }

    #[test]
    fn cutoff_hides_later_revisions() {
        let index = Arc::new(VersionedIndex::new());
        let t1 = index.commit([(&b"k"[..], &b"old"[..])]);
        index.commit([(&b"k"[..], &b"new"[..])]);
        index.commit([(&b"later"[..], &b"x"[..])]);
        let engine = ScanEngine::new(index, 1000);

        let request = ScanRequest::new().with_since_tx(t1.as_u64());
        let entries = engine.scan(Some(&request)).unwrap();

        // "later" was created after the cutoff and is skipped entirely.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, b"k");
        assert_eq!(entries[0].value, b"old");
    }

    #[test]
    fn repeated_scans_are_deterministic() {
        let (engine, last) = engine_with_keys(&[(b"c", b"3"), (b"a", b"1"), (b"b", b"2")]);
        let request = ScanRequest::new().with_since_tx(last);

        let first = engine.scan(Some(&request)).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.scan(Some(&request)).unwrap(), first);
        }
    }
}
