//! Request dispatch onto the database.

use sealkv_core::{CoreError, Database, KvPair, ScanRequest as CoreScanRequest};
use sealkv_protocol::{
    codes, Entry, EntryList, ErrorReply, KeyRequest, Reply, Request, ScanRequest, SetRequest,
    TxMeta,
};
use std::sync::Arc;

/// Maps engine requests to replies.
///
/// Every [`CoreError`] becomes an [`ErrorReply`] with a stable code; the
/// handler itself is infallible so a single bad request never tears down
/// the connection.
pub struct RequestHandler {
    db: Arc<Database>,
}

impl RequestHandler {
    /// Creates a handler over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Dispatches a request to the matching database operation.
    pub fn handle(&self, request: Request) -> Reply {
        tracing::debug!(type_code = request.type_code(), "handling request");
        match request {
            Request::Set(req) => self.handle_set(req),
            Request::Get(req) => self.handle_get(req),
            Request::Scan(req) => self.handle_scan(req),
        }
    }

    fn handle_set(&self, request: SetRequest) -> Reply {
        let kvs: Vec<KvPair> = request
            .kvs
            .into_iter()
            .map(|kv| KvPair::new(kv.key, kv.value))
            .collect();

        match self.db.set(&kvs) {
            Ok(meta) => Reply::Tx(TxMeta {
                id: meta.id.as_u64(),
                entry_count: meta.entry_count as u64,
            }),
            Err(err) => error_reply(&err),
        }
    }

    fn handle_get(&self, request: KeyRequest) -> Reply {
        match self.db.get(&request.key, request.since_tx) {
            Ok(entry) => Reply::Entry(Entry {
                key: entry.key,
                value: entry.value,
                tx_id: entry.tx_id.as_u64(),
            }),
            Err(err) => error_reply(&err),
        }
    }

    fn handle_scan(&self, request: Option<ScanRequest>) -> Reply {
        let core_request = request.map(|req| CoreScanRequest {
            seek_key: req.seek_key,
            prefix: req.prefix,
            limit: req.limit as usize,
            desc: req.desc,
            since_tx: req.since_tx,
        });

        match self.db.scan(core_request.as_ref()) {
            Ok(entries) => Reply::Entries(EntryList {
                entries: entries
                    .into_iter()
                    .map(|entry| Entry {
                        key: entry.key,
                        value: entry.value,
                        tx_id: entry.tx_id.as_u64(),
                    })
                    .collect(),
            }),
            Err(err) => error_reply(&err),
        }
    }
}

/// Builds an error reply with a stable code for the given engine error.
fn error_reply(err: &CoreError) -> Reply {
    let code = match err {
        CoreError::IllegalArguments { .. } => codes::ILLEGAL_ARGUMENTS,
        CoreError::MaxConcurrencyLimitExceeded => codes::MAX_CONCURRENCY_LIMIT_EXCEEDED,
        CoreError::MaxTxEntriesExceeded { .. } => codes::MAX_TX_ENTRIES_EXCEEDED,
        CoreError::MaxKeyScanLimitExceeded { .. } => codes::MAX_KEY_SCAN_LIMIT_EXCEEDED,
        CoreError::KeyNotFound => codes::KEY_NOT_FOUND,
    };
    Reply::Error(ErrorReply {
        code,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealkv_core::DbOptions;
    use sealkv_protocol::KeyValue;

    fn create_handler() -> RequestHandler {
        let dir = tempfile::tempdir().unwrap();
        let options = DbOptions::default().with_db_root_path(dir.path());
        RequestHandler::new(Arc::new(Database::open(options).unwrap()))
    }

    fn set_request(key: &[u8], value: &[u8]) -> Request {
        Request::Set(SetRequest {
            kvs: vec![KeyValue {
                key: key.to_vec(),
                value: value.to_vec(),
            }],
        })
    }

    #[test]
    fn set_then_get() {
        let handler = create_handler();

        let reply = handler.handle(set_request(b"k", b"v"));
        let Reply::Tx(meta) = reply else {
            panic!("expected Tx reply, got {reply:?}");
        };
        assert_eq!(meta.id, 1);
        assert_eq!(meta.entry_count, 1);

        let reply = handler.handle(Request::Get(KeyRequest {
            key: b"k".to_vec(),
            since_tx: meta.id,
        }));
        let Reply::Entry(entry) = reply else {
            panic!("expected Entry reply, got {reply:?}");
        };
        assert_eq!(entry.value, b"v");
        assert_eq!(entry.tx_id, 1);
    }

    #[test]
    fn missing_key_maps_to_code() {
        let handler = create_handler();

        let reply = handler.handle(Request::Get(KeyRequest {
            key: b"nope".to_vec(),
            since_tx: 0,
        }));
        let Reply::Error(err) = reply else {
            panic!("expected Error reply, got {reply:?}");
        };
        assert_eq!(err.code, codes::KEY_NOT_FOUND);
    }

    #[test]
    fn absent_scan_request_rejected() {
        let handler = create_handler();

        let reply = handler.handle(Request::Scan(None));
        let Reply::Error(err) = reply else {
            panic!("expected Error reply, got {reply:?}");
        };
        assert_eq!(err.code, codes::ILLEGAL_ARGUMENTS);
    }

    #[test]
    fn scan_returns_ordered_entries() {
        let handler = create_handler();
        handler.handle(set_request(b"bbb", b"2"));
        handler.handle(set_request(b"aaa", b"1"));

        let reply = handler.handle(Request::Scan(Some(ScanRequest::default())));
        let Reply::Entries(list) = reply else {
            panic!("expected Entries reply, got {reply:?}");
        };
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].key, b"aaa");
        assert_eq!(list.entries[1].key, b"bbb");
    }

    #[test]
    fn empty_write_maps_to_code() {
        let handler = create_handler();

        let reply = handler.handle(Request::Set(SetRequest { kvs: vec![] }));
        let Reply::Error(err) = reply else {
            panic!("expected Error reply, got {reply:?}");
        };
        assert_eq!(err.code, codes::ILLEGAL_ARGUMENTS);
    }
}
