//! Framed TCP server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;
use sealkv_core::Database;
use sealkv_protocol::{decode, encode, ProtocolError, Reply, Request, MAX_FRAME_LEN};
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

/// The SealKV network server.
///
/// A thin shim over [`Database`]: each connection carries a sequence of
/// length-prefixed CBOR frames, one request per frame, answered in order.
/// All engine semantics (limits, visibility, backpressure) live in the
/// core; the server only frames, decodes, dispatches, and encodes.
pub struct KvServer {
    config: ServerConfig,
    handler: Arc<RequestHandler>,
}

impl KvServer {
    /// Creates a server over the given database.
    pub fn new(config: ServerConfig, db: Arc<Database>) -> Self {
        Self {
            config,
            handler: Arc::new(RequestHandler::new(db)),
        }
    }

    /// Dispatches a single request directly, bypassing the transport.
    pub fn handle_request(&self, request: Request) -> Reply {
        self.handler.handle(request)
    }

    /// Binds the configured address and serves connections until the task
    /// is dropped.
    pub async fn serve(&self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with_listener(listener).await
    }

    /// Serves connections from an already-bound listener.
    ///
    /// Useful when binding to port 0 and retrieving the local address
    /// before accepting.
    pub async fn serve_with_listener(&self, listener: TcpListener) -> ServerResult<()> {
        tracing::info!(addr = %listener.local_addr()?, "listening");
        let connection_limit = Arc::new(Semaphore::new(self.config.max_connections));

        loop {
            let (stream, peer) = listener.accept().await?;
            let permit = match Arc::clone(&connection_limit).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!(%peer, "connection limit reached, rejecting");
                    continue;
                }
            };

            let handler = Arc::clone(&self.handler);
            let request_timeout = self.config.request_timeout;
            tokio::spawn(async move {
                let _permit = permit;
                tracing::debug!(%peer, "connection accepted");
                match serve_connection(stream, handler, request_timeout).await {
                    Ok(()) => tracing::debug!(%peer, "connection closed"),
                    Err(err) => tracing::debug!(%peer, error = %err, "connection failed"),
                }
            });
        }
    }
}

/// Answers request frames on one connection until the peer disconnects.
///
/// A disconnect mid-request simply ends the task; any engine-side resources
/// (transaction leases) release when the in-flight call unwinds.
async fn serve_connection(
    mut stream: TcpStream,
    handler: Arc<RequestHandler>,
    request_timeout: Duration,
) -> ServerResult<()> {
    loop {
        let mut len_buf = [0u8; 4];
        match stream.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(()),
            Err(err) => return Err(err.into()),
        }

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            return Err(ProtocolError::FrameTooLarge {
                size: len,
                max: MAX_FRAME_LEN,
            }
            .into());
        }

        let mut body = vec![0u8; len];
        tokio::time::timeout(request_timeout, stream.read_exact(&mut body))
            .await
            .map_err(|_| ServerError::RequestTimeout)??;

        let request: Request = decode(&body)?;
        let reply = handler.handle(request);
        let frame = encode(&reply)?;

        stream
            .write_all(&(frame.len() as u32).to_be_bytes())
            .await?;
        stream.write_all(&frame).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealkv_core::DbOptions;
    use sealkv_protocol::{KeyRequest, KeyValue, ScanRequest, SetRequest};

    fn create_server() -> (KvServer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let options = DbOptions::default().with_db_root_path(dir.path());
        let db = Arc::new(Database::open(options).unwrap());
        (KvServer::new(ServerConfig::default(), db), dir)
    }

    async fn send(stream: &mut TcpStream, request: &Request) -> Reply {
        let frame = encode(request).unwrap();
        stream
            .write_all(&(frame.len() as u32).to_be_bytes())
            .await
            .unwrap();
        stream.write_all(&frame).await.unwrap();

        let mut len_buf = [0u8; 4];
        stream.read_exact(&mut len_buf).await.unwrap();
        let mut body = vec![0u8; u32::from_be_bytes(len_buf) as usize];
        stream.read_exact(&mut body).await.unwrap();
        decode(&body).unwrap()
    }

    #[test]
    fn direct_dispatch() {
        let (server, _dir) = create_server();

        let reply = server.handle_request(Request::Set(SetRequest {
            kvs: vec![KeyValue {
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            }],
        }));
        assert!(matches!(reply, Reply::Tx(_)));
    }

    #[tokio::test]
    async fn framed_roundtrip_over_tcp() {
        let (server, _dir) = create_server();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Arc::new(server);
        let serve_task = {
            let server = Arc::clone(&server);
            tokio::spawn(async move { server.serve_with_listener(listener).await })
        };

        let mut stream = TcpStream::connect(addr).await.unwrap();

        let reply = send(
            &mut stream,
            &Request::Set(SetRequest {
                kvs: vec![
                    KeyValue {
                        key: b"aaa".to_vec(),
                        value: b"item1".to_vec(),
                    },
                    KeyValue {
                        key: b"abc".to_vec(),
                        value: b"item3".to_vec(),
                    },
                ],
            }),
        )
        .await;
        let Reply::Tx(meta) = reply else {
            panic!("expected Tx reply, got {reply:?}");
        };
        assert_eq!(meta.entry_count, 2);

        let reply = send(
            &mut stream,
            &Request::Get(KeyRequest {
                key: b"aaa".to_vec(),
                since_tx: meta.id,
            }),
        )
        .await;
        let Reply::Entry(entry) = reply else {
            panic!("expected Entry reply, got {reply:?}");
        };
        assert_eq!(entry.value, b"item1");

        let reply = send(
            &mut stream,
            &Request::Scan(Some(ScanRequest {
                prefix: Some(b"a".to_vec()),
                ..ScanRequest::default()
            })),
        )
        .await;
        let Reply::Entries(list) = reply else {
            panic!("expected Entries reply, got {reply:?}");
        };
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].key, b"aaa");
        assert_eq!(list.entries[1].key, b"abc");

        drop(stream);
        serve_task.abort();
    }
}
