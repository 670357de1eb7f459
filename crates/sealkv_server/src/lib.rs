//! # SealKV Server
//!
//! Thin network service exposing a [`sealkv_core::Database`] over framed
//! TCP. Requests and replies are the [`sealkv_protocol`] messages, one per
//! length-prefixed CBOR frame.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handler;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use server::KvServer;
