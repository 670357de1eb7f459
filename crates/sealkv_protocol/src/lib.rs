//! # SealKV Protocol
//!
//! Request/response message types shared by the SealKV server and its
//! clients, with CBOR encoding. Transport framing is a length-prefixed
//! frame of at most [`MAX_FRAME_LEN`] bytes carrying one encoded message.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod messages;

pub use codec::{decode, encode, MAX_FRAME_LEN};
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    codes, Entry, EntryList, ErrorReply, KeyRequest, KeyValue, Reply, Request, ScanRequest,
    SetRequest, TxMeta,
};
