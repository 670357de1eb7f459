//! CBOR encoding of protocol messages.

use crate::error::ProtocolResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Maximum size in bytes of a single wire frame.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Encodes a message to CBOR bytes.
pub fn encode<T: Serialize>(message: &T) -> ProtocolResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(message, &mut buf)?;
    Ok(buf)
}

/// Decodes a message from CBOR bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ProtocolResult<T> {
    Ok(ciborium::from_reader(bytes)?)
}
