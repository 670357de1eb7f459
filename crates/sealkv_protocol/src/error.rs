//! Error types for the wire protocol.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message failed to encode.
    #[error("encode error: {0}")]
    Encode(String),

    /// Message failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// A frame exceeds the maximum allowed size.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Declared frame size.
        size: usize,
        /// Maximum allowed frame size.
        max: usize,
    },
}

impl From<ciborium::ser::Error<std::io::Error>> for ProtocolError {
    fn from(err: ciborium::ser::Error<std::io::Error>) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<ciborium::de::Error<std::io::Error>> for ProtocolError {
    fn from(err: ciborium::de::Error<std::io::Error>) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_too_large_display() {
        let err = ProtocolError::FrameTooLarge {
            size: 100,
            max: 50,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }
}
