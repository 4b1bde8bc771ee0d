//! # Error Types
//!
//! Error handling for the eDonkey/eMule wire codec.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding protocol frames, from low-level I/O failures to malformed tag
//! encodings sent by remote peers.
//!
//! Decoders never panic and never retry: they return the first error
//! encountered and leave recovery to the caller. Encoders can only fail when
//! the underlying writer fails or an invariant of the input value is
//! violated.

use std::io;
use thiserror::Error;

/// Primary error type for all codec operations.
#[derive(Error, Debug)]
pub enum WireError {
    /// Not enough bytes were available for the expected field.
    #[error("short buffer")]
    ShortBuffer,

    /// The header protocol byte was not 0xE3, 0xC5 or 0xD4.
    #[error("invalid protocol: {0:#04x}")]
    InvalidProtocol(u8),

    /// The dispatcher has no decoder registered for this message-type code.
    #[error("unknown message type: {0:#04x}")]
    UnknownMessageType(u8),

    /// A typed decoder was handed a payload whose first byte is not its own
    /// message-type code.
    #[error("wrong message type")]
    WrongMessageType,

    /// The tag decoder encountered a value type it does not implement.
    #[error("invalid tag type: {0:#04x}")]
    InvalidTagType(u8),

    /// The search decoder encountered an expression tag it does not
    /// implement.
    #[error("invalid search expression type: {0:#04x}")]
    InvalidSearchType(u8),

    /// The search encoder was invoked with a missing or empty predicate.
    #[error("empty searcher")]
    EmptySearcher,

    /// The search decoder hit the nesting ceiling.
    #[error("search expression too deep")]
    SearchTooDeep,

    /// The header announced a payload larger than the configured ceiling.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: u32, max: u32 },

    /// Pass-through from the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using `WireError`.
pub type Result<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_code() {
        let err = WireError::UnknownMessageType(0x77);
        assert!(err.to_string().contains("0x77"));

        let err = WireError::InvalidTagType(0x0a);
        assert!(err.to_string().contains("0x0a"));
    }

    #[test]
    fn io_error_passthrough() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err = WireError::from(io_err);
        assert!(matches!(err, WireError::Io(_)));
    }
}
