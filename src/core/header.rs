//! Frame header codec.
//!
//! Every eDonkey TCP frame starts with a fixed 5-byte header: a one-byte
//! protocol identifier followed by the payload size as a little-endian u32.
//! The size counts every byte after the header, including the one-byte
//! message type that leads the payload.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};

/// Protocol identifier for classic eDonkey frames.
pub const PROTO_EDONKEY: u8 = 0xE3;
/// Protocol identifier for extended eMule frames.
pub const PROTO_EMULE: u8 = 0xC5;
/// Protocol identifier for zlib-packed frames.
pub const PROTO_PACKED: u8 = 0xD4;

/// Length of the message header: 1-byte protocol + 4-byte payload size.
pub const HEADER_LEN: usize = 5;

/// The frame header preceding every message payload.
///
/// A zero protocol byte is treated as "unspecified" and normalized to
/// [`PROTO_EDONKEY`] on both encode and decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Protocol identifier: 0xE3 eDonkey, 0xC5 eMule, 0xD4 packed.
    pub protocol: u8,
    /// Payload size in bytes, not counting the 5 header bytes.
    pub size: u32,
}

impl Header {
    /// Creates a header for the given protocol with a zero size. The size is
    /// back-patched by message encoders once the payload length is known.
    pub fn new(protocol: u8) -> Self {
        Header { protocol, size: 0 }
    }

    fn checked_protocol(&self) -> Result<u8> {
        let proto = if self.protocol == 0 {
            PROTO_EDONKEY
        } else {
            self.protocol
        };
        match proto {
            PROTO_EDONKEY | PROTO_EMULE | PROTO_PACKED => Ok(proto),
            other => Err(WireError::InvalidProtocol(other)),
        }
    }

    /// Writes the 5 header bytes to `buf`.
    pub fn write_to(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_u8(self.checked_protocol()?);
        buf.put_u32_le(self.size);
        Ok(())
    }

    /// Reads a header from the front of `buf`, consuming exactly
    /// [`HEADER_LEN`] bytes on success.
    pub fn read_from(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < HEADER_LEN {
            return Err(WireError::ShortBuffer);
        }
        let header = Header {
            protocol: buf.get_u8(),
            size: buf.get_u32_le(),
        };
        let protocol = header.checked_protocol()?;
        Ok(Header { protocol, ..header })
    }

    /// Encodes the header to a standalone byte vector.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(HEADER_LEN);
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decodes a header from the first 5 bytes of `data`.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut &data[..])
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "protocol: {:#04x}, size: {}", self.protocol, self.size)
    }
}
