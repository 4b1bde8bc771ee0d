//! File record codec.
//!
//! A file record describes one shared file inside offer-files and
//! search-result messages: the content hash that identifies the file, the
//! endpoint of the client offering it, and a tag list with the file name,
//! size and media metadata.
//!
//! ```text
//! [hash(16)] [clientID(4 LE)] [port(2 LE)] [tagCount(4 LE)] [tags...]
//! ```

use std::fmt;

use bytes::{Buf, BufMut};

use crate::core::tag::Tag;
use crate::error::{Result, WireError};
use crate::identity::ClientId;

/// Fixed-size prefix of a file record before the tag list.
const FILE_FIXED_LEN: usize = 26;

/// A single file entry in an offer or search result.
///
/// A peer offering a file carries at least the name and size tags; the tag
/// list order is preserved across decode→encode round-trips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    /// Hash of the file contents; identifies the file regardless of name
    /// differences between clients.
    pub hash: [u8; 16],
    /// The offering client's ID when it has a high ID, zero otherwise.
    pub client_id: ClientId,
    /// The client's TCP port, or zero when it has a low ID.
    pub port: u16,
    /// File tags: name, size, type, format, media metadata.
    pub tags: Vec<Tag>,
}

impl File {
    /// Writes the file record to `buf`.
    pub fn write_to(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_slice(&self.hash);
        buf.put_u32_le(self.client_id.value());
        buf.put_u16_le(self.port);
        buf.put_u32_le(self.tags.len() as u32);
        for tag in &self.tags {
            tag.write_to(buf)?;
        }
        Ok(())
    }

    /// Reads one file record from the front of `buf`.
    pub fn read_from(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < FILE_FIXED_LEN {
            return Err(WireError::ShortBuffer);
        }
        let mut hash = [0u8; 16];
        buf.copy_to_slice(&mut hash);
        let client_id = ClientId::from(buf.get_u32_le());
        let port = buf.get_u16_le();
        let tag_count = buf.get_u32_le();

        let mut tags = Vec::new();
        for _ in 0..tag_count {
            tags.push(Tag::read_from(buf)?);
        }
        Ok(File {
            hash,
            client_id,
            port,
            tags,
        })
    }

    /// Encodes the file record to a standalone byte vector.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decodes a file record from the front of `data`.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut &data[..])
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}",
            hex::encode_upper(self.hash),
            self.client_id,
            self.port
        )?;
        for (i, tag) in self.tags.iter().enumerate() {
            write!(f, "\ntag{i} - {tag}")?;
        }
        Ok(())
    }
}
