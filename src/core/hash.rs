//! Content-addressed file fingerprinting.
//!
//! Files are identified on the network by a 128-bit MD4-based fingerprint.
//! The input is hashed in fixed chunks of 9 728 000 bytes; each chunk yields
//! a part hash, and the final hash is derived from the part hashes:
//!
//! - no chunks (empty input): the MD4 digest of the empty input
//! - one chunk: that chunk's part hash
//! - more: the MD4 digest of all part hashes concatenated in order
//!
//! MD4 is a protocol constant here, not a security choice; every peer on the
//! network computes the same fingerprints.

use std::fmt;
use std::io::Read;

use md4::{Digest, Md4};
use tracing::debug;

use crate::error::Result;

/// Size of one file chunk, the unit of part-hashing and transfer.
pub const CHUNK_SIZE: usize = 9_728_000;

/// Maximum file size in bytes (2^38 = 256 GiB).
pub const MAX_FILE_SIZE: u64 = 2 << 37;

/// The fingerprint of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHash {
    /// Total number of bytes hashed.
    pub size: u64,
    /// The file's identifying hash.
    pub hash: [u8; 16],
    /// One part hash per chunk, in order.
    pub parts: Vec<[u8; 16]>,
}

impl fmt::Display for FileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "size: {}, hash: {}",
            self.size,
            hex::encode_upper(self.hash)
        )?;
        writeln!(f, "part hash:")?;
        for (i, part) in self.parts.iter().enumerate() {
            writeln!(f, "{i} - {}", hex::encode_upper(part))?;
        }
        Ok(())
    }
}

fn md4_digest(data: &[u8]) -> [u8; 16] {
    let mut hasher = Md4::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Fills `buf` from `r`, stopping early only at end of stream. Returns the
/// number of bytes read.
fn read_chunk<R: Read>(r: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = r.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Computes the part hashes and final hash of a byte stream.
///
/// A trailing chunk shorter than [`CHUNK_SIZE`] still produces a part hash;
/// an input that is an exact multiple of the chunk size does not produce a
/// phantom empty part. Any I/O error other than end-of-stream aborts with
/// that error and no partial result.
pub fn fingerprint<R: Read>(r: &mut R) -> Result<FileHash> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut parts: Vec<[u8; 16]> = Vec::new();
    let mut size = 0u64;

    loop {
        let n = read_chunk(r, &mut buf)?;
        if n == 0 {
            break;
        }
        size += n as u64;
        parts.push(md4_digest(&buf[..n]));
        if n < CHUNK_SIZE {
            break;
        }
    }
    debug!(size, chunks = parts.len(), "fingerprinted stream");

    let hash = match parts.as_slice() {
        [] => md4_digest(&[]),
        [single] => *single,
        many => {
            let mut joined = Vec::with_capacity(many.len() * 16);
            for part in many {
                joined.extend_from_slice(part);
            }
            md4_digest(&joined)
        }
    };

    Ok(FileHash { size, hash, parts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    // RFC 1320 test vectors.
    const MD4_EMPTY: &str = "31d6cfe0d16ae931b73c59d7e0c089c0";
    const MD4_ABC: &str = "a448017aaf21d8525fc10ae87aa6729d";

    #[test]
    fn empty_input() {
        let fp = fingerprint(&mut io::empty()).unwrap();
        assert_eq!(fp.size, 0);
        assert!(fp.parts.is_empty());
        assert_eq!(hex::encode(fp.hash), MD4_EMPTY);
    }

    #[test]
    fn small_input() {
        let fp = fingerprint(&mut &b"abc"[..]).unwrap();
        assert_eq!(fp.size, 3);
        assert_eq!(fp.parts.len(), 1);
        assert_eq!(hex::encode(fp.hash), MD4_ABC);
        assert_eq!(fp.hash, fp.parts[0]);
    }

    #[test]
    fn chunk_boundaries() {
        // (input size, expected part count)
        let cases = [
            (1, 1),
            (CHUNK_SIZE - 1, 1),
            (CHUNK_SIZE, 1),
            (CHUNK_SIZE + 1, 2),
            (2 * CHUNK_SIZE, 2),
        ];
        for (len, chunks) in cases {
            let data = vec![0x5Au8; len];
            let fp = fingerprint(&mut &data[..]).unwrap();
            assert_eq!(fp.size, len as u64, "size for {len}");
            assert_eq!(fp.parts.len(), chunks, "chunks for {len}");
            for part in &fp.parts {
                assert_ne!(part, &[0u8; 16]);
            }
        }
    }

    #[test]
    fn single_chunk_final_equals_part() {
        let data = vec![7u8; CHUNK_SIZE];
        let fp = fingerprint(&mut &data[..]).unwrap();
        assert_eq!(fp.parts.len(), 1);
        assert_eq!(fp.hash, fp.parts[0]);
    }

    #[test]
    fn multi_chunk_final_hashes_joined_parts() {
        let data = vec![7u8; CHUNK_SIZE + 1];
        let fp = fingerprint(&mut &data[..]).unwrap();
        assert_eq!(fp.parts.len(), 2);

        let mut joined = Vec::new();
        joined.extend_from_slice(&fp.parts[0]);
        joined.extend_from_slice(&fp.parts[1]);
        assert_eq!(fp.hash, md4_digest(&joined));
        assert_ne!(fp.hash, fp.parts[0]);
    }

    #[test]
    fn part_hash_is_chunk_digest() {
        let data = vec![0x42u8; 1000];
        let fp = fingerprint(&mut &data[..]).unwrap();
        assert_eq!(fp.parts[0], md4_digest(&data));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn io_errors_abort() {
        let err = fingerprint(&mut FailingReader).unwrap_err();
        assert!(matches!(err, crate::error::WireError::Io(_)));
    }

    /// Reader that hands out data one byte at a time, exercising the
    /// fill-until-full loop.
    struct TrickleReader<'a>(&'a [u8]);

    impl Read for TrickleReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((first, rest)) => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn partial_reads_do_not_split_chunks() {
        let data = b"hello world";
        let trickled = fingerprint(&mut TrickleReader(data)).unwrap();
        let direct = fingerprint(&mut &data[..]).unwrap();
        assert_eq!(trickled, direct);
        assert_eq!(trickled.parts.len(), 1);
    }
}
