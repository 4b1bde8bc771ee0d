//! # Core Codec Components
//!
//! The building blocks every message is assembled from: the 5-byte frame
//! header, the TLV tag system, the file record, the search expression tree
//! and the chunked MD4 fingerprint.
//!
//! ## Wire Format
//! ```text
//! [Protocol(1)] [PayloadSize(4 LE)] [Type(1)] [Payload(N-1)]
//! ```
//!
//! Every multi-byte integer on the wire is little-endian (one documented
//! exception lives in the callback-requested message). Strings carry exact
//! byte-count prefixes and no NUL terminators.

pub mod file;
pub mod hash;
pub mod header;
pub mod search;
pub mod tag;
