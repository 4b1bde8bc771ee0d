//! # ed2k-wire
//!
//! Wire-format codec for the eDonkey/eMule peer-to-peer file-sharing
//! protocol: the 5-byte frame header, the polymorphic TLV tag system, the
//! file record used in offers and search results, the content-addressed
//! MD4 fingerprint, and the concrete client↔server and client↔client TCP
//! messages built on those primitives.
//!
//! The wire format is a contract with remote peers that this implementation
//! cannot change: every byte, every endianness and every edge case is
//! fixed. All multi-byte integers are little-endian, with one
//! protocol-defined exception in the callback-requested message.
//!
//! The crate is purely synchronous and stateless per call. It consumes
//! byte slices or [`std::io::Read`] streams and produces byte vectors;
//! connection management, session state and transports belong to the
//! embedding application.
//!
//! ## Reading frames
//!
//! ```
//! use ed2k_wire::protocol::dispatcher::Dispatcher;
//! use ed2k_wire::protocol::message::Message;
//!
//! let frame = [0xE3, 0x00, 0x00, 0x00, 0x00];
//! let message = Dispatcher::new().dispatch(&frame).unwrap();
//! assert!(matches!(message, Message::Null(_)));
//! ```
//!
//! ## Building a login
//!
//! ```
//! use ed2k_wire::core::header::Header;
//! use ed2k_wire::core::tag::{Tag, TAG_NAME, TAG_VERSION};
//! use ed2k_wire::identity::{ClientId, UserId};
//! use ed2k_wire::protocol::message::LoginRequest;
//!
//! let login = LoginRequest {
//!     header: Header::default(),
//!     uid: UserId::generate(),
//!     client_id: ClientId::default(),
//!     port: 4662,
//!     tags: vec![
//!         Tag::string(TAG_NAME, "gmule", false),
//!         Tag::u32(TAG_VERSION, 1),
//!     ],
//! };
//! let frame = login.encode().unwrap();
//! assert_eq!(frame[0], 0xE3);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod protocol;

pub use config::CodecConfig;
pub use core::file::File;
pub use core::hash::{fingerprint, FileHash, CHUNK_SIZE};
pub use core::header::Header;
pub use core::search::Searcher;
pub use core::tag::{Tag, TagName, TagValue};
pub use error::{Result, WireError};
pub use identity::{ClientId, UserId};
pub use protocol::dispatcher::Dispatcher;
pub use protocol::message::Message;
