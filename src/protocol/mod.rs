//! # Protocol Messages
//!
//! The concrete TCP message set built on the core codecs, the message-type
//! registry, and the protocol-wide constants: message-type codes, version
//! words and the server capability bitmask.

use bitflags::bitflags;

pub mod client;
pub mod dispatcher;
pub mod message;

// Message type codes. The type code is the first byte of a frame's payload.

pub const MSG_NULL: u8 = 0x00;

// Client↔server TCP messages.

pub const MSG_LOGIN_REQUEST: u8 = 0x01;
pub const MSG_REJECTED: u8 = 0x05;
pub const MSG_GET_SERVER_LIST: u8 = 0x14;
pub const MSG_OFFER_FILES: u8 = 0x15;
pub const MSG_SEARCH_REQUEST: u8 = 0x16;
pub const MSG_GET_SOURCES: u8 = 0x19;
pub const MSG_SEARCH_USER: u8 = 0x1A;
pub const MSG_CALLBACK_REQUEST: u8 = 0x1C;
pub const MSG_MORE_RESULT: u8 = 0x21;
pub const MSG_GET_SOURCES_OBFU: u8 = 0x23;
pub const MSG_SERVER_LIST: u8 = 0x32;
pub const MSG_SEARCH_RESULT: u8 = 0x33;
pub const MSG_SERVER_STATUS: u8 = 0x34;
pub const MSG_CALLBACK_REQUESTED: u8 = 0x35;
pub const MSG_CALLBACK_FAILED: u8 = 0x36;
pub const MSG_SERVER_MESSAGE: u8 = 0x38;
pub const MSG_ID_CHANGE: u8 = 0x40;
pub const MSG_SERVER_IDENT: u8 = 0x41;
pub const MSG_FOUND_SOURCES: u8 = 0x42;
pub const MSG_USER_LIST: u8 = 0x43;
pub const MSG_FOUND_SOURCES_OBFU: u8 = 0x44;

// Client↔client TCP messages.

pub const MSG_HELLO: u8 = 0x01;
pub const MSG_HELLO_ANSWER: u8 = 0x4C;

/// Default client TCP port.
pub const DEFAULT_CLIENT_PORT: u16 = 4662;

/// Version number sent in server logins. It has no real "version" meaning
/// anymore.
pub const EDONKEY_VERSION: u8 = 0x3C;

// Client software identifiers carried in the eMule version word.

pub const CLIENT_EMULE: u8 = 0x00;
pub const CLIENT_CDONKEY: u8 = 0x01;
pub const CLIENT_LXMULE: u8 = 0x02;
pub const CLIENT_AMULE: u8 = 0x03;
pub const CLIENT_SHAREAZA: u8 = 0x04;
pub const CLIENT_EMULE_PLUS: u8 = 0x05;
pub const CLIENT_HYDRANODE: u8 = 0x06;
pub const CLIENT_MLDONKEY: u8 = 0x34;

/// Client version components.
pub const MAJOR_VERSION: u32 = 2;
pub const MINOR_VERSION: u32 = 4;
pub const UPDATE_VERSION: u32 = 0;

/// Packed eMule version word: client software in the top byte, then
/// major/minor/update in 7-bit groups. Needed for low-ID clients which
/// cannot answer a hello during the server's callback test.
pub const EMULE_VERSION: u32 = (CLIENT_AMULE as u32) << 24
    | MAJOR_VERSION << 17
    | MINOR_VERSION << 10
    | UPDATE_VERSION << 7;

bitflags! {
    /// Server capability flags announced in the login flags tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ServerFlags: u32 {
        const ZLIB          = 0x0001;
        const IP_IN_LOGIN   = 0x0002;
        const AUX_PORT      = 0x0004;
        const NEW_TAG       = 0x0008;
        const UNICODE       = 0x0010;
        const LARGE_FILES   = 0x0100;
        const CRYPT_SUPPORT = 0x0200;
        const CRYPT_REQUEST = 0x0400;
        const CRYPT_REQUIRE = 0x0800;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emule_version_word_packs_fields() {
        assert_eq!(
            EMULE_VERSION,
            (CLIENT_AMULE as u32) << 24 | 2 << 17 | 4 << 10
        );
    }

    #[test]
    fn server_flags_bit_values() {
        assert_eq!(ServerFlags::ZLIB.bits(), 0x0001);
        assert_eq!(ServerFlags::LARGE_FILES.bits(), 0x0100);
        let all = ServerFlags::ZLIB | ServerFlags::NEW_TAG | ServerFlags::UNICODE;
        assert_eq!(all.bits(), 0x0019);
    }
}
