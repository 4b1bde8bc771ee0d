//! Client↔client TCP message codecs.
//!
//! Two clients open with a hello exchange that mirrors the server login:
//! user hash, client ID, port and tag list, followed by the endpoint of the
//! server the peer is connected to. The hello additionally spells out the
//! user-hash length as a one-byte literal 16.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use bytes::{Buf, BufMut};

use crate::core::header::{Header, HEADER_LEN};
use crate::core::tag::Tag;
use crate::error::{Result, WireError};
use crate::identity::{ClientId, UserId};
use crate::protocol::message::{
    begin_frame, check_frame, get_endpoint, get_tags, put_endpoint, put_tags, seal_frame,
};
use crate::protocol::{MSG_HELLO, MSG_HELLO_ANSWER};

const USER_HASH_LEN: u8 = 16;

fn zero_endpoint() -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)
}

/// First message in the handshake between two clients.
#[derive(Debug, Clone, PartialEq)]
pub struct Hello {
    pub header: Header,
    pub uid: UserId,
    pub client_id: ClientId,
    pub port: u16,
    pub tags: Vec<Tag>,
    /// The server the sending client is connected to.
    pub server: SocketAddrV4,
}

impl Default for Hello {
    fn default() -> Self {
        Hello {
            header: Header::default(),
            uid: UserId::default(),
            client_id: ClientId::default(),
            port: 0,
            tags: Vec::new(),
            server: zero_endpoint(),
        }
    }
}

impl Hello {
    pub const KIND: u8 = MSG_HELLO;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u8(USER_HASH_LEN);
        buf.put_slice(self.uid.as_bytes());
        buf.put_u32_le(self.client_id.value());
        buf.put_u16_le(self.port);
        put_tags(&mut buf, &self.tags)?;
        put_endpoint(&mut buf, &self.server);
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 1 + 1 + 16 + 4 + 2 + 4)?;
        let mut buf = &data[HEADER_LEN + 1..];
        if buf.get_u8() != USER_HASH_LEN {
            return Err(WireError::WrongMessageType);
        }
        let mut uid = [0u8; 16];
        buf.copy_to_slice(&mut uid);
        let client_id = ClientId::from(buf.get_u32_le());
        let port = buf.get_u16_le();
        let tag_count = buf.get_u32_le();
        let tags = get_tags(&mut buf, tag_count)?;
        let server = get_endpoint(&mut buf)?;
        Ok(Hello {
            header,
            uid: UserId::from_bytes(uid),
            client_id,
            port,
            tags,
            server,
        })
    }
}

impl fmt::Display for Hello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[hello]")?;
        writeln!(f, "{}", self.header)?;
        write!(
            f,
            "uid: {}, {}:{}",
            self.uid, self.client_id, self.port
        )?;
        for (i, tag) in self.tags.iter().enumerate() {
            write!(f, "\ntag{i} - {tag}")?;
        }
        write!(f, "\nserver: {}", self.server)
    }
}

/// The answer to a [`Hello`]. Identical layout except that the user-hash
/// size literal is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct HelloAnswer {
    pub header: Header,
    pub uid: UserId,
    pub client_id: ClientId,
    pub port: u16,
    pub tags: Vec<Tag>,
    /// The server the answering client is connected to.
    pub server: SocketAddrV4,
}

impl Default for HelloAnswer {
    fn default() -> Self {
        HelloAnswer {
            header: Header::default(),
            uid: UserId::default(),
            client_id: ClientId::default(),
            port: 0,
            tags: Vec::new(),
            server: zero_endpoint(),
        }
    }
}

impl HelloAnswer {
    pub const KIND: u8 = MSG_HELLO_ANSWER;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_slice(self.uid.as_bytes());
        buf.put_u32_le(self.client_id.value());
        buf.put_u16_le(self.port);
        put_tags(&mut buf, &self.tags)?;
        put_endpoint(&mut buf, &self.server);
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 1 + 16 + 4 + 2 + 4)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let mut uid = [0u8; 16];
        buf.copy_to_slice(&mut uid);
        let client_id = ClientId::from(buf.get_u32_le());
        let port = buf.get_u16_le();
        let tag_count = buf.get_u32_le();
        let tags = get_tags(&mut buf, tag_count)?;
        let server = get_endpoint(&mut buf)?;
        Ok(HelloAnswer {
            header,
            uid: UserId::from_bytes(uid),
            client_id,
            port,
            tags,
            server,
        })
    }
}

impl fmt::Display for HelloAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[hello-answer]")?;
        writeln!(f, "{}", self.header)?;
        write!(
            f,
            "uid: {}, {}:{}",
            self.uid, self.client_id, self.port
        )?;
        for (i, tag) in self.tags.iter().enumerate() {
            write!(f, "\ntag{i} - {tag}")?;
        }
        write!(f, "\nserver: {}", self.server)
    }
}
