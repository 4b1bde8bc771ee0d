//! Client↔server TCP message codecs.
//!
//! Every encoder follows the same template: write the 5 header bytes with a
//! zero size, write the one-byte message type, write the payload, then
//! back-patch the payload size into bytes 1..5. Decoders verify the header,
//! verify the type byte and bounds-check every field against both the
//! header's size and the concrete field layout.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use bytes::{Buf, BufMut};

use crate::core::file::File;
use crate::core::header::{Header, HEADER_LEN};
use crate::core::search::Searcher;
use crate::core::tag::Tag;
use crate::error::{Result, WireError};
use crate::identity::{ClientId, UserId};
use crate::protocol::client::{Hello, HelloAnswer};
use crate::protocol::*;

/// Offer-files messages should carry no more than this many entries; the
/// server may impose a lower limit.
pub const MAX_OFFER_FILES: usize = 200;

/// Starts a frame: header bytes (size still zero) plus the type byte.
pub(crate) fn begin_frame(header: &Header, kind: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(64);
    header.write_to(&mut buf)?;
    buf.push(kind);
    Ok(buf)
}

/// Finishes a frame by patching the payload size into the header bytes.
pub(crate) fn seal_frame(mut buf: Vec<u8>) -> Vec<u8> {
    let size = (buf.len() - HEADER_LEN) as u32;
    buf[1..HEADER_LEN].copy_from_slice(&size.to_le_bytes());
    buf
}

/// Decodes and validates the frame prelude shared by every typed decoder:
/// the header, the announced size, the minimum payload length (type byte
/// included) and the type byte itself.
pub(crate) fn check_frame(data: &[u8], kind: u8, min_payload: usize) -> Result<Header> {
    let header = Header::decode(data)?;
    if (data.len() as u64) < HEADER_LEN as u64 + u64::from(header.size)
        || data.len() < HEADER_LEN + min_payload
    {
        return Err(WireError::ShortBuffer);
    }
    if data[HEADER_LEN] != kind {
        return Err(WireError::WrongMessageType);
    }
    Ok(header)
}

pub(crate) fn put_endpoint(buf: &mut impl BufMut, addr: &SocketAddrV4) {
    buf.put_slice(&addr.ip().octets());
    buf.put_u16_le(addr.port());
}

pub(crate) fn get_endpoint(buf: &mut impl Buf) -> Result<SocketAddrV4> {
    if buf.remaining() < 6 {
        return Err(WireError::ShortBuffer);
    }
    let mut ip = [0u8; 4];
    buf.copy_to_slice(&mut ip);
    let port = buf.get_u16_le();
    Ok(SocketAddrV4::new(Ipv4Addr::from(ip), port))
}

pub(crate) fn put_tags(buf: &mut impl BufMut, tags: &[Tag]) -> Result<()> {
    buf.put_u32_le(tags.len() as u32);
    for tag in tags {
        tag.write_to(buf)?;
    }
    Ok(())
}

pub(crate) fn get_tags(buf: &mut impl Buf, count: u32) -> Result<Vec<Tag>> {
    let mut tags = Vec::new();
    for _ in 0..count {
        tags.push(Tag::read_from(buf)?);
    }
    Ok(tags)
}

/// A frame whose header announces a zero-size payload. Used as a keepalive;
/// carries no type byte at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullMessage {
    pub header: Header,
}

impl NullMessage {
    pub const KIND: u8 = MSG_NULL;

    /// Encodes the frame: exactly the 5 header bytes with size zero.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Header {
            size: 0,
            ..self.header
        }
        .encode()
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = Header::decode(data)?;
        Ok(NullMessage { header })
    }
}

/// First message sent by the client after TCP connection establishment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginRequest {
    pub header: Header,
    pub uid: UserId,
    pub client_id: ClientId,
    /// The TCP port used by the client, configurable.
    pub port: u16,
    pub tags: Vec<Tag>,
}

impl LoginRequest {
    pub const KIND: u8 = MSG_LOGIN_REQUEST;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_slice(self.uid.as_bytes());
        buf.put_u32_le(self.client_id.value());
        buf.put_u16_le(self.port);
        put_tags(&mut buf, &self.tags)?;
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
        Ok(LoginRequest {
            header,
            uid: UserId::from_bytes(uid),
            client_id,
            port,
            tags,
        })
    }
}

impl fmt::Display for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[login]")?;
        writeln!(f, "{}", self.header)?;
        write!(
            f,
            "uid: {}, clientID: {:#x}({}), port: {}",
            self.uid,
            self.client_id.value(),
            self.client_id,
            self.port
        )?;
        for (i, tag) in self.tags.iter().enumerate() {
            write!(f, "\ntag{i} - {tag}")?;
        }
        Ok(())
    }
}

macro_rules! no_payload_message {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name {
            pub header: Header,
        }

        impl $name {
            pub const KIND: u8 = $kind;

            pub fn encode(&self) -> Result<Vec<u8>> {
                let buf = begin_frame(&self.header, Self::KIND)?;
                Ok(seal_frame(buf))
            }

            pub fn decode(data: &[u8]) -> Result<Self> {
                let header = check_frame(data, Self::KIND, 1)?;
                Ok($name { header })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[{}]\n{}", $label, self.header)
            }
        }
    };
}

no_payload_message!(
    /// Sent by the server when it rejects the client's last command.
    Rejected,
    MSG_REJECTED,
    "rejected"
);

no_payload_message!(
    /// Asks the current server for more servers to expand the client's
    /// server list. May be sent right after a successful handshake.
    GetServerList,
    MSG_GET_SERVER_LIST,
    "get-server-list"
);

no_payload_message!(
    /// Sent by the server when the client's callback request failed.
    CallbackFailed,
    MSG_CALLBACK_FAILED,
    "callback-failed"
);

no_payload_message!(
    /// Reserved for future support; registered in the dispatcher.
    SearchUser,
    MSG_SEARCH_USER,
    "search-user"
);

no_payload_message!(
    /// Reserved for future support; registered in the dispatcher.
    MoreResult,
    MSG_MORE_RESULT,
    "more-result"
);

no_payload_message!(
    /// Reserved for future support; registered in the dispatcher.
    GetSourcesObfu,
    MSG_GET_SOURCES_OBFU,
    "get-sources-obfu"
);

no_payload_message!(
    /// Reserved for future support; registered in the dispatcher.
    UserList,
    MSG_USER_LIST,
    "user-list"
);

no_payload_message!(
    /// Reserved for future support; registered in the dispatcher.
    FoundSourcesObfu,
    MSG_FOUND_SOURCES_OBFU,
    "found-sources-obfu"
);

/// Describes local files available for other clients to download. Sent
/// right after connection establishment and whenever the shared list
/// changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferFiles {
    pub header: Header,
    /// No more than [`MAX_OFFER_FILES`] entries; the server can set a lower
    /// limit.
    pub files: Vec<File>,
}

impl OfferFiles {
    pub const KIND: u8 = MSG_OFFER_FILES;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u32_le(self.files.len() as u32);
        for file in &self.files {
            file.write_to(&mut buf)?;
        }
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 5)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let count = buf.get_u32_le();
        let mut files = Vec::new();
        for _ in 0..count {
            files.push(File::read_from(&mut buf)?);
        }
        Ok(OfferFiles { header, files })
    }
}

impl fmt::Display for OfferFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[offer-files]\n{}\nfiles:", self.header)?;
        for (i, file) in self.files.iter().enumerate() {
            write!(f, "\nfile{i} - {file}")?;
        }
        Ok(())
    }
}

/// Searches the server for files matching a predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub header: Header,
    pub searcher: Searcher,
}

impl SearchRequest {
    pub const KIND: u8 = MSG_SEARCH_REQUEST;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        self.searcher.write_to(&mut buf)?;
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 2)?;
        let searcher = Searcher::read_from(&mut &data[HEADER_LEN + 1..])?;
        Ok(SearchRequest { header, searcher })
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[search-request]\n{}\n{}", self.header, self.searcher)
    }
}

/// Server reply to a search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub header: Header,
    pub files: Vec<File>,
}

impl SearchResult {
    pub const KIND: u8 = MSG_SEARCH_RESULT;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u32_le(self.files.len() as u32);
        for file in &self.files {
            file.write_to(&mut buf)?;
        }
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 5)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let count = buf.get_u32_le();
        let mut files = Vec::new();
        for _ in 0..count {
            files.push(File::read_from(&mut buf)?);
        }
        Ok(SearchResult { header, files })
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[search-result]\n{}\nfiles:", self.header)?;
        for (i, file) in self.files.iter().enumerate() {
            write!(f, "\nfile{i} - {file}")?;
        }
        Ok(())
    }
}

/// Requests sources (other clients) for a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSources {
    pub header: Header,
    pub hash: [u8; 16],
    pub size: u32,
}

impl GetSources {
    pub const KIND: u8 = MSG_GET_SOURCES;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_slice(&self.hash);
        buf.put_u32_le(self.size);
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 21)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let mut hash = [0u8; 16];
        buf.copy_to_slice(&mut hash);
        let size = buf.get_u32_le();
        Ok(GetSources { header, hash, size })
    }
}

impl fmt::Display for GetSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[get-sources]\n{}\nhash: {}, size: {}",
            self.header,
            hex::encode_upper(self.hash),
            self.size
        )
    }
}

/// Server reply carrying sources for a requested file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundSources {
    pub header: Header,
    pub hash: [u8; 16],
    pub sources: Vec<SocketAddrV4>,
}

impl FoundSources {
    pub const KIND: u8 = MSG_FOUND_SOURCES;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_slice(&self.hash);
        buf.put_u8(self.sources.len().min(u8::MAX as usize) as u8);
        for source in self.sources.iter().take(u8::MAX as usize) {
            put_endpoint(&mut buf, source);
        }
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 18)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let mut hash = [0u8; 16];
        buf.copy_to_slice(&mut hash);
        let count = buf.get_u8();
        let mut sources = Vec::with_capacity(count as usize);
        for _ in 0..count {
            sources.push(get_endpoint(&mut buf)?);
        }
        Ok(FoundSources {
            header,
            hash,
            sources,
        })
    }
}

impl fmt::Display for FoundSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[found-sources]\n{}\nhash: {}\nsources:",
            self.header,
            hex::encode_upper(self.hash)
        )?;
        for source in &self.sources {
            write!(f, " {source}")?;
        }
        Ok(())
    }
}

/// Asks the server to have a low-ID client call the requester back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallbackRequest {
    pub header: Header,
    pub client_id: ClientId,
}

impl CallbackRequest {
    pub const KIND: u8 = MSG_CALLBACK_REQUEST;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u32_le(self.client_id.value());
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 5)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let client_id = ClientId::from(buf.get_u32_le());
        Ok(CallbackRequest { header, client_id })
    }
}

impl fmt::Display for CallbackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[callback-request]\n{}\nclient: {}",
            self.header, self.client_id
        )
    }
}

/// Tells a low-ID client to connect to the endpoint that asked for it.
///
/// The port here is the single big-endian exception among the protocol's
/// port fields and must stay that way bit-exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallbackRequested {
    pub header: Header,
    pub ip: u32,
    pub port: u16,
}

impl CallbackRequested {
    pub const KIND: u8 = MSG_CALLBACK_REQUESTED;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u32_le(self.ip);
        buf.put_u16(self.port); // big-endian
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 7)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let ip = buf.get_u32_le();
        let port = buf.get_u16(); // big-endian
        Ok(CallbackRequested { header, ip, port })
    }
}

impl fmt::Display for CallbackRequested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[callback-requested]\n{}\nclient: {}:{}",
            self.header,
            ClientId::from(self.ip),
            self.port
        )
    }
}

/// Additional servers to expand the client's server list. Each entry is a
/// 4-byte IP address and a 2-byte TCP port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerList {
    pub header: Header,
    pub servers: Vec<SocketAddrV4>,
}

impl ServerList {
    pub const KIND: u8 = MSG_SERVER_LIST;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u8(self.servers.len().min(u8::MAX as usize) as u8);
        for server in self.servers.iter().take(u8::MAX as usize) {
            put_endpoint(&mut buf, server);
        }
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 2)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let count = buf.get_u8();
        let mut servers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            servers.push(get_endpoint(&mut buf)?);
        }
        Ok(ServerList { header, servers })
    }
}

impl fmt::Display for ServerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[server-list]\n{}\nservers:", self.header)?;
        for server in &self.servers {
            write!(f, " {server}")?;
        }
        Ok(())
    }
}

/// Current number of users and files on the server. Stored by the client
/// and shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStatus {
    pub header: Header,
    /// Users currently logged in to the server.
    pub users: u32,
    /// Files the server is informed about.
    pub files: u32,
}

impl ServerStatus {
    pub const KIND: u8 = MSG_SERVER_STATUS;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u32_le(self.users);
        buf.put_u32_le(self.files);
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 9)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let users = buf.get_u32_le();
        let files = buf.get_u32_le();
        Ok(ServerStatus {
            header,
            users,
            files,
        })
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[server-status]\n{}\nusers: {}, files: {}",
            self.header, self.users, self.files
        )
    }
}

/// Variable-length text from the server. A single frame may contain several
/// messages separated by `\n`, `\r` or `\r\n`; messages starting with
/// "server version", "warning", "error" and "emDynIP" have special meaning
/// for the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerMessage {
    pub header: Header,
    pub messages: String,
}

impl ServerMessage {
    pub const KIND: u8 = MSG_SERVER_MESSAGE;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        // The length prefix is 16-bit; longer texts are truncated rather
        // than mis-framed.
        let text = self.messages.as_bytes();
        let text = &text[..text.len().min(u16::MAX as usize)];
        buf.put_u16_le(text.len() as u16);
        buf.put_slice(text);
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 3)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let len = buf.get_u16_le() as usize;
        if buf.remaining() < len {
            return Err(WireError::ShortBuffer);
        }
        let mut raw = vec![0u8; len];
        buf.copy_to_slice(&mut raw);
        Ok(ServerMessage {
            header,
            messages: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[server-message]\n{}\n{}", self.header, self.messages)
    }
}

/// Server response to a login request; signals that the connection was
/// accepted and assigns the client ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdChange {
    pub header: Header,
    pub client_id: ClientId,
    /// Currently only the LSB has meaning: set when the server supports
    /// compression.
    pub flags: u32,
}

impl IdChange {
    pub const KIND: u8 = MSG_ID_CHANGE;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_u32_le(self.client_id.value());
        buf.put_u32_le(self.flags);
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 9)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let client_id = ClientId::from(buf.get_u32_le());
        let flags = buf.get_u32_le();
        Ok(IdChange {
            header,
            client_id,
            flags,
        })
    }
}

impl fmt::Display for IdChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[id-change]\n{}\nclientID: {:#x}({}), flags: {:#x}",
            self.header,
            self.client_id.value(),
            self.client_id,
            self.flags
        )
    }
}

/// Server self-description: hash, endpoint and description tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerIdent {
    pub header: Header,
    /// A GUID of the server (seems to be used for debug).
    pub hash: [u8; 16],
    /// Server IPv4 address, packed like a high client ID.
    pub ip: u32,
    /// TCP port on which the server listens.
    pub port: u16,
    pub tags: Vec<Tag>,
}

impl ServerIdent {
    pub const KIND: u8 = MSG_SERVER_IDENT;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = begin_frame(&self.header, Self::KIND)?;
        buf.put_slice(&self.hash);
        buf.put_u32_le(self.ip);
        buf.put_u16_le(self.port);
        put_tags(&mut buf, &self.tags)?;
        Ok(seal_frame(buf))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = check_frame(data, Self::KIND, 1 + 16 + 4 + 2 + 4)?;
        let mut buf = &data[HEADER_LEN + 1..];
        let mut hash = [0u8; 16];
        buf.copy_to_slice(&mut hash);
        let ip = buf.get_u32_le();
        let port = buf.get_u16_le();
        let tag_count = buf.get_u32_le();
        let tags = get_tags(&mut buf, tag_count)?;
        Ok(ServerIdent {
            header,
            hash,
            ip,
            port,
            tags,
        })
    }
}

impl fmt::Display for ServerIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[server-ident]\n{}\naddr: {}:{}, hash: {}",
            self.header,
            ClientId::from(self.ip),
            self.port,
            hex::encode_upper(self.hash)
        )?;
        for (i, tag) in self.tags.iter().enumerate() {
            write!(f, "\ntag{i} - {tag}")?;
        }
        Ok(())
    }
}

/// The closed set of protocol messages.
///
/// The set is protocol-defined: new kinds appear only with new protocol
/// revisions, so messages are modeled as a sum type rather than open-ended
/// dynamic dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Null(NullMessage),
    LoginRequest(LoginRequest),
    Rejected(Rejected),
    GetServerList(GetServerList),
    OfferFiles(OfferFiles),
    SearchRequest(SearchRequest),
    SearchResult(SearchResult),
    GetSources(GetSources),
    FoundSources(FoundSources),
    CallbackRequest(CallbackRequest),
    CallbackRequested(CallbackRequested),
    CallbackFailed(CallbackFailed),
    ServerList(ServerList),
    ServerStatus(ServerStatus),
    ServerMessage(ServerMessage),
    IdChange(IdChange),
    ServerIdent(ServerIdent),
    SearchUser(SearchUser),
    MoreResult(MoreResult),
    GetSourcesObfu(GetSourcesObfu),
    UserList(UserList),
    FoundSourcesObfu(FoundSourcesObfu),
    Hello(Hello),
    HelloAnswer(HelloAnswer),
}

impl Message {
    /// The message-type code of this message.
    pub fn kind(&self) -> u8 {
        match self {
            Message::Null(_) => MSG_NULL,
            Message::LoginRequest(_) => LoginRequest::KIND,
            Message::Rejected(_) => Rejected::KIND,
            Message::GetServerList(_) => GetServerList::KIND,
            Message::OfferFiles(_) => OfferFiles::KIND,
            Message::SearchRequest(_) => SearchRequest::KIND,
            Message::SearchResult(_) => SearchResult::KIND,
            Message::GetSources(_) => GetSources::KIND,
            Message::FoundSources(_) => FoundSources::KIND,
            Message::CallbackRequest(_) => CallbackRequest::KIND,
            Message::CallbackRequested(_) => CallbackRequested::KIND,
            Message::CallbackFailed(_) => CallbackFailed::KIND,
            Message::ServerList(_) => ServerList::KIND,
            Message::ServerStatus(_) => ServerStatus::KIND,
            Message::ServerMessage(_) => ServerMessage::KIND,
            Message::IdChange(_) => IdChange::KIND,
            Message::ServerIdent(_) => ServerIdent::KIND,
            Message::SearchUser(_) => SearchUser::KIND,
            Message::MoreResult(_) => MoreResult::KIND,
            Message::GetSourcesObfu(_) => GetSourcesObfu::KIND,
            Message::UserList(_) => UserList::KIND,
            Message::FoundSourcesObfu(_) => FoundSourcesObfu::KIND,
            Message::Hello(_) => Hello::KIND,
            Message::HelloAnswer(_) => HelloAnswer::KIND,
        }
    }

    /// The header carried by this message.
    pub fn header(&self) -> Header {
        match self {
            Message::Null(m) => m.header,
            Message::LoginRequest(m) => m.header,
            Message::Rejected(m) => m.header,
            Message::GetServerList(m) => m.header,
            Message::OfferFiles(m) => m.header,
            Message::SearchRequest(m) => m.header,
            Message::SearchResult(m) => m.header,
            Message::GetSources(m) => m.header,
            Message::FoundSources(m) => m.header,
            Message::CallbackRequest(m) => m.header,
            Message::CallbackRequested(m) => m.header,
            Message::CallbackFailed(m) => m.header,
            Message::ServerList(m) => m.header,
            Message::ServerStatus(m) => m.header,
            Message::ServerMessage(m) => m.header,
            Message::IdChange(m) => m.header,
            Message::ServerIdent(m) => m.header,
            Message::SearchUser(m) => m.header,
            Message::MoreResult(m) => m.header,
            Message::GetSourcesObfu(m) => m.header,
            Message::UserList(m) => m.header,
            Message::FoundSourcesObfu(m) => m.header,
            Message::Hello(m) => m.header,
            Message::HelloAnswer(m) => m.header,
        }
    }

    /// Encodes the message to a full frame.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Message::Null(m) => m.encode(),
            Message::LoginRequest(m) => m.encode(),
            Message::Rejected(m) => m.encode(),
            Message::GetServerList(m) => m.encode(),
            Message::OfferFiles(m) => m.encode(),
            Message::SearchRequest(m) => m.encode(),
            Message::SearchResult(m) => m.encode(),
            Message::GetSources(m) => m.encode(),
            Message::FoundSources(m) => m.encode(),
            Message::CallbackRequest(m) => m.encode(),
            Message::CallbackRequested(m) => m.encode(),
            Message::CallbackFailed(m) => m.encode(),
            Message::ServerList(m) => m.encode(),
            Message::ServerStatus(m) => m.encode(),
            Message::ServerMessage(m) => m.encode(),
            Message::IdChange(m) => m.encode(),
            Message::ServerIdent(m) => m.encode(),
            Message::SearchUser(m) => m.encode(),
            Message::MoreResult(m) => m.encode(),
            Message::GetSourcesObfu(m) => m.encode(),
            Message::UserList(m) => m.encode(),
            Message::FoundSourcesObfu(m) => m.encode(),
            Message::Hello(m) => m.encode(),
            Message::HelloAnswer(m) => m.encode(),
        }
    }
}
