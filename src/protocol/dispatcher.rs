//! Frame reader and message dispatcher.
//!
//! Reads exactly one framed message from a byte stream, looks the type code
//! up in the static decoder registry and hands the full frame to the typed
//! decoder. The registry is fixed at compile time; the message set is
//! protocol-defined and closed.
//!
//! A hostile peer controls the 32-bit size field, so the announced payload
//! is validated against a configurable ceiling before any allocation.

use std::io::Read;

use tracing::{trace, warn};

use crate::config::{CodecConfig, DEFAULT_MAX_FRAME_SIZE};
use crate::core::header::{Header, HEADER_LEN};
use crate::error::{Result, WireError};
use crate::protocol::message::*;
use crate::protocol::*;

type DecodeFn = fn(&[u8]) -> Result<Message>;

/// Looks up the typed decoder for a message-type code.
///
/// Only client↔server codes are registered: the hello exchange shares the
/// login-request code and is decoded by its own typed codec on
/// client↔client connections.
fn decoder_for(kind: u8) -> Option<DecodeFn> {
    match kind {
        MSG_LOGIN_REQUEST => Some(|d| Ok(Message::LoginRequest(LoginRequest::decode(d)?))),
        MSG_REJECTED => Some(|d| Ok(Message::Rejected(Rejected::decode(d)?))),
        MSG_GET_SERVER_LIST => Some(|d| Ok(Message::GetServerList(GetServerList::decode(d)?))),
        MSG_OFFER_FILES => Some(|d| Ok(Message::OfferFiles(OfferFiles::decode(d)?))),
        MSG_SEARCH_REQUEST => Some(|d| Ok(Message::SearchRequest(SearchRequest::decode(d)?))),
        MSG_SEARCH_RESULT => Some(|d| Ok(Message::SearchResult(SearchResult::decode(d)?))),
        MSG_GET_SOURCES => Some(|d| Ok(Message::GetSources(GetSources::decode(d)?))),
        MSG_FOUND_SOURCES => Some(|d| Ok(Message::FoundSources(FoundSources::decode(d)?))),
        MSG_SEARCH_USER => Some(|d| Ok(Message::SearchUser(SearchUser::decode(d)?))),
        MSG_CALLBACK_REQUEST => {
            Some(|d| Ok(Message::CallbackRequest(CallbackRequest::decode(d)?)))
        }
        MSG_CALLBACK_REQUESTED => {
            Some(|d| Ok(Message::CallbackRequested(CallbackRequested::decode(d)?)))
        }
        MSG_CALLBACK_FAILED => Some(|d| Ok(Message::CallbackFailed(CallbackFailed::decode(d)?))),
        MSG_MORE_RESULT => Some(|d| Ok(Message::MoreResult(MoreResult::decode(d)?))),
        MSG_GET_SOURCES_OBFU => {
            Some(|d| Ok(Message::GetSourcesObfu(GetSourcesObfu::decode(d)?)))
        }
        MSG_SERVER_LIST => Some(|d| Ok(Message::ServerList(ServerList::decode(d)?))),
        MSG_SERVER_STATUS => Some(|d| Ok(Message::ServerStatus(ServerStatus::decode(d)?))),
        MSG_SERVER_MESSAGE => Some(|d| Ok(Message::ServerMessage(ServerMessage::decode(d)?))),
        MSG_ID_CHANGE => Some(|d| Ok(Message::IdChange(IdChange::decode(d)?))),
        MSG_SERVER_IDENT => Some(|d| Ok(Message::ServerIdent(ServerIdent::decode(d)?))),
        MSG_USER_LIST => Some(|d| Ok(Message::UserList(UserList::decode(d)?))),
        MSG_FOUND_SOURCES_OBFU => {
            Some(|d| Ok(Message::FoundSourcesObfu(FoundSourcesObfu::decode(d)?)))
        }
        _ => None,
    }
}

/// Reads framed messages from a byte stream and constructs typed message
/// values.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    max_frame_size: u32,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// A dispatcher with the default frame ceiling of
    /// [`DEFAULT_MAX_FRAME_SIZE`].
    pub fn new() -> Self {
        Dispatcher {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// A dispatcher using the configured frame ceiling.
    pub fn with_config(config: &CodecConfig) -> Self {
        Dispatcher {
            max_frame_size: config.max_frame_size,
        }
    }

    /// Reads exactly one framed message from `r`.
    ///
    /// Consumes exactly `5 + payloadSize` bytes on success. On a decode
    /// error the stream position is just past the framed message; the
    /// caller decides whether to continue or close.
    pub fn read_from<R: Read>(&self, r: &mut R) -> Result<Message> {
        let mut head = [0u8; HEADER_LEN];
        r.read_exact(&mut head)?;
        let header = Header::decode(&head)?;
        trace!(protocol = header.protocol, size = header.size, "read frame header");

        if header.size == 0 {
            return Ok(Message::Null(NullMessage { header }));
        }
        if header.size > self.max_frame_size {
            return Err(WireError::FrameTooLarge {
                size: header.size,
                max: self.max_frame_size,
            });
        }

        let mut frame = vec![0u8; HEADER_LEN + header.size as usize];
        frame[..HEADER_LEN].copy_from_slice(&head);
        r.read_exact(&mut frame[HEADER_LEN..])?;

        self.dispatch(&frame)
    }

    /// Dispatches one complete frame (header included) to its typed
    /// decoder.
    pub fn dispatch(&self, frame: &[u8]) -> Result<Message> {
        let header = Header::decode(frame)?;
        if header.size == 0 {
            return Ok(Message::Null(NullMessage { header }));
        }
        if header.size > self.max_frame_size {
            return Err(WireError::FrameTooLarge {
                size: header.size,
                max: self.max_frame_size,
            });
        }
        if frame.len() <= HEADER_LEN {
            return Err(WireError::ShortBuffer);
        }

        let kind = frame[HEADER_LEN];
        match decoder_for(kind) {
            Some(decode) => decode(frame),
            None => {
                warn!(kind, "no decoder registered for message type");
                Err(WireError::UnknownMessageType(kind))
            }
        }
    }
}
