//! TLV tag codec.
//!
//! Tags are the self-describing attribute encoding attached to login
//! messages, file records and server descriptions. Each tag is a
//! (type, name, value) triple:
//!
//! ```text
//! [type(1)] [name] [value]
//! ```
//!
//! The low 7 bits of the type byte select the value encoding; the high bit
//! flags the compact name form. A compact name is a single code byte. An
//! extended name is a little-endian u16 length followed by that many name
//! bytes — a length of exactly 1 also carries a code, just unpacked.
//!
//! String values of 1 to 16 bytes may be compressed into the short-string
//! types 0x11..=0x20, which carry their length in the type byte and write
//! the value bytes with no length prefix.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};

// Well-known tag name codes.

/// Nickname in a login message, file name in a file record.
pub const TAG_NAME: u8 = 0x01;
/// File size in bytes.
pub const TAG_SIZE: u8 = 0x02;
/// Media type of a file.
pub const TAG_TYPE: u8 = 0x03;
/// File format (extension).
pub const TAG_FORMAT: u8 = 0x04;
/// Free-form description.
pub const TAG_DESC: u8 = 0x0B;
/// Client TCP port.
pub const TAG_PORT: u8 = 0x0F;
/// Client version.
pub const TAG_VERSION: u8 = 0x11;
/// Informs a server about supported features.
pub const TAG_SERVER_FLAGS: u8 = 0x20;
/// eMule version word.
pub const TAG_EMULE_VERSION: u8 = 0xFB;

// Media-metadata tag names from eDonkeyHybrid (note the casing).

pub const MEDIA_ARTIST: &str = "Artist";
pub const MEDIA_ALBUM: &str = "Album";
pub const MEDIA_TITLE: &str = "Title";
pub const MEDIA_LENGTH: &str = "length";
pub const MEDIA_BITRATE: &str = "bitrate";
pub const MEDIA_CODEC: &str = "codec";

// Tag value type codes.

pub const TAG_HASH16: u8 = 0x01;
pub const TAG_STRING: u8 = 0x02;
pub const TAG_U32: u8 = 0x03;
pub const TAG_FLOAT32: u8 = 0x04;
pub const TAG_BOOL: u8 = 0x05;
pub const TAG_BOOL_ARRAY: u8 = 0x06;
pub const TAG_BLOB: u8 = 0x07;
pub const TAG_U16: u8 = 0x08;
pub const TAG_U8: u8 = 0x09;
pub const TAG_BSOB: u8 = 0x0A;
pub const TAG_U64: u8 = 0x0B;

/// Base of the short-string type range; a short string of length L has type
/// `TAG_SHORT_STRING + L` with 1 <= L <= 16.
pub const TAG_SHORT_STRING: u8 = 0x10;

/// Longest string value that can use the short-string encoding.
pub const SHORT_STRING_MAX: usize = 16;

const COMPACT_NAME_FLAG: u8 = 0x80;

/// A tag name: either a one-byte code or a byte-string name.
///
/// The code form exists in two wire renditions. The compact rendition folds
/// the "one byte follows" fact into the high bit of the type byte; the
/// extended rendition spells out a u16 length of 1. Both carry the same
/// code, so compactness is kept on the name to make decode→encode
/// round-trips byte-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// One-byte name code.
    Code { code: u8, compact: bool },
    /// Arbitrary name string; may be empty.
    Text(String),
}

impl TagName {
    /// A code name in the extended (length-prefixed) wire form.
    pub fn code(code: u8) -> Self {
        TagName::Code {
            code,
            compact: false,
        }
    }

    /// A code name in the compact wire form.
    pub fn compact(code: u8) -> Self {
        TagName::Code {
            code,
            compact: true,
        }
    }
}

impl From<u8> for TagName {
    fn from(code: u8) -> Self {
        TagName::code(code)
    }
}

impl From<&str> for TagName {
    fn from(name: &str) -> Self {
        TagName::from(name.to_owned())
    }
}

impl From<String> for TagName {
    fn from(name: String) -> Self {
        // A single-byte name is a name code on the wire: the extended form
        // with length 1 carries a code, not text. Normalizing here keeps
        // decode(encode(t)) structural for every constructor-built tag.
        match name.as_bytes() {
            [code] => TagName::code(*code),
            _ => TagName::Text(name),
        }
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagName::Code { code, .. } => write!(f, "{code:#04x}"),
            TagName::Text(name) => f.write_str(name),
        }
    }
}

/// A tag value, one variant per implemented wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// 16 raw bytes (0x01).
    Hash([u8; 16]),
    /// Length-prefixed string (0x02).
    Str(String),
    /// Short string of 1..=16 bytes, length carried in the type byte
    /// (0x11..=0x20).
    ShortStr(String),
    /// u32, little-endian (0x03).
    U32(u32),
    /// IEEE-754 binary32, little-endian (0x04).
    Float(f32),
    /// One byte, nonzero = true (0x05).
    Bool(bool),
    /// u16, little-endian (0x08).
    U16(u16),
    /// One byte (0x09).
    U8(u8),
    /// u64, little-endian (0x0B).
    U64(u64),
}

impl TagValue {
    fn kind(&self) -> u8 {
        match self {
            TagValue::Hash(_) => TAG_HASH16,
            TagValue::Str(_) => TAG_STRING,
            TagValue::ShortStr(s) => TAG_SHORT_STRING.wrapping_add(s.len() as u8),
            TagValue::U32(_) => TAG_U32,
            TagValue::Float(_) => TAG_FLOAT32,
            TagValue::Bool(_) => TAG_BOOL,
            TagValue::U16(_) => TAG_U16,
            TagValue::U8(_) => TAG_U8,
            TagValue::U64(_) => TAG_U64,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Hash(h) => f.write_str(&hex::encode_upper(h)),
            TagValue::Str(s) | TagValue::ShortStr(s) => f.write_str(s),
            TagValue::U32(v) => write!(f, "{v}"),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Bool(v) => write!(f, "{v}"),
            TagValue::U16(v) => write!(f, "{v}"),
            TagValue::U8(v) => write!(f, "{v}"),
            TagValue::U64(v) => write!(f, "{v}"),
        }
    }
}

/// A single TLV attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: TagName,
    value: TagValue,
}

impl Tag {
    /// A string tag. With `compress` set, values of 1 to 16 bytes use the
    /// short-string encoding; empty strings always use the length-prefixed
    /// form.
    pub fn string(name: impl Into<TagName>, value: impl Into<String>, compress: bool) -> Self {
        let value = value.into();
        let value = if compress && !value.is_empty() && value.len() <= SHORT_STRING_MAX {
            TagValue::ShortStr(value)
        } else {
            TagValue::Str(value)
        };
        Tag {
            name: name.into(),
            value,
        }
    }

    /// A boolean tag.
    pub fn boolean(name: impl Into<TagName>, value: bool) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::Bool(value),
        }
    }

    /// A u8 tag.
    pub fn u8(name: impl Into<TagName>, value: u8) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::U8(value),
        }
    }

    /// A u16 tag.
    pub fn u16(name: impl Into<TagName>, value: u16) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::U16(value),
        }
    }

    /// A u32 tag.
    pub fn u32(name: impl Into<TagName>, value: u32) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::U32(value),
        }
    }

    /// A u64 tag.
    pub fn u64(name: impl Into<TagName>, value: u64) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::U64(value),
        }
    }

    /// An integer tag using the narrowest unsigned encoding that fits.
    pub fn integer(name: impl Into<TagName>, value: u64) -> Self {
        let value = if value <= u64::from(u8::MAX) {
            TagValue::U8(value as u8)
        } else if value <= u64::from(u16::MAX) {
            TagValue::U16(value as u16)
        } else if value <= u64::from(u32::MAX) {
            TagValue::U32(value as u32)
        } else {
            TagValue::U64(value)
        };
        Tag {
            name: name.into(),
            value,
        }
    }

    /// A float tag.
    pub fn float(name: impl Into<TagName>, value: f32) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::Float(value),
        }
    }

    /// A 16-byte hash tag.
    pub fn hash(name: impl Into<TagName>, value: [u8; 16]) -> Self {
        Tag {
            name: name.into(),
            value: TagValue::Hash(value),
        }
    }

    /// Builds a tag from parts. The short-string length invariant is checked
    /// at encode time.
    pub fn new(name: TagName, value: TagValue) -> Self {
        Tag { name, value }
    }

    pub fn name(&self) -> &TagName {
        &self.name
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    /// The 7-bit wire type code of this tag's value.
    pub fn kind(&self) -> u8 {
        self.value.kind()
    }

    /// Writes the tag encoding to `buf`.
    pub fn write_to(&self, buf: &mut impl BufMut) -> Result<()> {
        if let TagValue::ShortStr(s) = &self.value {
            if s.is_empty() || s.len() > SHORT_STRING_MAX {
                return Err(WireError::InvalidTagType(TAG_SHORT_STRING));
            }
        }
        let kind = self.kind() & 0x7F;

        match &self.name {
            TagName::Code {
                code,
                compact: true,
            } => {
                buf.put_u8(kind | COMPACT_NAME_FLAG);
                buf.put_u8(*code);
            }
            TagName::Code {
                code,
                compact: false,
            } => {
                buf.put_u8(kind);
                buf.put_u16_le(1);
                buf.put_u8(*code);
            }
            TagName::Text(name) => {
                buf.put_u8(kind);
                buf.put_u16_le(name.len() as u16);
                buf.put_slice(name.as_bytes());
            }
        }

        match &self.value {
            TagValue::Hash(h) => buf.put_slice(h),
            TagValue::Str(s) => {
                buf.put_u16_le(s.len() as u16);
                buf.put_slice(s.as_bytes());
            }
            TagValue::ShortStr(s) => buf.put_slice(s.as_bytes()),
            TagValue::U32(v) => buf.put_u32_le(*v),
            TagValue::Float(v) => buf.put_f32_le(*v),
            TagValue::Bool(v) => buf.put_u8(u8::from(*v)),
            TagValue::U16(v) => buf.put_u16_le(*v),
            TagValue::U8(v) => buf.put_u8(*v),
            TagValue::U64(v) => buf.put_u64_le(*v),
        }
        Ok(())
    }

    /// Reads one tag from the front of `buf`, consuming exactly the tag's
    /// wire length on success.
    pub fn read_from(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < 1 {
            return Err(WireError::ShortBuffer);
        }
        let type_byte = buf.get_u8();
        let kind = type_byte & 0x7F;

        let name = if type_byte & COMPACT_NAME_FLAG != 0 {
            if buf.remaining() < 1 {
                return Err(WireError::ShortBuffer);
            }
            TagName::Code {
                code: buf.get_u8(),
                compact: true,
            }
        } else {
            if buf.remaining() < 2 {
                return Err(WireError::ShortBuffer);
            }
            let name_len = buf.get_u16_le() as usize;
            if buf.remaining() < name_len {
                return Err(WireError::ShortBuffer);
            }
            if name_len == 1 {
                TagName::Code {
                    code: buf.get_u8(),
                    compact: false,
                }
            } else {
                let mut raw = vec![0u8; name_len];
                buf.copy_to_slice(&mut raw);
                TagName::Text(String::from_utf8_lossy(&raw).into_owned())
            }
        };

        let value = match kind {
            TAG_HASH16 => {
                if buf.remaining() < 16 {
                    return Err(WireError::ShortBuffer);
                }
                let mut hash = [0u8; 16];
                buf.copy_to_slice(&mut hash);
                TagValue::Hash(hash)
            }
            TAG_STRING => {
                if buf.remaining() < 2 {
                    return Err(WireError::ShortBuffer);
                }
                let len = buf.get_u16_le() as usize;
                if buf.remaining() < len {
                    return Err(WireError::ShortBuffer);
                }
                let mut raw = vec![0u8; len];
                buf.copy_to_slice(&mut raw);
                TagValue::Str(String::from_utf8_lossy(&raw).into_owned())
            }
            TAG_U32 => {
                if buf.remaining() < 4 {
                    return Err(WireError::ShortBuffer);
                }
                TagValue::U32(buf.get_u32_le())
            }
            TAG_FLOAT32 => {
                if buf.remaining() < 4 {
                    return Err(WireError::ShortBuffer);
                }
                TagValue::Float(buf.get_f32_le())
            }
            TAG_BOOL => {
                if buf.remaining() < 1 {
                    return Err(WireError::ShortBuffer);
                }
                TagValue::Bool(buf.get_u8() != 0)
            }
            TAG_U16 => {
                if buf.remaining() < 2 {
                    return Err(WireError::ShortBuffer);
                }
                TagValue::U16(buf.get_u16_le())
            }
            TAG_U8 => {
                if buf.remaining() < 1 {
                    return Err(WireError::ShortBuffer);
                }
                TagValue::U8(buf.get_u8())
            }
            TAG_U64 => {
                if buf.remaining() < 8 {
                    return Err(WireError::ShortBuffer);
                }
                TagValue::U64(buf.get_u64_le())
            }
            k if k > TAG_SHORT_STRING && k <= TAG_SHORT_STRING + SHORT_STRING_MAX as u8 => {
                let len = (k - TAG_SHORT_STRING) as usize;
                if buf.remaining() < len {
                    return Err(WireError::ShortBuffer);
                }
                let mut raw = vec![0u8; len];
                buf.copy_to_slice(&mut raw);
                TagValue::ShortStr(String::from_utf8_lossy(&raw).into_owned())
            }
            other => return Err(WireError::InvalidTagType(other)),
        };

        Ok(Tag { name, value })
    }

    /// Encodes the tag to a standalone byte vector.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decodes one tag from the front of `data`; trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut &data[..])
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(tag: &Tag) -> Tag {
        Tag::decode(&tag.encode().unwrap()).unwrap()
    }

    #[test]
    fn integer_width_selection() {
        assert_eq!(Tag::integer(0x0F, 0).value(), &TagValue::U8(0));
        assert_eq!(Tag::integer(0x0F, 0xFF).value(), &TagValue::U8(0xFF));
        assert_eq!(Tag::integer(0x0F, 0x100).value(), &TagValue::U16(0x100));
        assert_eq!(Tag::integer(0x0F, 0xFFFF).value(), &TagValue::U16(0xFFFF));
        assert_eq!(
            Tag::integer(0x0F, 0x10000).value(),
            &TagValue::U32(0x10000)
        );
        assert_eq!(
            Tag::integer(0x0F, 0xFFFF_FFFF).value(),
            &TagValue::U32(0xFFFF_FFFF)
        );
        assert_eq!(
            Tag::integer(0x0F, 0x1_0000_0000).value(),
            &TagValue::U64(0x1_0000_0000)
        );
    }

    #[test]
    fn u32_tag_wire_layout() {
        // Extended one-byte name, then 4 value bytes LE.
        let tag = Tag::u32(TAG_VERSION, 1);
        assert_eq!(
            tag.encode().unwrap(),
            [TAG_U32, 1, 0, TAG_VERSION, 1, 0, 0, 0]
        );
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn compact_name_wire_layout() {
        let tag = Tag::u32(TagName::compact(TAG_VERSION), 1);
        assert_eq!(tag.encode().unwrap(), [0x83, 0x11, 1, 0, 0, 0]);
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn string_name_wire_layout() {
        let tag = Tag::u32("abc", 1);
        assert_eq!(
            tag.encode().unwrap(),
            [TAG_U32, 3, 0, b'a', b'b', b'c', 1, 0, 0, 0]
        );
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn single_byte_text_name_normalizes_to_code() {
        assert_eq!(TagName::from("a"), TagName::code(b'a'));
        let tag = Tag::u32("a", 1);
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn empty_name_wire_layout() {
        let tag = Tag::u32("", 1);
        assert_eq!(tag.encode().unwrap(), [TAG_U32, 0, 0, 1, 0, 0, 0]);
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn plain_string_wire_layout() {
        let tag = Tag::string(TAG_NAME, "gmule", false);
        assert_eq!(
            tag.encode().unwrap(),
            [TAG_STRING, 1, 0, TAG_NAME, 5, 0, b'g', b'm', b'u', b'l', b'e']
        );
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn short_string_code_is_base_plus_length() {
        for len in 1..=SHORT_STRING_MAX {
            let text = "x".repeat(len);
            let tag = Tag::string(TAG_NAME, text.as_str(), true);
            assert_eq!(tag.kind(), TAG_SHORT_STRING + len as u8);
            assert_eq!(roundtrip(&tag), tag);
        }
    }

    #[test]
    fn short_string_wire_layout() {
        let tag = Tag::string(TAG_NAME, "gmule", true);
        assert_eq!(
            tag.encode().unwrap(),
            [0x15, 1, 0, TAG_NAME, b'g', b'm', b'u', b'l', b'e']
        );
        assert_eq!(roundtrip(&tag), tag);
    }

    #[test]
    fn compression_ignored_for_empty_and_long_strings() {
        let tag = Tag::string(TAG_NAME, "", true);
        assert_eq!(tag.kind(), TAG_STRING);

        let long = "x".repeat(SHORT_STRING_MAX + 1);
        let tag = Tag::string(TAG_NAME, long.as_str(), true);
        assert_eq!(tag.kind(), TAG_STRING);
    }

    #[test]
    fn all_constructors_roundtrip() {
        let tags = [
            Tag::string("name", "value", false),
            Tag::string(TAG_NAME, "short", true),
            Tag::boolean(0x42, true),
            Tag::boolean(TagName::compact(0x42), false),
            Tag::u8(0x01, 0xAB),
            Tag::u16(0x02, 0xABCD),
            Tag::u32(0x03, 0xABCD_EF01),
            Tag::u64(0x04, 0xABCD_EF01_2345_6789),
            Tag::integer(MEDIA_LENGTH, 300),
            Tag::float(MEDIA_BITRATE, 1.5),
            Tag::hash(0x05, [0x11; 16]),
        ];
        for tag in &tags {
            assert_eq!(&roundtrip(tag), tag);
        }
    }

    #[test]
    fn bool_decodes_any_nonzero_as_true() {
        let decoded = Tag::decode(&[TAG_BOOL, 1, 0, 0x42, 0x7F]).unwrap();
        assert_eq!(decoded.value(), &TagValue::Bool(true));
    }

    #[test]
    fn rejects_reserved_and_unknown_types() {
        for kind in [TAG_BOOL_ARRAY, TAG_BLOB, TAG_BSOB, TAG_SHORT_STRING, 0x0C, 0x21, 0x7F] {
            let data = [kind, 1, 0, 0x01, 0, 0, 0, 0];
            assert!(matches!(
                Tag::decode(&data),
                Err(WireError::InvalidTagType(k)) if k == kind
            ));
        }
    }

    #[test]
    fn rejects_zero_type() {
        assert!(matches!(
            Tag::decode(&[0x00, 1, 0, 0x01, 0x00]),
            Err(WireError::InvalidTagType(0))
        ));
    }

    #[test]
    fn rejects_truncation_at_every_point() {
        let full = Tag::string("abc", "abc", false).encode().unwrap();
        for len in 0..full.len() {
            assert!(matches!(
                Tag::decode(&full[..len]),
                Err(WireError::ShortBuffer)
            ));
        }
    }

    #[test]
    fn rejects_invalid_short_string_value() {
        let tag = Tag::new(TagName::code(1), TagValue::ShortStr(String::new()));
        assert!(matches!(
            tag.encode(),
            Err(WireError::InvalidTagType(TAG_SHORT_STRING))
        ));

        let tag = Tag::new(
            TagName::code(1),
            TagValue::ShortStr("x".repeat(SHORT_STRING_MAX + 1)),
        );
        assert!(tag.encode().is_err());
    }

    #[test]
    fn reader_consumes_exactly_one_tag() {
        let mut data = Tag::u32(1, 7).encode().unwrap();
        data.extend_from_slice(&Tag::u8(2, 9).encode().unwrap());

        let mut buf = &data[..];
        let first = Tag::read_from(&mut buf).unwrap();
        let second = Tag::read_from(&mut buf).unwrap();
        assert_eq!(first, Tag::u32(1, 7));
        assert_eq!(second, Tag::u8(2, 9));
        assert_eq!(buf.len(), 0);
    }
}
