//! Search expression codec.
//!
//! Server-side search requests carry a predicate tree in prefix order:
//! boolean nodes are `0x00` followed by an operator byte and their two
//! operands; a by-name leaf is `0x01` followed by a u16-LE length and the
//! UTF-8 search term.
//!
//! Metadata and limit predicates are declared for wire completeness but the
//! codec currently exercises only the name leaf and the boolean operators,
//! which is what servers act on.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};

// Search expression node types.

pub const SEARCH_BOOLEAN: u8 = 0x00;
pub const SEARCH_NAME: u8 = 0x01;
pub const SEARCH_METADATA: u8 = 0x02;
pub const SEARCH_LIMIT: u8 = 0x03;

// Boolean operators.

pub const SEARCH_AND: u8 = 0x00;
pub const SEARCH_OR: u8 = 0x01;
pub const SEARCH_NOT: u8 = 0x02;

/// Comparison operators for metadata and limit predicates. KAD operators
/// used to differ but are the same since eMule 0.47a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Comparison {
    Equal = 0,
    Greater = 1,
    Less = 2,
    GreaterEqual = 3,
    LessEqual = 4,
    NotEqual = 5,
}

/// Limit kinds for size-bounded searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LimitKind {
    Min = 0x01,
    Max = 0x02,
}

// File media type strings used in search metadata.

pub const FILE_AUDIO: &str = "Audio";
pub const FILE_VIDEO: &str = "Video";
pub const FILE_IMAGE: &str = "Image";
pub const FILE_DOCUMENT: &str = "Doc";
pub const FILE_PROGRAM: &str = "Pro";
/// *Mule internal use only.
pub const FILE_ARCHIVE: &str = "Arc";
/// *Mule internal use only.
pub const FILE_CD_IMAGE: &str = "Iso";

/// Deepest operator nesting the decoder accepts. Genuine searches nest a
/// handful of operators; a maximum-size frame of nothing but operator
/// prefixes would otherwise build a tree that later recursive walks
/// (encode, drop) cannot handle.
pub const MAX_SEARCH_DEPTH: usize = 256;

/// A search predicate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Searcher {
    /// Match files whose name contains the term.
    Name(String),
    /// Both operands must match.
    And(Box<Searcher>, Box<Searcher>),
    /// Either operand may match.
    Or(Box<Searcher>, Box<Searcher>),
    /// The left operand must match, the right must not.
    Not(Box<Searcher>, Box<Searcher>),
}

impl Searcher {
    /// A by-name search leaf.
    pub fn by_name(term: impl Into<String>) -> Self {
        Searcher::Name(term.into())
    }

    pub fn and(left: Searcher, right: Searcher) -> Self {
        Searcher::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Searcher, right: Searcher) -> Self {
        Searcher::Or(Box::new(left), Box::new(right))
    }

    pub fn not(left: Searcher, right: Searcher) -> Self {
        Searcher::Not(Box::new(left), Box::new(right))
    }

    /// Writes the expression in prefix order.
    pub fn write_to(&self, buf: &mut impl BufMut) -> Result<()> {
        match self {
            Searcher::Name(term) => {
                if term.is_empty() {
                    return Err(WireError::EmptySearcher);
                }
                buf.put_u8(SEARCH_NAME);
                buf.put_u16_le(term.len() as u16);
                buf.put_slice(term.as_bytes());
            }
            Searcher::And(l, r) => Self::write_boolean(buf, SEARCH_AND, l, r)?,
            Searcher::Or(l, r) => Self::write_boolean(buf, SEARCH_OR, l, r)?,
            Searcher::Not(l, r) => Self::write_boolean(buf, SEARCH_NOT, l, r)?,
        }
        Ok(())
    }

    fn write_boolean(
        buf: &mut impl BufMut,
        op: u8,
        left: &Searcher,
        right: &Searcher,
    ) -> Result<()> {
        buf.put_u8(SEARCH_BOOLEAN);
        buf.put_u8(op);
        left.write_to(buf)?;
        right.write_to(buf)
    }

    /// Reads one expression tree from the front of `buf`.
    ///
    /// The parser is iterative: an explicit operand stack replaces recursion
    /// so that a maximum-size frame of nested operators cannot overflow the
    /// call stack.
    pub fn read_from(buf: &mut impl Buf) -> Result<Self> {
        // Boolean nodes awaiting operands: (operator, optional left operand).
        let mut pending: Vec<(u8, Option<Searcher>)> = Vec::new();

        loop {
            if buf.remaining() < 1 {
                return Err(WireError::ShortBuffer);
            }
            match buf.get_u8() {
                SEARCH_BOOLEAN => {
                    if buf.remaining() < 1 {
                        return Err(WireError::ShortBuffer);
                    }
                    let op = buf.get_u8();
                    if op != SEARCH_AND && op != SEARCH_OR && op != SEARCH_NOT {
                        return Err(WireError::InvalidSearchType(op));
                    }
                    if pending.len() >= MAX_SEARCH_DEPTH {
                        return Err(WireError::SearchTooDeep);
                    }
                    pending.push((op, None));
                }
                SEARCH_NAME => {
                    if buf.remaining() < 2 {
                        return Err(WireError::ShortBuffer);
                    }
                    let len = buf.get_u16_le() as usize;
                    if len == 0 {
                        return Err(WireError::EmptySearcher);
                    }
                    if buf.remaining() < len {
                        return Err(WireError::ShortBuffer);
                    }
                    let mut raw = vec![0u8; len];
                    buf.copy_to_slice(&mut raw);
                    let mut node = Searcher::Name(String::from_utf8_lossy(&raw).into_owned());

                    // Fold the finished node into its parents.
                    loop {
                        match pending.pop() {
                            None => return Ok(node),
                            Some((op, None)) => {
                                pending.push((op, Some(node)));
                                break;
                            }
                            Some((op, Some(left))) => {
                                node = match op {
                                    SEARCH_AND => Searcher::and(left, node),
                                    SEARCH_OR => Searcher::or(left, node),
                                    _ => Searcher::not(left, node),
                                };
                            }
                        }
                    }
                }
                other => return Err(WireError::InvalidSearchType(other)),
            }
        }
    }

    /// Encodes the expression to a standalone byte vector.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decodes an expression from the front of `data`.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut &data[..])
    }
}

impl fmt::Display for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Searcher::Name(term) => write!(f, "by name: {term}"),
            Searcher::And(l, r) => write!(f, "({l}) AND ({r})"),
            Searcher::Or(l, r) => write!(f, "({l}) OR ({r})"),
            Searcher::Not(l, r) => write!(f, "({l}) NOT ({r})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_leaf_wire_layout() {
        let data = Searcher::by_name("abc").encode().unwrap();
        assert_eq!(data, [SEARCH_NAME, 3, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn empty_term_rejected() {
        assert!(matches!(
            Searcher::by_name("").encode(),
            Err(WireError::EmptySearcher)
        ));
        let nested = Searcher::and(Searcher::by_name("a"), Searcher::by_name(""));
        assert!(matches!(nested.encode(), Err(WireError::EmptySearcher)));
    }

    #[test]
    fn boolean_prefix_layout() {
        let expr = Searcher::and(Searcher::by_name("a"), Searcher::by_name("b"));
        let data = expr.encode().unwrap();
        assert_eq!(
            data,
            [
                SEARCH_BOOLEAN,
                SEARCH_AND,
                SEARCH_NAME,
                1,
                0,
                b'a',
                SEARCH_NAME,
                1,
                0,
                b'b'
            ]
        );
    }

    #[test]
    fn roundtrip_trees() {
        let exprs = [
            Searcher::by_name("ubuntu"),
            Searcher::and(Searcher::by_name("a"), Searcher::by_name("b")),
            Searcher::or(
                Searcher::not(Searcher::by_name("a"), Searcher::by_name("b")),
                Searcher::and(Searcher::by_name("c"), Searcher::by_name("d")),
            ),
        ];
        for expr in &exprs {
            let data = expr.encode().unwrap();
            assert_eq!(&Searcher::decode(&data).unwrap(), expr);
        }
    }

    #[test]
    fn decode_rejects_unknown_types() {
        assert!(matches!(
            Searcher::decode(&[SEARCH_METADATA, 0, 0]),
            Err(WireError::InvalidSearchType(SEARCH_METADATA))
        ));
        assert!(matches!(
            Searcher::decode(&[SEARCH_BOOLEAN, 9]),
            Err(WireError::InvalidSearchType(9))
        ));
    }

    #[test]
    fn decode_rejects_truncation() {
        let full = Searcher::and(Searcher::by_name("ab"), Searcher::by_name("cd"))
            .encode()
            .unwrap();
        for len in 0..full.len() {
            assert!(Searcher::decode(&full[..len]).is_err());
        }
    }

    #[test]
    fn nesting_ceiling_enforced() {
        // A pathological stream of operator prefixes. The iterative parser
        // walks it without recursing and bails at the ceiling instead of
        // building a tree too deep for later recursive walks.
        let mut data = Vec::new();
        for _ in 0..100_000 {
            data.extend_from_slice(&[SEARCH_BOOLEAN, SEARCH_AND]);
        }
        data.extend_from_slice(&[SEARCH_NAME, 1, 0, b'x']);
        assert!(matches!(
            Searcher::decode(&data),
            Err(WireError::SearchTooDeep)
        ));
    }

    #[test]
    fn nesting_below_ceiling_accepted() {
        // A right-deep chain just under the ceiling decodes fine.
        let mut expr = Searcher::by_name("leaf");
        for _ in 0..MAX_SEARCH_DEPTH - 1 {
            expr = Searcher::and(Searcher::by_name("x"), expr);
        }
        let data = expr.encode().unwrap();
        assert_eq!(Searcher::decode(&data).unwrap(), expr);
    }
}
