//! Tagged-value tree
//!
//! A [`Packet`] is one BER value held as a tree: a tag (class, constructed
//! flag, number), raw content for primitive nodes, and ordered children for
//! constructed nodes. The LDAP codec builds requests as packet trees and reads
//! responses from them; bytes only appear at the transport boundary.
//!
//! Packets are assembled with consuming builders and are not mutated once
//! built.
//!
//! ```rust
//! use ldap_asn1::Packet;
//!
//! let message = Packet::sequence(vec![
//!     Packet::integer(7),
//!     Packet::octet_string("cn=test"),
//! ]);
//! let bytes = message.encode();
//! assert_eq!(Packet::from_bytes(&bytes).unwrap(), message);
//! ```

use crate::ber::decoder::{integer_from_content, BerDecoder};
use crate::ber::encoder::{boolean_content, integer_content, BerEncoder};
use crate::ber::types::{
    BerTag, BerTagClass, TAG_BOOLEAN, TAG_ENUMERATED, TAG_INTEGER, TAG_OCTET_STRING, TAG_SEQUENCE,
    TAG_SET,
};
use ldap_core::{LdapError, LdapResult};
use std::fmt;

/// Nesting limit when decoding untrusted input
const MAX_DEPTH: usize = 64;

/// A node of the tagged-value tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    tag: BerTag,
    value: Vec<u8>,
    children: Vec<Packet>,
}

impl Packet {
    /// Primitive node with raw content
    ///
    /// The constructed bit of `tag` is cleared.
    pub fn primitive(tag: BerTag, content: impl Into<Vec<u8>>) -> Self {
        Self {
            tag: BerTag::new(tag.class(), false, tag.number()),
            value: content.into(),
            children: Vec::new(),
        }
    }

    /// Constructed node with the given children, in order
    ///
    /// The constructed bit of `tag` is set.
    pub fn constructed(tag: BerTag, children: Vec<Packet>) -> Self {
        Self {
            tag: BerTag::new(tag.class(), true, tag.number()),
            value: Vec::new(),
            children,
        }
    }

    /// Universal OCTET STRING
    pub fn octet_string(value: impl AsRef<[u8]>) -> Self {
        Self::primitive(
            BerTag::universal(false, TAG_OCTET_STRING),
            value.as_ref().to_vec(),
        )
    }

    /// Universal INTEGER
    pub fn integer(value: i64) -> Self {
        Self::primitive(BerTag::universal(false, TAG_INTEGER), integer_content(value))
    }

    /// Universal ENUMERATED
    pub fn enumerated(value: i64) -> Self {
        Self::primitive(
            BerTag::universal(false, TAG_ENUMERATED),
            integer_content(value),
        )
    }

    /// Universal BOOLEAN
    pub fn boolean(value: bool) -> Self {
        Self::primitive(BerTag::universal(false, TAG_BOOLEAN), boolean_content(value))
    }

    /// Universal SEQUENCE
    pub fn sequence(children: Vec<Packet>) -> Self {
        Self::constructed(BerTag::universal(true, TAG_SEQUENCE), children)
    }

    /// Universal SET
    pub fn set(children: Vec<Packet>) -> Self {
        Self::constructed(BerTag::universal(true, TAG_SET), children)
    }

    /// Append a child while building a constructed node
    pub fn with_child(mut self, child: Packet) -> Self {
        debug_assert!(self.tag.is_constructed(), "primitive packets have no children");
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> BerTag {
        self.tag
    }

    pub fn class(&self) -> BerTagClass {
        self.tag.class()
    }

    pub fn number(&self) -> u32 {
        self.tag.number()
    }

    pub fn is_constructed(&self) -> bool {
        self.tag.is_constructed()
    }

    /// Raw content of a primitive node (empty for constructed nodes)
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn children(&self) -> &[Packet] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Packet> {
        self.children.get(index)
    }

    /// Content as a two's complement integer
    ///
    /// Works for any primitive tag, so implicitly tagged integers decode too.
    pub fn as_integer(&self) -> LdapResult<i64> {
        self.expect_primitive("integer")?;
        integer_from_content(&self.value)
    }

    /// Content as a boolean (any non-zero byte is true)
    pub fn as_bool(&self) -> LdapResult<bool> {
        self.expect_primitive("boolean")?;
        match self.value.as_slice() {
            [byte] => Ok(*byte != 0),
            other => Err(LdapError::Asn1Decoding(format!(
                "Boolean value must be 1 byte, got {}",
                other.len()
            ))),
        }
    }

    /// Content as a UTF-8 string
    pub fn as_string(&self) -> LdapResult<String> {
        self.expect_primitive("string")?;
        String::from_utf8(self.value.clone())
            .map_err(|e| LdapError::Asn1Decoding(format!("Invalid UTF-8 string: {}", e)))
    }

    fn expect_primitive(&self, what: &str) -> LdapResult<()> {
        if self.tag.is_constructed() {
            return Err(LdapError::Asn1Decoding(format!(
                "Expected primitive {}, got constructed {:?} {}",
                what,
                self.tag.class(),
                self.tag.number()
            )));
        }
        Ok(())
    }

    /// Serialize to definite-length BER
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = BerEncoder::new();
        self.encode_into(&mut encoder);
        encoder.into_bytes()
    }

    fn encode_into(&self, encoder: &mut BerEncoder) {
        if self.tag.is_constructed() {
            let mut content = BerEncoder::new();
            for child in &self.children {
                child.encode_into(&mut content);
            }
            encoder.encode_tlv(&self.tag, content.as_bytes());
        } else {
            encoder.encode_tlv(&self.tag, &self.value);
        }
    }

    /// Decode the first BER value in `data`
    ///
    /// # Returns
    /// Returns `Ok((packet, bytes_consumed))`; bytes after the first value are
    /// left untouched.
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        let mut decoder = BerDecoder::new(data);
        let packet = Self::decode_next(&mut decoder, 0)?;
        Ok((packet, decoder.position()))
    }

    /// Decode exactly one BER value spanning all of `data`
    pub fn from_bytes(data: &[u8]) -> LdapResult<Self> {
        let (packet, consumed) = Self::decode(data)?;
        if consumed != data.len() {
            return Err(LdapError::Asn1Decoding(format!(
                "{} trailing bytes after BER value",
                data.len() - consumed
            )));
        }
        Ok(packet)
    }

    fn decode_next(decoder: &mut BerDecoder<'_>, depth: usize) -> LdapResult<Self> {
        if depth > MAX_DEPTH {
            return Err(LdapError::Asn1Decoding(format!(
                "BER nesting deeper than {}",
                MAX_DEPTH
            )));
        }

        let (tag, value, _) = decoder.decode_tlv()?;
        if !tag.is_constructed() {
            return Ok(Self::primitive(tag, value));
        }

        let mut inner = BerDecoder::new(value);
        let mut children = Vec::new();
        while inner.has_remaining() {
            children.push(Self::decode_next(&mut inner, depth + 1)?);
        }
        Ok(Self::constructed(tag, children))
    }
}

impl fmt::Display for Packet {
    /// One-line rendering: `class:number` followed by hex content or
    /// `{children}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.tag.class() {
            BerTagClass::Universal => "U",
            BerTagClass::Application => "A",
            BerTagClass::ContextSpecific => "C",
            BerTagClass::Private => "P",
        };
        write!(f, "{}:{}", class, self.tag.number())?;
        if self.tag.is_constructed() {
            write!(f, "{{")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, "}}")
        } else {
            write!(f, "=")?;
            for byte in &self.value {
                write!(f, "{:02x}", byte)?;
            }
            Ok(())
        }
    }
}
