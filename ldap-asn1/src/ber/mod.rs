//! BER (Basic Encoding Rules) encoder and decoder for ASN.1
//!
//! LDAP messages (RFC 4511) are BER-encoded. Each ASN.1 value is a TLV
//! (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 indicates extended tag
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): lengths 0-127
//! - **Long form**: first byte `0x80 | n`, followed by `n` big-endian length bytes
//!
//! Only definite lengths are supported; RFC 4511 forbids the indefinite form.

pub mod decoder;
pub mod encoder;
pub mod types;

pub use decoder::{frame_length, integer_from_content, BerDecoder};
pub use encoder::{boolean_content, integer_content, BerEncoder};
pub use types::{
    BerLength, BerTag, BerTagClass, TAG_BOOLEAN, TAG_ENUMERATED, TAG_INTEGER, TAG_OCTET_STRING,
    TAG_SEQUENCE, TAG_SET,
};
