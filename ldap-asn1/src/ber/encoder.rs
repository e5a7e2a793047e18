//! BER encoder for ASN.1 structures
//!
//! This module provides the TLV writer and the content encodings for the
//! primitive types the LDAP message grammar uses.
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::ber::{BerEncoder, BerTag, integer_content};
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_tlv(&BerTag::universal(false, 2), &integer_content(12345));
//! let bytes = encoder.into_bytes();
//! assert_eq!(bytes, vec![0x02, 0x02, 0x30, 0x39]);
//! ```

use crate::ber::types::{BerLength, BerTag};

/// BER encoder for ASN.1 structures
///
/// Each encoded value is a TLV (Tag-Length-Value) triplet appended to an
/// internal `Vec<u8>` buffer. Constructed values are produced by encoding the
/// children into a separate encoder first and writing the result as the value
/// of the outer TLV.
pub struct BerEncoder {
    buffer: Vec<u8>,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// # Encoding Process
    /// 1. Encode tag
    /// 2. Encode length (short form below 128, long form otherwise)
    /// 3. Append value bytes
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) {
        self.buffer.extend_from_slice(&tag.encode());
        self.buffer
            .extend_from_slice(&BerLength::new(value.len()).encode());
        self.buffer.extend_from_slice(value);
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for BerEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal two's complement content of an INTEGER or ENUMERATED (big-endian)
///
/// BER requires the minimum number of bytes: 127 is `0x7F`, 128 is `0x00 0x80`,
/// -128 is `0x80`, -129 is `0xFF 0x7F`.
pub fn integer_content(value: i64) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }

    let mut bytes = Vec::new();

    if value < 0 {
        let mut temp = value;
        while temp != -1 {
            bytes.push((temp & 0xFF) as u8);
            temp >>= 8;
        }
        // Most significant byte must keep the sign bit set
        if bytes.is_empty() || (bytes[bytes.len() - 1] & 0x80) == 0 {
            bytes.push(0xFF);
        }
    } else {
        let mut temp = value;
        while temp > 0 {
            bytes.push((temp & 0xFF) as u8);
            temp >>= 8;
        }
        // Most significant byte must keep the sign bit clear
        if (bytes[bytes.len() - 1] & 0x80) != 0 {
            bytes.push(0x00);
        }
    }

    bytes.reverse();
    bytes
}

/// Content of a BOOLEAN (`0xFF` for true, as DER and most servers expect)
pub fn boolean_content(value: bool) -> Vec<u8> {
    vec![if value { 0xFF } else { 0x00 }]
}
