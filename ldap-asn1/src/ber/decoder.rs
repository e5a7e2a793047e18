//! BER decoder for ASN.1 structures
//!
//! This module provides decoding functionality for ASN.1 values using BER encoding rules.
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::ber::{BerDecoder, integer_from_content};
//!
//! let data = [0x02, 0x01, 0x2A];
//! let mut decoder = BerDecoder::new(&data);
//! let (tag, value, _) = decoder.decode_tlv().unwrap();
//! assert_eq!(tag.number(), 2);
//! assert_eq!(integer_from_content(value).unwrap(), 42);
//! ```

use crate::ber::types::{BerLength, BerTag};
use ldap_core::{LdapError, LdapResult};

/// BER decoder for ASN.1 structures
///
/// Reads TLV (Tag-Length-Value) triplets sequentially from a borrowed buffer.
/// Value slices borrow from the input, so nested content can be decoded with a
/// fresh decoder over the returned slice without copying.
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BerDecoder<'a> {
    /// Create a new BER decoder
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    fn read_bytes(&mut self, count: usize) -> LdapResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(LdapError::Asn1Decoding(format!(
                "Buffer exhausted: need {} bytes, have {}",
                count,
                self.remaining()
            )));
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Decode a TLV (Tag-Length-Value) triplet
    ///
    /// # Returns
    /// Returns `Ok((tag, value_bytes, total_bytes_consumed))` if successful.
    pub fn decode_tlv(&mut self) -> LdapResult<(BerTag, &'a [u8], usize)> {
        let start_pos = self.position;

        let (tag, tag_bytes) = BerTag::decode(&self.buffer[self.position..])?;
        self.position += tag_bytes;

        let (length, length_bytes) = BerLength::decode(&self.buffer[self.position..])?;
        self.position += length_bytes;

        let value = self.read_bytes(length.value())?;

        Ok((tag, value, self.position - start_pos))
    }
}

/// Decode the two's complement content of an INTEGER or ENUMERATED
///
/// # Error Handling
/// Returns error if the content is empty or longer than 8 bytes.
pub fn integer_from_content(bytes: &[u8]) -> LdapResult<i64> {
    if bytes.is_empty() {
        return Err(LdapError::Asn1Decoding("Empty integer encoding".to_string()));
    }

    if bytes.len() > 8 {
        return Err(LdapError::Asn1Decoding(format!(
            "Integer too large: {} bytes (max 8)",
            bytes.len()
        )));
    }

    let mut value = 0i64;
    for &byte in bytes {
        value = (value << 8) | (byte as i64);
    }

    // Sign extend from the most significant content byte
    if (bytes[0] & 0x80) != 0 && bytes.len() < 8 {
        let shift = 64 - (bytes.len() * 8);
        value = (value << shift) >> shift;
    }

    Ok(value)
}

/// Total size of the first TLV in `data`, if its header is complete
///
/// Returns `Ok(None)` when more bytes are needed to know the size, and an
/// error when the header can never be valid (indefinite or oversized length).
/// Used by stream framing to find message boundaries before decoding.
pub fn frame_length(data: &[u8]) -> LdapResult<Option<usize>> {
    if data.is_empty() {
        return Ok(None);
    }

    let mut pos = 1;
    if data[0] & 0x1F == 0x1F {
        loop {
            match data.get(pos) {
                None => return Ok(None),
                Some(byte) => {
                    pos += 1;
                    if byte & 0x80 == 0 {
                        break;
                    }
                    if pos > 5 {
                        return Err(LdapError::Asn1Decoding(
                            "Tag number too large or invalid encoding".to_string(),
                        ));
                    }
                }
            }
        }
    }

    let first_length_byte = match data.get(pos) {
        None => return Ok(None),
        Some(byte) => *byte,
    };
    if first_length_byte & 0x80 != 0 {
        let num_bytes = (first_length_byte & 0x7F) as usize;
        if num_bytes == 0 || num_bytes > 4 {
            return Err(LdapError::Asn1Decoding(format!(
                "Unsupported length encoding: 0x{:02X}",
                first_length_byte
            )));
        }
        if data.len() < pos + 1 + num_bytes {
            return Ok(None);
        }
    }

    let (length, length_bytes) = BerLength::decode(&data[pos..])?;
    Ok(Some(pos + length_bytes + length.value()))
}
