//! BER encoding types (Tag, Length, etc.)

use ldap_core::{LdapError, LdapResult};

/// Universal tag numbers used by the LDAP message grammar
pub const TAG_BOOLEAN: u32 = 1;
pub const TAG_INTEGER: u32 = 2;
pub const TAG_OCTET_STRING: u32 = 4;
pub const TAG_ENUMERATED: u32 = 10;
pub const TAG_SEQUENCE: u32 = 16;
pub const TAG_SET: u32 = 17;

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types (LDAP protocol operations)
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from bits (bits 7-6 of tag byte)
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER Tag
///
/// A BER tag identifies the type of an ASN.1 value. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: Whether the value contains other values
/// - **Tag Number**: 0-30 in the short form, larger numbers in the extended form
///
/// # Encoding Format
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// Extended form (tag number > 30):
/// ```text
/// First byte:  C C P 1 1 1 1 1  (all tag bits set to 1)
/// Following bytes: 1 T T T T T T T  (continuation bytes, last byte has bit 7 = 0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    /// Create a new BER tag
    pub fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    /// Get tag class
    pub fn class(&self) -> BerTagClass {
        self.class
    }

    /// Check if tag is constructed
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Check class and number, ignoring the constructed bit
    pub fn matches(&self, class: BerTagClass, number: u32) -> bool {
        self.class == class && self.number == number
    }

    /// Encode tag to bytes
    ///
    /// Tag numbers up to 30 fit in one byte; larger numbers use the
    /// extended form.
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::new();

        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };

        if self.number <= 30 {
            result.push(class_bits | constructed_bit | (self.number as u8 & 0x1F));
        } else {
            result.push(class_bits | constructed_bit | 0x1F);

            let mut remaining = self.number;
            let mut bytes = Vec::new();
            while remaining > 0 {
                bytes.push((remaining & 0x7F) as u8);
                remaining >>= 7;
            }

            // Continuation bit on all but the last byte
            for (i, &byte) in bytes.iter().rev().enumerate() {
                if i < bytes.len() - 1 {
                    result.push(byte | 0x80);
                } else {
                    result.push(byte);
                }
            }
        }

        result
    }

    /// Decode tag from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerTag, bytes_consumed))` if successful, `Err` otherwise
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        if data.is_empty() {
            return Err(LdapError::Asn1Decoding(
                "Empty buffer for tag decoding".to_string(),
            ));
        }

        let first_byte = data[0];
        let class = BerTagClass::from_bits(first_byte);
        let constructed = (first_byte & 0x20) != 0;
        let tag_bits = first_byte & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        let mut tag_number = 0u32;
        let mut pos = 1;
        let mut has_more = true;

        while has_more && pos < data.len() {
            let byte = data[pos];
            has_more = (byte & 0x80) != 0;
            tag_number = (tag_number << 7) | ((byte & 0x7F) as u32);
            pos += 1;

            // At most 5 bytes for u32 (1 leading + 4 continuation)
            if pos > 5 {
                return Err(LdapError::Asn1Decoding(
                    "Tag number too large or invalid encoding".to_string(),
                ));
            }
        }

        if has_more {
            return Err(LdapError::Asn1Decoding(
                "Incomplete extended tag encoding".to_string(),
            ));
        }

        Ok((Self::new(class, constructed, tag_number), pos))
    }
}

/// BER Length encoding
///
/// # Encoding Format
///
/// Short form (0-127):
/// ```text
/// Byte: 0 L L L L L L L
/// ```
///
/// Long form:
/// ```text
/// First byte:  1 N N N N N N N  (N = number of length bytes)
/// Following bytes: L L L L L L L L  (big-endian length value)
/// ```
///
/// Indefinite length (`0x80`) is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length > 127, encoded with length-of-length
    Long(usize),
}

impl BerLength {
    /// Create a new BER length, choosing the short form when possible
    pub fn new(length: usize) -> Self {
        if length < 128 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    /// Get the length value
    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Encode length to bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            BerLength::Short(length) => vec![*length],
            BerLength::Long(length) => {
                let mut num_bytes = 0;
                let mut temp = *length;
                while temp > 0 {
                    num_bytes += 1;
                    temp >>= 8;
                }
                if num_bytes == 0 {
                    num_bytes = 1;
                }

                let mut result = vec![0x80 | (num_bytes as u8)];
                for i in (0..num_bytes).rev() {
                    result.push(((*length >> (i * 8)) & 0xFF) as u8);
                }

                result
            }
        }
    }

    /// Decode length from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))` if successful, `Err` otherwise
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        if data.is_empty() {
            return Err(LdapError::Asn1Decoding(
                "Empty buffer for length decoding".to_string(),
            ));
        }

        let first_byte = data[0];

        if (first_byte & 0x80) == 0 {
            return Ok((BerLength::Short(first_byte & 0x7F), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;

        if num_bytes == 0 {
            return Err(LdapError::Asn1Decoding(
                "Indefinite length encoding not supported".to_string(),
            ));
        }

        if num_bytes > 4 {
            return Err(LdapError::Asn1Decoding(format!(
                "Length encoding too large: {} bytes (max 4)",
                num_bytes
            )));
        }

        if data.len() < 1 + num_bytes {
            return Err(LdapError::Asn1Decoding(format!(
                "Buffer too short for long form length: need {} bytes, got {}",
                1 + num_bytes,
                data.len()
            )));
        }

        let mut length = 0usize;
        for i in 0..num_bytes {
            length = (length << 8) | (data[1 + i] as usize);
        }

        Ok((BerLength::Long(length), 1 + num_bytes))
    }
}
