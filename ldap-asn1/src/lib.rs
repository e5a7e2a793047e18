//! ASN.1 processing module for the LDAP client
//!
//! This crate provides BER encoding/decoding and the tagged-value tree
//! ([`Packet`]) that the protocol codec builds messages from.

pub mod ber;
pub mod packet;

pub use ber::{frame_length, BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass};
pub use packet::Packet;
