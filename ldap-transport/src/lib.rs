//! Transport layer module for the LDAP client
//!
//! This crate provides the frame-level transport traits, BER message framing
//! over any async byte stream, and the TCP transport.

pub mod framed;
pub mod stream;
pub mod tcp;

pub use framed::{BerFrameReader, BerFrameWriter, StreamTransport, DEFAULT_MAX_FRAME_SIZE};
pub use stream::{FrameReader, FrameWriter, TransportLayer};
pub use tcp::{TcpSettings, TcpTransport};
