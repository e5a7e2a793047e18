//! Frame-level transport traits
//!
//! An LDAP connection moves whole BER messages, never partial byte runs. The
//! reading and writing sides are split so that one task can block on the next
//! incoming frame while any number of callers send.

use async_trait::async_trait;
use ldap_core::LdapResult;

/// Reading half of a transport: yields one complete BER message at a time
#[async_trait]
pub trait FrameReader: Send {
    /// Read the next complete frame
    ///
    /// # Returns
    ///
    /// `Ok(Some(bytes))` with exactly one encoded message, `Ok(None)` on a
    /// clean end of stream between frames.
    ///
    /// # Errors
    ///
    /// `FrameInvalid` for oversized or truncated frames, `Connection` for
    /// socket failures.
    async fn read_frame(&mut self) -> LdapResult<Option<Vec<u8>>>;
}

/// Writing half of a transport
#[async_trait]
pub trait FrameWriter: Send {
    /// Write one complete frame and flush it
    async fn write_frame(&mut self, frame: &[u8]) -> LdapResult<()>;

    /// Shut down the writing direction. Calling it twice is harmless.
    async fn close(&mut self) -> LdapResult<()>;
}

/// Transport layer that can be opened and then split into frame halves
#[async_trait]
pub trait TransportLayer: Send {
    /// Open the physical layer connection
    async fn open(&mut self) -> LdapResult<()>;

    /// Check if the transport is open and not yet split
    fn is_open(&self) -> bool;

    /// Consume the opened transport and hand out its reading and writing halves
    fn into_split(self: Box<Self>) -> LdapResult<(Box<dyn FrameReader>, Box<dyn FrameWriter>)>;
}
