//! BER message framing over async byte streams
//!
//! LDAP has no length prefix of its own: every message is a single BER
//! SEQUENCE, so the outer TLV header tells how many bytes belong to it. The
//! reader buffers incoming bytes in a `BytesMut` until the first TLV is
//! complete and then splits it off.

use crate::stream::{FrameReader, FrameWriter, TransportLayer};
use async_trait::async_trait;
use bytes::BytesMut;
use ldap_asn1::frame_length;
use ldap_core::{LdapError, LdapResult};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};

/// Default upper bound for a single incoming message (16 MiB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

const READ_CHUNK_SIZE: usize = 4096;

/// Reads whole BER messages from an `AsyncRead`
#[derive(Debug)]
pub struct BerFrameReader<R> {
    inner: R,
    buffer: BytesMut,
    max_frame_size: usize,
}

impl<R> BerFrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_frame_size(inner, DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(inner: R, max_frame_size: usize) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            max_frame_size,
        }
    }

    /// Split the first frame off the buffer if it has fully arrived
    fn take_frame(&mut self) -> LdapResult<Option<Vec<u8>>> {
        let total = match frame_length(&self.buffer)
            .map_err(|e| LdapError::FrameInvalid(e.to_string()))?
        {
            Some(total) => total,
            None => return Ok(None),
        };

        if total > self.max_frame_size {
            return Err(LdapError::FrameInvalid(format!(
                "Frame of {} bytes exceeds limit of {}",
                total, self.max_frame_size
            )));
        }

        if self.buffer.len() < total {
            return Ok(None);
        }

        Ok(Some(self.buffer.split_to(total).to_vec()))
    }
}

#[async_trait]
impl<R> FrameReader for BerFrameReader<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_frame(&mut self) -> LdapResult<Option<Vec<u8>>> {
        loop {
            if let Some(frame) = self.take_frame()? {
                return Ok(Some(frame));
            }

            self.buffer.reserve(READ_CHUNK_SIZE);
            let n = self.inner.read_buf(&mut self.buffer).await?;
            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(LdapError::FrameInvalid(format!(
                    "Stream ended inside a frame ({} bytes buffered)",
                    self.buffer.len()
                )));
            }
        }
    }
}

/// Writes whole BER messages to an `AsyncWrite`
#[derive(Debug)]
pub struct BerFrameWriter<W> {
    inner: W,
    closed: bool,
}

impl<W> BerFrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            closed: false,
        }
    }
}

#[async_trait]
impl<W> FrameWriter for BerFrameWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_frame(&mut self, frame: &[u8]) -> LdapResult<()> {
        if self.closed {
            return Err(LdapError::Network("Writer has been closed".to_string()));
        }
        self.inner.write_all(frame).await?;
        self.inner.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> LdapResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.shutdown().await?;
        Ok(())
    }
}

/// Transport over an already-connected async stream
///
/// Used for in-memory pipes and for streams established by other code (for
/// example a TLS session set up by the caller).
pub struct StreamTransport<S> {
    stream: Option<S>,
    max_frame_size: usize,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }
}

#[async_trait]
impl<S> TransportLayer for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn open(&mut self) -> LdapResult<()> {
        if self.stream.is_none() {
            return Err(LdapError::Network("Stream is no longer available".to_string()));
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn into_split(self: Box<Self>) -> LdapResult<(Box<dyn FrameReader>, Box<dyn FrameWriter>)> {
        let stream = self
            .stream
            .ok_or_else(|| LdapError::Network("Stream is no longer available".to_string()))?;
        let (read_half, write_half): (ReadHalf<S>, WriteHalf<S>) = tokio::io::split(stream);
        Ok((
            Box::new(BerFrameReader::with_max_frame_size(
                read_half,
                self.max_frame_size,
            )),
            Box::new(BerFrameWriter::new(write_half)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    // SEQUENCE { INTEGER 1, [APPLICATION 11] "" }
    const DELETE_RESPONSE: [u8; 7] = [0x30, 0x05, 0x02, 0x01, 0x01, 0x4B, 0x00];

    #[tokio::test]
    async fn test_reads_frame_split_across_reads() {
        let mock = Builder::new()
            .read(&DELETE_RESPONSE[..1])
            .read(&DELETE_RESPONSE[1..4])
            .read(&DELETE_RESPONSE[4..])
            .build();
        let mut reader = BerFrameReader::new(mock);
        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.as_deref(), Some(&DELETE_RESPONSE[..]));
        assert!(reader.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_two_frames_from_one_chunk() {
        let mut both = DELETE_RESPONSE.to_vec();
        both.extend_from_slice(&DELETE_RESPONSE);
        let mock = Builder::new().read(&both).build();
        let mut reader = BerFrameReader::new(mock);
        assert_eq!(reader.read_frame().await.unwrap().unwrap(), DELETE_RESPONSE);
        assert_eq!(reader.read_frame().await.unwrap().unwrap(), DELETE_RESPONSE);
        assert!(reader.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_eof_inside_frame_is_invalid() {
        let mock = Builder::new().read(&DELETE_RESPONSE[..4]).build();
        let mut reader = BerFrameReader::new(mock);
        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(err, LdapError::FrameInvalid(_)));
    }

    #[tokio::test]
    async fn test_oversized_frame_rejected() {
        let mock = Builder::new().read(&[0x30, 0x82, 0x10, 0x00]).build();
        let mut reader = BerFrameReader::with_max_frame_size(mock, 1024);
        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(err, LdapError::FrameInvalid(_)));
    }

    #[tokio::test]
    async fn test_indefinite_length_rejected() {
        let mock = Builder::new().read(&[0x30, 0x80, 0x00, 0x00]).build();
        let mut reader = BerFrameReader::new(mock);
        assert!(reader.read_frame().await.is_err());
    }

    #[tokio::test]
    async fn test_writer_writes_frame_and_closes_once() {
        let mock = Builder::new().write(&DELETE_RESPONSE).build();
        let mut writer = BerFrameWriter::new(mock);
        writer.write_frame(&DELETE_RESPONSE).await.unwrap();
        writer.close().await.unwrap();
        writer.close().await.unwrap();
        let err = writer.write_frame(&DELETE_RESPONSE).await.unwrap_err();
        assert!(matches!(err, LdapError::Network(_)));
    }

    #[tokio::test]
    async fn test_stream_transport_over_duplex() {
        let (client, server) = tokio::io::duplex(256);
        let mut transport = Box::new(StreamTransport::new(client));
        transport.open().await.unwrap();
        assert!(transport.is_open());

        let (_, mut writer) = transport.into_split().unwrap();
        writer.write_frame(&DELETE_RESPONSE).await.unwrap();

        let mut server_reader = BerFrameReader::new(server);
        let frame = server_reader.read_frame().await.unwrap().unwrap();
        assert_eq!(frame, DELETE_RESPONSE);
    }
}
