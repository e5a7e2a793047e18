//! TCP transport implementation

use crate::framed::{BerFrameReader, BerFrameWriter, DEFAULT_MAX_FRAME_SIZE};
use crate::stream::{FrameReader, FrameWriter, TransportLayer};
use async_trait::async_trait;
use ldap_core::{LdapError, LdapResult};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;

/// Wrapper for TcpStream that implements Debug
struct DebugTcpStream(TcpStream);

impl fmt::Debug for DebugTcpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpStream")
            .field("peer", &self.0.peer_addr().ok())
            .finish()
    }
}

/// TCP transport layer settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub address: SocketAddr,
    /// Connect timeout. None waits as long as the OS does.
    pub timeout: Option<Duration>,
    pub max_frame_size: usize,
}

impl TcpSettings {
    /// Create new TCP settings
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: Some(Duration::from_secs(30)),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Create TCP settings with timeout
    pub fn with_timeout(address: SocketAddr, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new(address)
        }
    }
}

/// TCP transport layer implementation
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<DebugTcpStream>,
    settings: TcpSettings,
}

impl TcpTransport {
    /// Create a new TCP transport layer
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
        }
    }

    /// Create TCP transport from address string
    pub fn from_address(address: &str) -> LdapResult<Self> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| LdapError::InvalidData(format!("Invalid TCP address: {}", e)))?;
        Ok(Self::new(TcpSettings::new(addr)))
    }

    /// Create TCP transport from an already-connected TcpStream
    pub fn from_connected_stream(stream: TcpStream) -> LdapResult<Self> {
        let address = stream.peer_addr()?;
        Ok(Self {
            stream: Some(DebugTcpStream(stream)),
            settings: TcpSettings::new(address),
        })
    }

    pub fn settings(&self) -> &TcpSettings {
        &self.settings
    }
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self) -> LdapResult<()> {
        if self.stream.is_some() {
            return Err(LdapError::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        log::debug!("Connecting to {}", self.settings.address);

        // Apply timeout to connection establishment if specified
        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, TcpStream::connect(self.settings.address))
                .await
                .map_err(|_| LdapError::Timeout)??
        } else {
            TcpStream::connect(self.settings.address).await?
        };
        stream.set_nodelay(true)?;

        log::info!("Connected to {}", self.settings.address);
        self.stream = Some(DebugTcpStream(stream));
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn into_split(self: Box<Self>) -> LdapResult<(Box<dyn FrameReader>, Box<dyn FrameWriter>)> {
        let DebugTcpStream(stream) = self.stream.ok_or_else(|| {
            LdapError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP stream not connected",
            ))
        })?;
        let (read_half, write_half) = stream.into_split();
        Ok((
            Box::new(BerFrameReader::with_max_frame_size(
                read_half,
                self.settings.max_frame_size,
            )),
            Box::new(BerFrameWriter::new(write_half)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_settings() {
        let addr: SocketAddr = "127.0.0.1:389".parse().unwrap();
        let settings = TcpSettings::new(addr);
        assert_eq!(settings.address, addr);
        assert!(settings.timeout.is_some());
        assert_eq!(settings.max_frame_size, DEFAULT_MAX_FRAME_SIZE);

        let settings = TcpSettings::with_timeout(addr, Duration::from_millis(250));
        assert_eq!(settings.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_from_address_rejects_garbage() {
        let err = TcpTransport::from_address("not an address").unwrap_err();
        assert!(matches!(err, LdapError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_split_before_open_fails() {
        let transport = Box::new(TcpTransport::from_address("127.0.0.1:389").unwrap());
        assert!(!transport.is_open());
        assert!(transport.into_split().is_err());
    }

    #[tokio::test]
    async fn test_open_and_exchange_frames() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 7];
            socket.read_exact(&mut request).await.unwrap();
            socket.write_all(&request).await.unwrap();
            request
        });

        let mut transport = Box::new(TcpTransport::new(TcpSettings::with_timeout(
            addr,
            Duration::from_secs(5),
        )));
        transport.open().await.unwrap();
        assert!(transport.is_open());
        assert!(transport.open().await.is_err());

        let (mut reader, mut writer) = transport.into_split().unwrap();
        let frame = [0x30, 0x05, 0x02, 0x01, 0x02, 0x4A, 0x00];
        writer.write_frame(&frame).await.unwrap();

        let echoed = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(echoed, frame);
        assert_eq!(server.await.unwrap(), frame);
    }
}
