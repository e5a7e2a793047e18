//! Connection builder and configuration
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ldap_client::{ConnectionBuilder, LogObserver};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn demo() -> ldap_core::LdapResult<()> {
//! let conn = ConnectionBuilder::new()
//!     .tcp("ldap.example.com:389")
//!     .connect_timeout(Duration::from_secs(5))
//!     .observer(Arc::new(LogObserver))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use super::connection::LdapConnection;
use crate::observer::{NoopObserver, PacketObserver};
use ldap_core::{LdapError, LdapResult};
use ldap_transport::{TcpSettings, TcpTransport, DEFAULT_MAX_FRAME_SIZE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default LDAP port on localhost
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:389";

/// Default connect timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings that can be loaded from any serde format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// `host:port`; host names are resolved at connect time
    pub address: String,
    /// `None` waits as long as the OS does
    pub connect_timeout_ms: Option<u64>,
    /// Largest response accepted from the server, in bytes
    pub max_frame_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            connect_timeout_ms: Some(DEFAULT_CONNECT_TIMEOUT_MS),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl ConnectionConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Resolve the address and produce TCP transport settings
    pub async fn tcp_settings(&self) -> LdapResult<TcpSettings> {
        if self.max_frame_size == 0 {
            return Err(LdapError::InvalidData(
                "max_frame_size must be greater than zero".to_string(),
            ));
        }
        let address = tokio::net::lookup_host(self.address.as_str())
            .await?
            .next()
            .ok_or_else(|| {
                LdapError::InvalidData(format!("Address {} did not resolve", self.address))
            })?;
        let mut settings = TcpSettings::new(address);
        settings.timeout = self.connect_timeout();
        settings.max_frame_size = self.max_frame_size;
        Ok(settings)
    }
}

/// Builder for [`LdapConnection`]
///
/// # Default Settings
/// - Address: `127.0.0.1:389`
/// - Connect timeout: 30 seconds
/// - Max frame size: 16 MiB
/// - Observer: [`NoopObserver`]
#[derive(Clone)]
pub struct ConnectionBuilder {
    config: ConnectionConfig,
    observer: Arc<dyn PacketObserver>,
}

impl ConnectionBuilder {
    pub fn new() -> Self {
        Self::from_config(ConnectionConfig::default())
    }

    pub fn from_config(config: ConnectionConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Configure TCP transport
    ///
    /// # Arguments
    /// * `address` - TCP address in format "host:port" (e.g., "192.168.1.100:389")
    pub fn tcp(mut self, address: &str) -> Self {
        self.config.address = address.to_string();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn no_connect_timeout(mut self) -> Self {
        self.config.connect_timeout_ms = None;
        self
    }

    pub fn max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.config.max_frame_size = max_frame_size;
        self
    }

    /// Observer that sees every packet sent and received
    pub fn observer(mut self, observer: Arc<dyn PacketObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Connect over TCP and start the connection
    ///
    /// # Errors
    /// - `InvalidData` if the address does not resolve
    /// - `Timeout` if the connect timeout expires
    /// - `Connection` if the socket cannot be opened
    pub async fn connect(self) -> LdapResult<LdapConnection> {
        let settings = self.config.tcp_settings().await?;
        log::info!("Opening LDAP connection to {}", settings.address);
        let transport = Box::new(TcpTransport::new(settings));
        LdapConnection::from_transport(transport, self.observer).await
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        DeleteRequest, LdapMessage, LdapResultEnvelope, APPLICATION_DEL_RESPONSE,
    };
    use ldap_asn1::Packet;
    use ldap_transport::{BerFrameReader, FrameReader};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_builder_defaults_and_overrides() {
        let builder = ConnectionBuilder::new();
        assert_eq!(builder.config(), &ConnectionConfig::default());

        let builder = builder
            .tcp("10.0.0.1:1389")
            .connect_timeout(Duration::from_millis(1500))
            .max_frame_size(4096);
        assert_eq!(builder.config().address, "10.0.0.1:1389");
        assert_eq!(builder.config().connect_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(builder.config().max_frame_size, 4096);

        let builder = builder.no_connect_timeout();
        assert_eq!(builder.config().connect_timeout(), None);
    }

    #[test]
    fn test_config_from_toml_uses_defaults_for_missing_fields() {
        let config: ConnectionConfig = toml::from_str(r#"address = "ldap.example.com:636""#).unwrap();
        assert_eq!(config.address, "ldap.example.com:636");
        assert_eq!(config.connect_timeout_ms, Some(DEFAULT_CONNECT_TIMEOUT_MS));
        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);

        let text = toml::to_string(&config).unwrap();
        let back: ConnectionConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[tokio::test]
    async fn test_tcp_settings_rejects_zero_frame_size() {
        let config = ConnectionConfig {
            max_frame_size: 0,
            ..ConnectionConfig::default()
        };
        assert!(config.tcp_settings().await.is_err());
    }

    #[tokio::test]
    async fn test_connect_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let frame = BerFrameReader::new(read_half).read_frame().await.unwrap().unwrap();
            let request = LdapMessage::decode(&Packet::from_bytes(&frame).unwrap()).unwrap();
            let response = LdapMessage::new(
                request.message_id,
                LdapResultEnvelope::success().encode(APPLICATION_DEL_RESPONSE),
            );
            write_half.write_all(&response.encode().encode()).await.unwrap();
            write_half
        });

        let conn = ConnectionBuilder::new()
            .tcp(&address)
            .connect_timeout(Duration::from_secs(5))
            .connect()
            .await
            .unwrap();
        conn.delete(&DeleteRequest::new("cn=x,dc=ex")).await.unwrap();
        conn.close().await.unwrap();
        drop(server.await.unwrap());
    }
}
