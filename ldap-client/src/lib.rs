//! LDAP write-path client
//!
//! This crate provides the Add, Delete, Modify and ModifyDN operations over a
//! single connection shared by many concurrent requests.
//!
//! - [`protocol`]: request types, controls and result decoding
//! - [`connection`]: dispatcher, operation facades and the builder
//! - [`observer`]: hooks that see every packet sent and received

pub mod connection;
pub mod observer;
pub mod protocol;

#[cfg(test)]
pub(crate) mod test_server;

pub use connection::{
    ConnectionBuilder, ConnectionConfig, ConnectionState, Dispatcher, LdapConnection,
    PendingRequest,
};
pub use observer::{LogObserver, NoopObserver, PacketObserver};
pub use protocol::{
    AddRequest, Attribute, Change, Control, DeleteRequest, LdapMessage, LdapResultEnvelope,
    MessageId, ModifyDnRequest, ModifyOperation, ModifyRequest, WriteOperation, WriteResponse,
};
