//! Rust LDAP write-path client
//!
//! Add, Delete, Modify and ModifyDN (RFC 4511) over one connection shared by
//! many concurrent requests.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ldap-core`: Error type and result codes
//! - `ldap-asn1`: BER encoding/decoding and the tagged-value tree
//! - `ldap-transport`: Frame transport (TCP, any async stream)
//! - `ldap-client`: Request codec, dispatcher and connection
//!
//! # Usage
//!
//! ```no_run
//! use ldap::client::{ConnectionBuilder, DeleteRequest};
//!
//! # async fn demo() -> ldap::LdapResult<()> {
//! let conn = ConnectionBuilder::new().tcp("127.0.0.1:389").connect().await?;
//! conn.delete(&DeleteRequest::new("cn=test,cn=raft")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! See the `examples/` directory of this crate for runnable demos.

// Re-export core types
pub use ldap_core::{result_code, result_code_name, LdapError, LdapResult};

// Re-export the tagged-value tree
pub use ldap_asn1::Packet;

// Re-export client API
pub mod client {
    pub use ldap_client::*;
}

// Re-export transports
pub mod transport {
    pub use ldap_transport::*;
}
