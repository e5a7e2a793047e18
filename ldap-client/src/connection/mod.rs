//! Connection management module

pub mod builder;
#[allow(clippy::module_inception)]
pub mod connection;
pub mod dispatcher;
pub mod state;

pub use builder::{ConnectionBuilder, ConnectionConfig};
pub use connection::LdapConnection;
pub use dispatcher::{Dispatcher, PendingRequest};
pub use state::ConnectionState;
