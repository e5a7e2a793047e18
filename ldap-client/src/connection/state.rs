//! Connection state machine

use ldap_core::{LdapError, LdapResult};
use std::fmt;

/// Lifecycle state of a multiplexed connection
///
/// # State Transitions
/// ```text
/// Open -> Closing   (close() or reader failure)
/// Closing -> Closed (pending requests failed, table emptied)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Transport is split and the reader task is running
    #[default]
    Open,
    /// Shutdown has started; new requests are refused
    Closing,
    /// Every pending request has been failed
    Closed,
}

impl ConnectionState {
    /// Check if new requests may be allocated and sent
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// Validate state transition
    ///
    /// # Valid Transitions
    /// - `Open` -> `Closing`
    /// - `Closing` -> `Closed`
    /// - `Closed` -> `Closed` (repeated close)
    pub fn validate_transition(&self, new_state: ConnectionState) -> LdapResult<()> {
        let valid = matches!(
            (*self, new_state),
            (ConnectionState::Open, ConnectionState::Closing)
                | (ConnectionState::Closing, ConnectionState::Closed)
                | (ConnectionState::Closed, ConnectionState::Closed)
        );

        if valid {
            Ok(())
        } else {
            Err(LdapError::InvalidData(format!(
                "Invalid state transition: {:?} -> {:?}",
                self, new_state
            )))
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Open => "Open",
            ConnectionState::Closing => "Closing",
            ConnectionState::Closed => "Closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
