use crate::result_code::{
    result_code_name, RESULT_CODE_INVALID_REQUEST, RESULT_CODE_NETWORK_ERROR,
    RESULT_CODE_UNEXPECTED_RESPONSE,
};
use thiserror::Error;

/// Main error type for LDAP client operations
#[derive(Error, Debug)]
pub enum LdapError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The request could not be sent, or its response could not be received
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-zero result code
    #[error("LDAP result code {code} ({}): {message}", code_name(.code))]
    Protocol {
        code: i32,
        message: String,
        matched_dn: String,
    },

    #[error("Timeout")]
    Timeout,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("ASN.1 decoding error: {0}")]
    Asn1Decoding(String),

    #[error("Frame invalid: {0}")]
    FrameInvalid(String),
}

fn code_name(code: &i32) -> &'static str {
    result_code_name(*code)
}

impl LdapError {
    /// Build a protocol failure from a decoded result envelope
    pub fn protocol(code: i32, message: impl Into<String>, matched_dn: impl Into<String>) -> Self {
        LdapError::Protocol {
            code,
            message: message.into(),
            matched_dn: matched_dn.into(),
        }
    }

    /// Result code classifying this error
    ///
    /// Server rejections carry their own code. Transport failures (the ones
    /// [`is_network`](Self::is_network) reports) map to
    /// [`RESULT_CODE_NETWORK_ERROR`], undecodable responses to
    /// [`RESULT_CODE_UNEXPECTED_RESPONSE`] and rejected input to
    /// [`RESULT_CODE_INVALID_REQUEST`].
    pub fn result_code(&self) -> i32 {
        match self {
            LdapError::Protocol { code, .. } => *code,
            LdapError::Asn1Decoding(_) => RESULT_CODE_UNEXPECTED_RESPONSE,
            LdapError::InvalidData(_) => RESULT_CODE_INVALID_REQUEST,
            LdapError::Connection(_)
            | LdapError::Network(_)
            | LdapError::Timeout
            | LdapError::FrameInvalid(_) => RESULT_CODE_NETWORK_ERROR,
        }
    }

    /// Matched DN reported by the server, if this is a protocol failure
    pub fn matched_dn(&self) -> Option<&str> {
        match self {
            LdapError::Protocol { matched_dn, .. } => Some(matched_dn),
            _ => None,
        }
    }

    /// Whether the failure came from the transport rather than the server
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            LdapError::Connection(_)
                | LdapError::Network(_)
                | LdapError::Timeout
                | LdapError::FrameInvalid(_)
        )
    }
}

/// Result type alias for LDAP client operations
pub type LdapResult<T> = Result<T, LdapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_code::RESULT_CODE_NO_SUCH_OBJECT;

    #[test]
    fn test_protocol_error_display() {
        let err = LdapError::protocol(RESULT_CODE_NO_SUCH_OBJECT, "entry not found", "dc=example");
        assert_eq!(
            err.to_string(),
            "LDAP result code 32 (No Such Object): entry not found"
        );
        assert_eq!(err.result_code(), 32);
        assert_eq!(err.matched_dn(), Some("dc=example"));
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_error_classification() {
        let err = LdapError::Network("connection closed".to_string());
        assert_eq!(err.result_code(), RESULT_CODE_NETWORK_ERROR);
        assert!(err.is_network());
        assert!(err.matched_dn().is_none());

        let io = LdapError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"));
        assert!(io.is_network());
        assert_eq!(io.result_code(), RESULT_CODE_NETWORK_ERROR);
    }

    #[test]
    fn test_local_errors_are_not_network_errors() {
        let err = LdapError::InvalidData("DN must not be empty".to_string());
        assert!(!err.is_network());
        assert_eq!(err.result_code(), RESULT_CODE_INVALID_REQUEST);

        let err = LdapError::Asn1Decoding("truncated".to_string());
        assert!(!err.is_network());
        assert_eq!(err.result_code(), RESULT_CODE_UNEXPECTED_RESPONSE);
    }
}
