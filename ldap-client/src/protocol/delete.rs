//! Delete operation
//!
//! ```text
//! DelRequest ::= [APPLICATION 10] LDAPDN
//! ```
//!
//! The request is a primitive node whose content is the DN itself.

use super::{
    expect_application, Control, WriteOperation, APPLICATION_DEL_REQUEST,
    APPLICATION_DEL_RESPONSE,
};
use ldap_asn1::{BerTag, Packet};
use ldap_core::{LdapError, LdapResult};

/// Request to remove a leaf entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub dn: String,
    pub controls: Vec<Control>,
}

impl DeleteRequest {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            controls: Vec::new(),
        }
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        expect_application(packet, APPLICATION_DEL_REQUEST, "Delete Request")?;
        if packet.is_constructed() {
            return Err(LdapError::Asn1Decoding(
                "Delete Request must be primitive".to_string(),
            ));
        }
        Ok(Self::new(packet.as_string()?))
    }
}

impl WriteOperation for DeleteRequest {
    fn name(&self) -> &'static str {
        "Delete"
    }

    fn dn(&self) -> &str {
        &self.dn
    }

    fn response_tag(&self) -> u32 {
        APPLICATION_DEL_RESPONSE
    }

    fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn encode_operation(&self) -> Packet {
        Packet::primitive(
            BerTag::application(false, APPLICATION_DEL_REQUEST),
            self.dn.as_bytes(),
        )
    }
}
