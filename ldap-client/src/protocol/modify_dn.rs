//! ModifyDN operation
//!
//! ```text
//! ModifyDNRequest ::= [APPLICATION 12] SEQUENCE {
//!      entry           LDAPDN,
//!      newrdn          RelativeLDAPDN,
//!      deleteoldrdn    BOOLEAN,
//!      newSuperior     [0] LDAPDN OPTIONAL }
//! ```

use super::{
    expect_application, required_child, Control, WriteOperation, APPLICATION_MODIFY_DN_REQUEST,
    APPLICATION_MODIFY_DN_RESPONSE, CONTEXT_NEW_SUPERIOR,
};
use ldap_asn1::{BerTag, BerTagClass, Packet};
use ldap_core::{LdapError, LdapResult};

/// Request to rename an entry and optionally move it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyDnRequest {
    pub dn: String,
    pub new_rdn: String,
    pub delete_old_rdn: bool,
    /// New parent entry. `None` and `Some("")` both keep the current parent.
    pub new_superior: Option<String>,
    pub controls: Vec<Control>,
}

impl ModifyDnRequest {
    pub fn new(dn: impl Into<String>, new_rdn: impl Into<String>, delete_old_rdn: bool) -> Self {
        Self {
            dn: dn.into(),
            new_rdn: new_rdn.into(),
            delete_old_rdn,
            new_superior: None,
            controls: Vec::new(),
        }
    }

    pub fn new_superior(mut self, new_superior: impl Into<String>) -> Self {
        self.new_superior = Some(new_superior.into());
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        expect_application(packet, APPLICATION_MODIFY_DN_REQUEST, "Modify DN Request")?;
        let dn = required_child(packet, 0, "entry DN")?.as_string()?;
        let new_rdn = required_child(packet, 1, "new RDN")?.as_string()?;
        let delete_old_rdn = required_child(packet, 2, "deleteOldRDN")?.as_bool()?;
        let new_superior = match packet.child(3) {
            Some(child) if child.tag().matches(BerTagClass::ContextSpecific, CONTEXT_NEW_SUPERIOR) => {
                Some(child.as_string()?)
            }
            Some(child) => {
                return Err(LdapError::Asn1Decoding(format!(
                    "Expected newSuperior [0], got {:?} {}",
                    child.class(),
                    child.number()
                )));
            }
            None => None,
        };
        Ok(Self {
            dn,
            new_rdn,
            delete_old_rdn,
            new_superior,
            controls: Vec::new(),
        })
    }
}

impl WriteOperation for ModifyDnRequest {
    fn name(&self) -> &'static str {
        "ModifyDN"
    }

    fn dn(&self) -> &str {
        &self.dn
    }

    fn response_tag(&self) -> u32 {
        APPLICATION_MODIFY_DN_RESPONSE
    }

    fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn encode_operation(&self) -> Packet {
        let mut packet = Packet::constructed(
            BerTag::application(true, APPLICATION_MODIFY_DN_REQUEST),
            vec![
                Packet::octet_string(&self.dn),
                Packet::octet_string(&self.new_rdn),
                Packet::boolean(self.delete_old_rdn),
            ],
        );
        if let Some(new_superior) = self.new_superior.as_deref().filter(|s| !s.is_empty()) {
            packet = packet.with_child(Packet::primitive(
                BerTag::context_specific(false, CONTEXT_NEW_SUPERIOR),
                new_superior.as_bytes(),
            ));
        }
        packet
    }
}
