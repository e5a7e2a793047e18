//! Add operation
//!
//! ```text
//! AddRequest ::= [APPLICATION 8] SEQUENCE {
//!      entry           LDAPDN,
//!      attributes      AttributeList }
//!
//! AttributeList ::= SEQUENCE OF attribute Attribute
//! ```

use super::{
    expect_application, required_child, Attribute, Control, WriteOperation,
    APPLICATION_ADD_REQUEST, APPLICATION_ADD_RESPONSE,
};
use ldap_asn1::{BerTag, Packet};
use ldap_core::LdapResult;

/// Request to create a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub dn: String,
    pub attributes: Vec<Attribute>,
    pub controls: Vec<Control>,
}

impl AddRequest {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// Append an attribute with its values
    pub fn add<T, I, V>(mut self, attr_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes.push(Attribute::new(attr_type, values));
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    /// Decode from a `[APPLICATION 8]` node; controls are not part of it
    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        expect_application(packet, APPLICATION_ADD_REQUEST, "Add Request")?;
        let dn = required_child(packet, 0, "entry DN")?.as_string()?;
        let attributes = required_child(packet, 1, "attribute list")?
            .children()
            .iter()
            .map(Attribute::decode)
            .collect::<LdapResult<Vec<_>>>()?;
        Ok(Self {
            dn,
            attributes,
            controls: Vec::new(),
        })
    }
}

impl WriteOperation for AddRequest {
    fn name(&self) -> &'static str {
        "Add"
    }

    fn dn(&self) -> &str {
        &self.dn
    }

    fn response_tag(&self) -> u32 {
        APPLICATION_ADD_RESPONSE
    }

    fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn encode_operation(&self) -> Packet {
        Packet::constructed(
            BerTag::application(true, APPLICATION_ADD_REQUEST),
            vec![
                Packet::octet_string(&self.dn),
                Packet::sequence(self.attributes.iter().map(Attribute::encode).collect()),
            ],
        )
    }
}
