//! Request and response controls
//!
//! ```text
//! Controls ::= SEQUENCE OF control Control
//!
//! Control ::= SEQUENCE {
//!      controlType             LDAPOID,
//!      criticality             BOOLEAN DEFAULT FALSE,
//!      controlValue            OCTET STRING OPTIONAL }
//! ```
//!
//! Controls travel as the `[0]` child of the message envelope.

use super::{required_child, CONTEXT_CONTROLS};
use ldap_asn1::ber::{TAG_BOOLEAN, TAG_OCTET_STRING};
use ldap_asn1::{BerTag, BerTagClass, Packet};
use ldap_core::{LdapError, LdapResult};

/// RFC 3829 Authorization Identity Request Control OID
pub const AUTHZ_ID_REQUEST_OID: &str = "2.16.840.1.113730.3.4.16";
/// RFC 4527 Pre-Read Control OID
pub const PRE_READ_OID: &str = "1.3.6.1.1.13.1";
/// RFC 4527 Post-Read Control OID
pub const POST_READ_OID: &str = "1.3.6.1.1.13.2";
/// RFC 3296 ManageDsaIT Control OID
pub const MANAGE_DSA_IT_OID: &str = "2.16.840.1.113730.3.4.2";

/// LDAP control (request or response)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub oid: String,
    pub criticality: bool,
    pub value: Option<Vec<u8>>,
}

impl Control {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            criticality: false,
            value: None,
        }
    }

    pub fn critical(mut self, criticality: bool) -> Self {
        self.criticality = criticality;
        self
    }

    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Criticality is only written when true (DEFAULT FALSE)
    pub fn encode(&self) -> Packet {
        let mut packet = Packet::sequence(vec![Packet::octet_string(&self.oid)]);
        if self.criticality {
            packet = packet.with_child(Packet::boolean(true));
        }
        if let Some(value) = &self.value {
            packet = packet.with_child(Packet::octet_string(value));
        }
        packet
    }

    /// Decode one Control; optional fields are told apart by tag
    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        if !packet.is_constructed() {
            return Err(LdapError::Asn1Decoding(
                "Control is not a SEQUENCE".to_string(),
            ));
        }
        let mut control = Control::new(required_child(packet, 0, "control type")?.as_string()?);
        for field in &packet.children()[1..] {
            if field.tag().matches(BerTagClass::Universal, TAG_BOOLEAN) {
                control.criticality = field.as_bool()?;
            } else if field.tag().matches(BerTagClass::Universal, TAG_OCTET_STRING) {
                control.value = Some(field.value().to_vec());
            } else {
                log::warn!(
                    "Ignoring unexpected field {:?} {} in control {}",
                    field.class(),
                    field.number(),
                    control.oid
                );
            }
        }
        Ok(control)
    }
}

/// Encode controls as the `[0]` envelope child, order preserved
pub fn encode_controls(controls: &[Control]) -> Packet {
    Packet::constructed(
        BerTag::context_specific(true, CONTEXT_CONTROLS),
        controls.iter().map(Control::encode).collect(),
    )
}

/// Decode the `[0]` envelope child back into controls, order preserved
pub fn decode_controls(packet: &Packet) -> LdapResult<Vec<Control>> {
    if !packet.tag().matches(BerTagClass::ContextSpecific, CONTEXT_CONTROLS) {
        return Err(LdapError::Asn1Decoding(format!(
            "Expected controls [0], got {:?} {}",
            packet.class(),
            packet.number()
        )));
    }
    packet.children().iter().map(Control::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_critical_control_omits_boolean() {
        let packet = Control::new(MANAGE_DSA_IT_OID).encode();
        assert_eq!(packet.children().len(), 1);

        let packet = Control::new(MANAGE_DSA_IT_OID).critical(true).encode();
        assert_eq!(packet.children().len(), 2);
        assert!(packet.child(1).unwrap().as_bool().unwrap());
    }

    #[test]
    fn test_controls_wrapper_is_context_zero() {
        let packet = encode_controls(&[Control::new(AUTHZ_ID_REQUEST_OID)]);
        assert_eq!(packet.encode()[0], 0xA0);
    }

    #[test]
    fn test_controls_decode_in_order() {
        let controls = vec![
            Control::new(PRE_READ_OID).critical(true).with_value(vec![0x30u8, 0x00]),
            Control::new(POST_READ_OID).with_value(b"cn".to_vec()),
            Control::new(MANAGE_DSA_IT_OID),
        ];
        let bytes = encode_controls(&controls).encode();
        let decoded = decode_controls(&Packet::from_bytes(&bytes).unwrap()).unwrap();
        assert_eq!(decoded, controls);
    }

    #[test]
    fn test_decode_controls_rejects_other_tag() {
        assert!(decode_controls(&Packet::sequence(vec![])).is_err());
    }
}
