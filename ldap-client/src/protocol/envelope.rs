//! LDAPMessage envelope
//!
//! ```text
//! LDAPMessage ::= SEQUENCE {
//!      messageID       MessageID,
//!      protocolOp      CHOICE { ... },
//!      controls        [0] Controls OPTIONAL }
//!
//! MessageID ::= INTEGER (0 ..  maxInt)
//! ```

use super::control::{decode_controls, encode_controls, Control};
use super::required_child;
use ldap_asn1::Packet;
use ldap_core::{LdapError, LdapResult};

/// Message identifier correlating a request with its response
pub type MessageId = i32;

/// A decoded or to-be-encoded LDAP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapMessage {
    pub message_id: MessageId,
    pub operation: Packet,
    pub controls: Vec<Control>,
}

impl LdapMessage {
    pub fn new(message_id: MessageId, operation: Packet) -> Self {
        Self {
            message_id,
            operation,
            controls: Vec::new(),
        }
    }

    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }

    /// Application tag number of the protocolOp
    pub fn operation_tag(&self) -> u32 {
        self.operation.number()
    }

    /// Build the envelope tree; controls are appended only if present
    pub fn encode(&self) -> Packet {
        let mut packet = Packet::sequence(vec![
            Packet::integer(self.message_id as i64),
            self.operation.clone(),
        ]);
        if !self.controls.is_empty() {
            packet = packet.with_child(encode_controls(&self.controls));
        }
        packet
    }

    /// Decode an envelope tree
    ///
    /// The third child is read as controls only when the envelope has exactly
    /// three children.
    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        Ok(Self {
            message_id: Self::message_id_of(packet)?,
            operation: Self::operation_of(packet)?.clone(),
            controls: Self::controls_of(packet)?,
        })
    }

    /// Borrow the protocolOp (child 1) of an envelope
    pub fn operation_of(packet: &Packet) -> LdapResult<&Packet> {
        required_child(packet, 1, "protocolOp")
    }

    /// Decode the controls of an envelope, empty unless there are exactly
    /// three children
    pub fn controls_of(packet: &Packet) -> LdapResult<Vec<Control>> {
        match packet.children() {
            [_, _, controls] => decode_controls(controls),
            _ => Ok(Vec::new()),
        }
    }

    /// Read only the message id (child 0) of an envelope
    pub fn message_id_of(packet: &Packet) -> LdapResult<MessageId> {
        if !packet.is_constructed() {
            return Err(LdapError::Asn1Decoding(
                "LDAP message is not a SEQUENCE".to_string(),
            ));
        }
        let raw = required_child(packet, 0, "messageID")?.as_integer()?;
        MessageId::try_from(raw)
            .ok()
            .filter(|id| *id >= 0)
            .ok_or_else(|| LdapError::Asn1Decoding(format!("Message id out of range: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{DeleteRequest, WriteOperation};

    #[test]
    fn test_envelope_without_controls_has_two_children() {
        let message = LdapMessage::new(1, DeleteRequest::new("cn=x").encode_operation());
        let packet = message.encode();
        assert_eq!(packet.children().len(), 2);
        assert_eq!(
            packet.encode(),
            vec![0x30, 0x09, 0x02, 0x01, 0x01, 0x4A, 0x04, b'c', b'n', b'=', b'x']
        );
    }

    #[test]
    fn test_envelope_controls_are_last_child() {
        let message = LdapMessage::new(7, DeleteRequest::new("cn=x").encode_operation())
            .with_controls(vec![Control::new("1.2.3").critical(true)]);
        let bytes = message.encode().encode();
        let decoded = LdapMessage::decode(&Packet::from_bytes(&bytes).unwrap()).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.operation_tag(), 10);
    }

    #[test]
    fn test_message_id_range() {
        let negative = Packet::sequence(vec![Packet::integer(-1), Packet::integer(0)]);
        assert!(LdapMessage::message_id_of(&negative).is_err());

        let too_big = Packet::sequence(vec![Packet::integer(i32::MAX as i64 + 1)]);
        assert!(LdapMessage::message_id_of(&too_big).is_err());

        let max = Packet::sequence(vec![Packet::integer(i32::MAX as i64)]);
        assert_eq!(LdapMessage::message_id_of(&max).unwrap(), i32::MAX);
    }

    #[test]
    fn test_envelope_missing_operation() {
        let packet = Packet::sequence(vec![Packet::integer(3)]);
        assert!(LdapMessage::decode(&packet).is_err());
    }

    #[test]
    fn test_malformed_controls_leave_operation_readable() {
        let packet = Packet::sequence(vec![
            Packet::integer(3),
            DeleteRequest::new("cn=x").encode_operation(),
            Packet::octet_string("not controls"),
        ]);
        assert!(LdapMessage::decode(&packet).is_err());
        assert!(LdapMessage::controls_of(&packet).is_err());
        assert_eq!(LdapMessage::message_id_of(&packet).unwrap(), 3);
        assert_eq!(LdapMessage::operation_of(&packet).unwrap().number(), 10);
    }
}
