//! Attribute and PartialAttribute
//!
//! ```text
//! PartialAttribute ::= SEQUENCE {
//!      type       AttributeDescription,
//!      vals       SET OF value AttributeValue }
//! ```
//!
//! Add uses `Attribute` (at least one value), Modify uses `PartialAttribute`;
//! both have the same encoding.

use super::required_child;
use ldap_asn1::Packet;
use ldap_core::{LdapError, LdapResult};

/// An attribute type with its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub attr_type: String,
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new<T, I, V>(attr_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            attr_type: attr_type.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn encode(&self) -> Packet {
        let values = self.values.iter().map(Packet::octet_string).collect();
        Packet::sequence(vec![
            Packet::octet_string(&self.attr_type),
            Packet::set(values),
        ])
    }

    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        let attr_type = required_child(packet, 0, "attribute type")?.as_string()?;
        let set = required_child(packet, 1, "attribute values")?;
        if !set.is_constructed() {
            return Err(LdapError::Asn1Decoding(format!(
                "Values of attribute {} are not a SET",
                attr_type
            )));
        }
        let values = set
            .children()
            .iter()
            .map(Packet::as_string)
            .collect::<LdapResult<Vec<_>>>()?;
        Ok(Self { attr_type, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_encoding() {
        let attribute = Attribute::new("cn", ["x"]);
        assert_eq!(
            attribute.encode().encode(),
            vec![0x30, 0x09, 0x04, 0x02, b'c', b'n', 0x31, 0x03, 0x04, 0x01, b'x']
        );
    }

    #[test]
    fn test_attribute_without_values() {
        let attribute = Attribute::new("description", Vec::<String>::new());
        let packet = attribute.encode();
        assert!(packet.child(1).unwrap().children().is_empty());
        assert_eq!(Attribute::decode(&packet).unwrap(), attribute);
    }

    #[test]
    fn test_attribute_decode_keeps_value_order() {
        let attribute = Attribute::new("objectClass", ["top", "person", "inetOrgPerson"]);
        let decoded = Attribute::decode(&attribute.encode()).unwrap();
        assert_eq!(decoded.values, vec!["top", "person", "inetOrgPerson"]);
    }

    #[test]
    fn test_attribute_decode_missing_values() {
        let packet = Packet::sequence(vec![Packet::octet_string("cn")]);
        assert!(Attribute::decode(&packet).is_err());
    }
}
