//! Modify operation
//!
//! ```text
//! ModifyRequest ::= [APPLICATION 6] SEQUENCE {
//!      object          LDAPDN,
//!      changes         SEQUENCE OF change SEQUENCE {
//!           operation       ENUMERATED {
//!                add     (0),
//!                delete  (1),
//!                replace (2),
//!                ...  },
//!           modification    PartialAttribute } }
//! ```

use super::{
    expect_application, required_child, Attribute, Control, WriteOperation,
    APPLICATION_MODIFY_REQUEST, APPLICATION_MODIFY_RESPONSE,
};
use ldap_asn1::{BerTag, Packet};
use ldap_core::{LdapError, LdapResult};

/// Kind of change applied to one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifyOperation {
    Add,
    Delete,
    Replace,
}

impl ModifyOperation {
    pub fn code(self) -> i64 {
        match self {
            ModifyOperation::Add => 0,
            ModifyOperation::Delete => 1,
            ModifyOperation::Replace => 2,
        }
    }

    pub fn from_code(code: i64) -> LdapResult<Self> {
        match code {
            0 => Ok(ModifyOperation::Add),
            1 => Ok(ModifyOperation::Delete),
            2 => Ok(ModifyOperation::Replace),
            other => Err(LdapError::Asn1Decoding(format!(
                "Unknown modify operation: {}",
                other
            ))),
        }
    }
}

/// One change of a Modify request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub operation: ModifyOperation,
    pub modification: Attribute,
}

impl Change {
    pub fn encode(&self) -> Packet {
        Packet::sequence(vec![
            Packet::enumerated(self.operation.code()),
            self.modification.encode(),
        ])
    }

    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        let operation =
            ModifyOperation::from_code(required_child(packet, 0, "change operation")?.as_integer()?)?;
        let modification = Attribute::decode(required_child(packet, 1, "modification")?)?;
        Ok(Self {
            operation,
            modification,
        })
    }
}

/// Request to change attributes of an existing entry
///
/// Changes are applied by the server in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRequest {
    pub dn: String,
    pub changes: Vec<Change>,
    pub controls: Vec<Control>,
}

impl ModifyRequest {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            changes: Vec::new(),
            controls: Vec::new(),
        }
    }

    fn change<T, I, V>(mut self, operation: ModifyOperation, attr_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.changes.push(Change {
            operation,
            modification: Attribute::new(attr_type, values),
        });
        self
    }

    /// Add values to an attribute, creating it if needed
    pub fn add<T, I, V>(self, attr_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.change(ModifyOperation::Add, attr_type, values)
    }

    /// Delete values; no values deletes the whole attribute
    pub fn delete<T, I, V>(self, attr_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.change(ModifyOperation::Delete, attr_type, values)
    }

    /// Replace all values; no values deletes the attribute if present
    pub fn replace<T, I, V>(self, attr_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.change(ModifyOperation::Replace, attr_type, values)
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn decode(packet: &Packet) -> LdapResult<Self> {
        expect_application(packet, APPLICATION_MODIFY_REQUEST, "Modify Request")?;
        let dn = required_child(packet, 0, "object DN")?.as_string()?;
        let changes = required_child(packet, 1, "changes")?
            .children()
            .iter()
            .map(Change::decode)
            .collect::<LdapResult<Vec<_>>>()?;
        Ok(Self {
            dn,
            changes,
            controls: Vec::new(),
        })
    }
}

impl WriteOperation for ModifyRequest {
    fn name(&self) -> &'static str {
        "Modify"
    }

    fn dn(&self) -> &str {
        &self.dn
    }

    fn response_tag(&self) -> u32 {
        APPLICATION_MODIFY_RESPONSE
    }

    fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn encode_operation(&self) -> Packet {
        Packet::constructed(
            BerTag::application(true, APPLICATION_MODIFY_REQUEST),
            vec![
                Packet::octet_string(&self.dn),
                Packet::sequence(self.changes.iter().map(Change::encode).collect()),
            ],
        )
    }
}
