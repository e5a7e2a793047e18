//! LDAP write-path PDU codec
//!
//! Request types encode themselves into [`Packet`] trees and can be decoded
//! back from them. The message envelope, controls and the result envelope of
//! responses live in their own modules.
//!
//! # Wire Format (RFC 4511)
//!
//! ```text
//! LDAPMessage ::= SEQUENCE {
//!      messageID       MessageID,
//!      protocolOp      CHOICE { ... },
//!      controls        [0] Controls OPTIONAL }
//! ```
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | Modify    | `[APPLICATION 6]`  | `[APPLICATION 7]`  |
//! | Add       | `[APPLICATION 8]`  | `[APPLICATION 9]`  |
//! | Delete    | `[APPLICATION 10]` | `[APPLICATION 11]` |
//! | ModifyDN  | `[APPLICATION 12]` | `[APPLICATION 13]` |

pub mod add;
pub mod attribute;
pub mod control;
pub mod delete;
pub mod envelope;
pub mod modify;
pub mod modify_dn;
pub mod result;

pub use add::AddRequest;
pub use attribute::Attribute;
pub use control::{decode_controls, encode_controls, Control};
pub use delete::DeleteRequest;
pub use envelope::{LdapMessage, MessageId};
pub use modify::{Change, ModifyOperation, ModifyRequest};
pub use modify_dn::ModifyDnRequest;
pub use result::{LdapResultEnvelope, WriteResponse};

use ldap_asn1::{BerTagClass, Packet};
use ldap_core::{LdapError, LdapResult};

pub const APPLICATION_MODIFY_REQUEST: u32 = 6;
pub const APPLICATION_MODIFY_RESPONSE: u32 = 7;
pub const APPLICATION_ADD_REQUEST: u32 = 8;
pub const APPLICATION_ADD_RESPONSE: u32 = 9;
pub const APPLICATION_DEL_REQUEST: u32 = 10;
pub const APPLICATION_DEL_RESPONSE: u32 = 11;
pub const APPLICATION_MODIFY_DN_REQUEST: u32 = 12;
pub const APPLICATION_MODIFY_DN_RESPONSE: u32 = 13;

/// `[0]` context tag of the envelope's controls
pub const CONTEXT_CONTROLS: u32 = 0;
/// `[0]` context tag of ModifyDN's newSuperior
pub const CONTEXT_NEW_SUPERIOR: u32 = 0;

/// Human-readable name of an application tag, for log lines
pub fn application_tag_name(tag: u32) -> &'static str {
    match tag {
        APPLICATION_MODIFY_REQUEST => "Modify Request",
        APPLICATION_MODIFY_RESPONSE => "Modify Response",
        APPLICATION_ADD_REQUEST => "Add Request",
        APPLICATION_ADD_RESPONSE => "Add Response",
        APPLICATION_DEL_REQUEST => "Delete Request",
        APPLICATION_DEL_RESPONSE => "Delete Response",
        APPLICATION_MODIFY_DN_REQUEST => "Modify DN Request",
        APPLICATION_MODIFY_DN_RESPONSE => "Modify DN Response",
        _ => "Unknown",
    }
}

/// A write operation the connection can execute
///
/// Implemented by the four request types. The connection drives every
/// operation through the same request/response template using these hooks.
pub trait WriteOperation: Send + Sync {
    /// Operation name used in logs and errors
    fn name(&self) -> &'static str;

    /// Target entry DN
    fn dn(&self) -> &str;

    /// Application tag the server answers with
    fn response_tag(&self) -> u32;

    /// Request controls, in wire order
    fn controls(&self) -> &[Control];

    /// Encode the protocolOp node (without envelope)
    fn encode_operation(&self) -> Packet;

    /// Check the request before anything is sent
    fn validate(&self) -> LdapResult<()> {
        if self.dn().is_empty() {
            return Err(LdapError::InvalidData(format!(
                "{} request requires a non-empty DN",
                self.name()
            )));
        }
        Ok(())
    }
}

pub(crate) fn expect_application(packet: &Packet, number: u32, what: &str) -> LdapResult<()> {
    if !packet.tag().matches(BerTagClass::Application, number) {
        return Err(LdapError::Asn1Decoding(format!(
            "Expected {} [APPLICATION {}], got {:?} {}",
            what,
            number,
            packet.class(),
            packet.number()
        )));
    }
    Ok(())
}

pub(crate) fn required_child<'a>(packet: &'a Packet, index: usize, what: &str) -> LdapResult<&'a Packet> {
    packet.child(index).ok_or_else(|| {
        LdapError::Asn1Decoding(format!(
            "Missing {} (child {} of {})",
            what,
            index,
            packet.children().len()
        ))
    })
}
