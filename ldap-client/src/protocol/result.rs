//! Result envelope of write responses
//!
//! ```text
//! LDAPResult ::= SEQUENCE {
//!      resultCode         ENUMERATED { ... },
//!      matchedDN          LDAPDN,
//!      diagnosticMessage  LDAPString,
//!      referral           [3] Referral OPTIONAL }
//! ```
//!
//! AddResponse, DelResponse, ModifyResponse and ModifyDNResponse are all
//! `[APPLICATION n] LDAPResult`.

use super::control::Control;
use super::required_child;
use ldap_asn1::ber::{TAG_ENUMERATED, TAG_INTEGER};
use ldap_asn1::{BerTag, BerTagClass, Packet};
use ldap_core::{LdapError, LdapResult, RESULT_CODE_SUCCESS};
use std::borrow::Cow;

/// Outcome reported by the server for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapResultEnvelope {
    pub result_code: i32,
    pub matched_dn: String,
    pub diagnostic_message: String,
}

impl LdapResultEnvelope {
    pub fn success() -> Self {
        Self {
            result_code: RESULT_CODE_SUCCESS,
            matched_dn: String::new(),
            diagnostic_message: String::new(),
        }
    }

    pub fn new(
        result_code: i32,
        matched_dn: impl Into<String>,
        diagnostic_message: impl Into<String>,
    ) -> Self {
        Self {
            result_code,
            matched_dn: matched_dn.into(),
            diagnostic_message: diagnostic_message.into(),
        }
    }

    /// Decode from a response protocolOp node
    ///
    /// # Error Handling
    /// Returns `Asn1Decoding` if any of the three leading children is missing
    /// or has the wrong shape. Text that is not valid UTF-8 is decoded lossily
    /// so the result code still reaches the caller.
    pub fn decode(operation: &Packet) -> LdapResult<Self> {
        let code = required_child(operation, 0, "resultCode")?;
        if !code.tag().matches(BerTagClass::Universal, TAG_ENUMERATED)
            && !code.tag().matches(BerTagClass::Universal, TAG_INTEGER)
        {
            return Err(LdapError::Asn1Decoding(format!(
                "resultCode has unexpected tag {:?} {}",
                code.class(),
                code.number()
            )));
        }
        let raw = code.as_integer()?;
        let result_code = i32::try_from(raw)
            .map_err(|_| LdapError::Asn1Decoding(format!("resultCode out of range: {}", raw)))?;
        let matched_dn = lossy_string(required_child(operation, 1, "matchedDN")?, "matchedDN")?;
        let diagnostic_message = lossy_string(
            required_child(operation, 2, "diagnosticMessage")?,
            "diagnosticMessage",
        )?;
        Ok(Self {
            result_code,
            matched_dn,
            diagnostic_message,
        })
    }

    /// Encode as a `[APPLICATION response_tag]` node
    pub fn encode(&self, response_tag: u32) -> Packet {
        Packet::constructed(
            BerTag::application(true, response_tag),
            vec![
                Packet::enumerated(self.result_code as i64),
                Packet::octet_string(&self.matched_dn),
                Packet::octet_string(&self.diagnostic_message),
            ],
        )
    }

    pub fn is_success(&self) -> bool {
        self.result_code == RESULT_CODE_SUCCESS
    }

    /// Map a non-zero code to a protocol error
    pub fn into_result(self) -> LdapResult<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(LdapError::protocol(
            self.result_code,
            self.diagnostic_message,
            self.matched_dn,
        ))
    }
}

fn lossy_string(packet: &Packet, what: &str) -> LdapResult<String> {
    if packet.is_constructed() {
        return Err(LdapError::Asn1Decoding(format!("{} is not a primitive string", what)));
    }
    let text = String::from_utf8_lossy(packet.value());
    if let Cow::Owned(_) = text {
        log::warn!("{} is not valid UTF-8, decoded lossily", what);
    }
    Ok(text.into_owned())
}

/// Successful outcome of a write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResponse {
    /// Response controls, in wire order
    pub controls: Vec<Control>,
}
