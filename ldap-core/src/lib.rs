//! Core types and utilities for the LDAP write-path client
//!
//! This crate provides the error type and the result-code table shared by
//! every layer of the workspace.

pub mod error;
pub mod result_code;

pub use error::{LdapError, LdapResult};
pub use result_code::{
    result_code_name, RESULT_CODE_INVALID_REQUEST, RESULT_CODE_NETWORK_ERROR, RESULT_CODE_SUCCESS,
    RESULT_CODE_UNEXPECTED_RESPONSE,
};
