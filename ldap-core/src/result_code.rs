//! LDAP result codes (RFC 4511, section 4.1.9)

pub const RESULT_CODE_SUCCESS: i32 = 0;
pub const RESULT_CODE_OPERATIONS_ERROR: i32 = 1;
pub const RESULT_CODE_PROTOCOL_ERROR: i32 = 2;
pub const RESULT_CODE_TIME_LIMIT_EXCEEDED: i32 = 3;
pub const RESULT_CODE_SIZE_LIMIT_EXCEEDED: i32 = 4;
pub const RESULT_CODE_COMPARE_FALSE: i32 = 5;
pub const RESULT_CODE_COMPARE_TRUE: i32 = 6;
pub const RESULT_CODE_AUTH_METHOD_NOT_SUPPORTED: i32 = 7;
pub const RESULT_CODE_STRONG_AUTH_REQUIRED: i32 = 8;
pub const RESULT_CODE_REFERRAL: i32 = 10;
pub const RESULT_CODE_ADMIN_LIMIT_EXCEEDED: i32 = 11;
pub const RESULT_CODE_UNAVAILABLE_CRITICAL_EXTENSION: i32 = 12;
pub const RESULT_CODE_CONFIDENTIALITY_REQUIRED: i32 = 13;
pub const RESULT_CODE_SASL_BIND_IN_PROGRESS: i32 = 14;
pub const RESULT_CODE_NO_SUCH_ATTRIBUTE: i32 = 16;
pub const RESULT_CODE_UNDEFINED_ATTRIBUTE_TYPE: i32 = 17;
pub const RESULT_CODE_INAPPROPRIATE_MATCHING: i32 = 18;
pub const RESULT_CODE_CONSTRAINT_VIOLATION: i32 = 19;
pub const RESULT_CODE_ATTRIBUTE_OR_VALUE_EXISTS: i32 = 20;
pub const RESULT_CODE_INVALID_ATTRIBUTE_SYNTAX: i32 = 21;
pub const RESULT_CODE_NO_SUCH_OBJECT: i32 = 32;
pub const RESULT_CODE_ALIAS_PROBLEM: i32 = 33;
pub const RESULT_CODE_INVALID_DN_SYNTAX: i32 = 34;
pub const RESULT_CODE_ALIAS_DEREFERENCING_PROBLEM: i32 = 36;
pub const RESULT_CODE_INAPPROPRIATE_AUTHENTICATION: i32 = 48;
pub const RESULT_CODE_INVALID_CREDENTIALS: i32 = 49;
pub const RESULT_CODE_INSUFFICIENT_ACCESS_RIGHTS: i32 = 50;
pub const RESULT_CODE_BUSY: i32 = 51;
pub const RESULT_CODE_UNAVAILABLE: i32 = 52;
pub const RESULT_CODE_UNWILLING_TO_PERFORM: i32 = 53;
pub const RESULT_CODE_LOOP_DETECT: i32 = 54;
pub const RESULT_CODE_NAMING_VIOLATION: i32 = 64;
pub const RESULT_CODE_OBJECT_CLASS_VIOLATION: i32 = 65;
pub const RESULT_CODE_NOT_ALLOWED_ON_NON_LEAF: i32 = 66;
pub const RESULT_CODE_NOT_ALLOWED_ON_RDN: i32 = 67;
pub const RESULT_CODE_ENTRY_ALREADY_EXISTS: i32 = 68;
pub const RESULT_CODE_OBJECT_CLASS_MODS_PROHIBITED: i32 = 69;
pub const RESULT_CODE_AFFECTS_MULTIPLE_DSAS: i32 = 71;
pub const RESULT_CODE_OTHER: i32 = 80;

/// Client-side code for failures that never reached the server
///
/// Lies outside the range the protocol assigns, so it cannot collide with a
/// server-sent code.
pub const RESULT_CODE_NETWORK_ERROR: i32 = 200;

/// Client-side code for a response that could not be decoded
pub const RESULT_CODE_UNEXPECTED_RESPONSE: i32 = 205;

/// Client-side code for a request rejected before it was sent
pub const RESULT_CODE_INVALID_REQUEST: i32 = 207;

/// Human-readable name of a result code
pub fn result_code_name(code: i32) -> &'static str {
    match code {
        RESULT_CODE_SUCCESS => "Success",
        RESULT_CODE_OPERATIONS_ERROR => "Operations Error",
        RESULT_CODE_PROTOCOL_ERROR => "Protocol Error",
        RESULT_CODE_TIME_LIMIT_EXCEEDED => "Time Limit Exceeded",
        RESULT_CODE_SIZE_LIMIT_EXCEEDED => "Size Limit Exceeded",
        RESULT_CODE_COMPARE_FALSE => "Compare False",
        RESULT_CODE_COMPARE_TRUE => "Compare True",
        RESULT_CODE_AUTH_METHOD_NOT_SUPPORTED => "Auth Method Not Supported",
        RESULT_CODE_STRONG_AUTH_REQUIRED => "Strong Auth Required",
        RESULT_CODE_REFERRAL => "Referral",
        RESULT_CODE_ADMIN_LIMIT_EXCEEDED => "Admin Limit Exceeded",
        RESULT_CODE_UNAVAILABLE_CRITICAL_EXTENSION => "Unavailable Critical Extension",
        RESULT_CODE_CONFIDENTIALITY_REQUIRED => "Confidentiality Required",
        RESULT_CODE_SASL_BIND_IN_PROGRESS => "Sasl Bind In Progress",
        RESULT_CODE_NO_SUCH_ATTRIBUTE => "No Such Attribute",
        RESULT_CODE_UNDEFINED_ATTRIBUTE_TYPE => "Undefined Attribute Type",
        RESULT_CODE_INAPPROPRIATE_MATCHING => "Inappropriate Matching",
        RESULT_CODE_CONSTRAINT_VIOLATION => "Constraint Violation",
        RESULT_CODE_ATTRIBUTE_OR_VALUE_EXISTS => "Attribute Or Value Exists",
        RESULT_CODE_INVALID_ATTRIBUTE_SYNTAX => "Invalid Attribute Syntax",
        RESULT_CODE_NO_SUCH_OBJECT => "No Such Object",
        RESULT_CODE_ALIAS_PROBLEM => "Alias Problem",
        RESULT_CODE_INVALID_DN_SYNTAX => "Invalid DN Syntax",
        RESULT_CODE_ALIAS_DEREFERENCING_PROBLEM => "Alias Dereferencing Problem",
        RESULT_CODE_INAPPROPRIATE_AUTHENTICATION => "Inappropriate Authentication",
        RESULT_CODE_INVALID_CREDENTIALS => "Invalid Credentials",
        RESULT_CODE_INSUFFICIENT_ACCESS_RIGHTS => "Insufficient Access Rights",
        RESULT_CODE_BUSY => "Busy",
        RESULT_CODE_UNAVAILABLE => "Unavailable",
        RESULT_CODE_UNWILLING_TO_PERFORM => "Unwilling To Perform",
        RESULT_CODE_LOOP_DETECT => "Loop Detect",
        RESULT_CODE_NAMING_VIOLATION => "Naming Violation",
        RESULT_CODE_OBJECT_CLASS_VIOLATION => "Object Class Violation",
        RESULT_CODE_NOT_ALLOWED_ON_NON_LEAF => "Not Allowed On Non Leaf",
        RESULT_CODE_NOT_ALLOWED_ON_RDN => "Not Allowed On RDN",
        RESULT_CODE_ENTRY_ALREADY_EXISTS => "Entry Already Exists",
        RESULT_CODE_OBJECT_CLASS_MODS_PROHIBITED => "Object Class Mods Prohibited",
        RESULT_CODE_AFFECTS_MULTIPLE_DSAS => "Affects Multiple DSAs",
        RESULT_CODE_OTHER => "Other",
        RESULT_CODE_NETWORK_ERROR => "Network Error",
        RESULT_CODE_UNEXPECTED_RESPONSE => "Unexpected Response",
        RESULT_CODE_INVALID_REQUEST => "Invalid Request",
        _ => "Unknown",
    }
}
