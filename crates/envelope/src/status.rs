//! Canonical reason phrases for HTTP status codes.
//!
//! The table is the one envelope producers already emit, so a code written
//! by one side always carries the same `status_text` on the other. It is
//! built once on first use and never mutated afterwards.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Status code used by a freshly created envelope.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

const STATUS_REASONS: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (208, "Already Reported"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Request Entity Too Large"),
    (414, "Request URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Requested Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

static STATUS_TEXT: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| STATUS_REASONS.iter().copied().collect());

/// Returns the canonical reason phrase for `status_code`.
///
/// Codes without a registered phrase map to the empty string rather than an
/// error, so any integer can still be carried by an envelope.
///
/// # Example
///
/// ```
/// use micro_envelope::status_text;
///
/// assert_eq!(status_text(404), "Not Found");
/// assert_eq!(status_text(299), "");
/// ```
pub fn status_text(status_code: u16) -> &'static str {
    STATUS_TEXT.get(&status_code).copied().unwrap_or_default()
}
