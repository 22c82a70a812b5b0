//! Canonical (lower-case) FSPIOP header names.

/// Identity of the sending participant.
pub const SOURCE: &str = "fspiop-source";
/// Identity of the addressed participant.
pub const DESTINATION: &str = "fspiop-destination";
/// Verb declared for signature verification.
pub const HTTP_METHOD: &str = "fspiop-http-method";
/// Request URI declared for signature verification.
pub const URI: &str = "fspiop-uri";
/// Detached JWS signature.
pub const SIGNATURE: &str = "fspiop-signature";
/// Optional payload encryption marker, passed through untouched.
pub const ENCRYPTION: &str = "fspiop-encryption";
/// Standard `content-type` header.
pub const CONTENT_TYPE: &str = "content-type";
/// Standard `accept` header.
pub const ACCEPT: &str = "accept";
/// Standard `date` header.
pub const DATE: &str = "date";

/// W3C trace-context parent.
pub const TRACEPARENT: &str = "traceparent";
/// W3C trace-context vendor state.
pub const TRACESTATE: &str = "tracestate";

/// Headers outside the named FSPIOP set that survive onto an outbound hop.
///
/// Everything else an inbound request carried (`host`, `connection`,
/// `transfer-encoding`, `content-length` and the like) describes the
/// inbound connection and is dropped.
pub const FORWARDED: [&str; 3] = [ENCRYPTION, TRACEPARENT, TRACESTATE];

/// Returns `true` when an unnamed inbound header may be copied onto the
/// next hop.
///
/// # Examples
/// ```
/// use fspiop::headers;
///
/// assert!(headers::is_forwarded("FSPIOP-Encryption"));
/// assert!(headers::is_forwarded("traceparent"));
/// assert!(!headers::is_forwarded("host"));
/// assert!(!headers::is_forwarded("transfer-encoding"));
/// ```
#[must_use]
pub fn is_forwarded(name: &str) -> bool {
    FORWARDED
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("fspiop-encryption", true)]
    #[case("TraceParent", true)]
    #[case("tracestate", true)]
    #[case("host", false)]
    #[case("connection", false)]
    #[case("keep-alive", false)]
    #[case("transfer-encoding", false)]
    #[case("te", false)]
    #[case("upgrade", false)]
    #[case("content-length", false)]
    #[case("fspiop-signature", false)]
    fn only_listed_headers_are_forwarded(#[case] name: &str, #[case] forwarded: bool) {
        assert_eq!(is_forwarded(name), forwarded);
    }
}
