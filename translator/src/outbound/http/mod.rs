//! Reqwest-backed HTTP adapters.
//!
//! This module provides the callback transport and the shared status and
//! error mapping used by every adapter that talks HTTP.

mod transport;

pub use transport::ReqwestCallbackTransport;

use reqwest::StatusCode;

/// Compact, length-limited rendering of a response body for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// `status N` or `status N: preview`.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn preview_collapses_whitespace() {
        assert_eq!(body_preview(b"  {\n  \"a\": 1\n}  "), "{ \"a\": 1 }");
    }

    #[rstest]
    fn preview_is_truncated() {
        let body = "x".repeat(200);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    #[case(b"".as_slice(), "status 502")]
    #[case(b"bad gateway".as_slice(), "status 502: bad gateway")]
    fn status_message_includes_preview_when_present(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(status_message(StatusCode::BAD_GATEWAY, body), expected);
    }
}
