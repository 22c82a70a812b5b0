//! HTTP verbs used by FSPIOP callbacks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verb of an outbound callback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`, used to forward lookups.
    Get,
    /// `POST`, used to forward creations.
    Post,
    /// `PUT`, used for callbacks carrying results or errors.
    Put,
    /// `PATCH`, used for payee commit notifications.
    Patch,
}

impl HttpMethod {
    /// Upper-case verb as it appears on the wire and in signatures.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        }
    }

    /// Whether a request with this verb carries a JSON body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
