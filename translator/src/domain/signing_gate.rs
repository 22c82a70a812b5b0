//! Optional signing of outbound callbacks.

use std::sync::Arc;

use fspiop::HttpMethod;
use serde_json::Value;

use crate::domain::error::TranslationError;
use crate::domain::event::ProtocolHeaders;
use crate::domain::ports::MessageSigner;

/// Signs callbacks when a signer is configured; otherwise passes headers
/// through untouched.
#[derive(Clone, Default)]
pub struct SigningGate {
    signer: Option<Arc<dyn MessageSigner>>,
}

impl SigningGate {
    /// Gate that signs with `signer`, or does nothing when `None`.
    pub fn new(signer: Option<Arc<dyn MessageSigner>>) -> Self {
        Self { signer }
    }

    /// Gate that never signs.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether callbacks are signed.
    pub fn is_enabled(&self) -> bool {
        self.signer.is_some()
    }

    /// Declare `signing_method` and `uri`, then attach a signature.
    ///
    /// The declared method can differ from the HTTP verb: a `PATCH`
    /// notification is signed with `PUT` semantics.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Signing`] when the signer fails. The
    /// callback must not be sent unsigned in that case.
    pub fn maybe_sign(
        &self,
        mut headers: ProtocolHeaders,
        signing_method: HttpMethod,
        uri: &str,
        body: Option<&Value>,
    ) -> Result<ProtocolHeaders, TranslationError> {
        let Some(signer) = self.signer.as_ref() else {
            return Ok(headers);
        };
        headers.http_method = Some(signing_method.as_str().to_owned());
        headers.uri = Some(uri.to_owned());
        let signature = signer
            .sign(&headers, body)
            .map_err(|error| TranslationError::signing(error.to_string()))?;
        headers.signature = Some(signature);
        Ok(headers)
    }
}
