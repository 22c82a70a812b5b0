//! Driven port producing message signatures for outbound callbacks.

use serde_json::Value;

use super::define_port_error;
use crate::domain::event::ProtocolHeaders;

define_port_error! {
    /// Errors raised by signer adapters.
    pub enum MessageSignerError {
        /// The signature could not be computed.
        Failed { message: String } => "message signing failed: {message}",
    }
}

/// Computes the `fspiop-signature` value over a header set and body.
pub trait MessageSigner: Send + Sync {
    /// Sign `headers` and the optional `body`, returning the header value.
    fn sign(
        &self,
        headers: &ProtocolHeaders,
        body: Option<&Value>,
    ) -> Result<String, MessageSignerError>;
}
