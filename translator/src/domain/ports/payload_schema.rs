//! Driven port for wire-schema validation and shape transformation.

use serde_json::Value;

use super::define_port_error;
use crate::domain::event::ProtocolExtras;
use crate::domain::payload_gate::WireShape;

define_port_error! {
    /// Errors raised by payload schema adapters.
    pub enum PayloadSchemaError {
        /// The payload does not satisfy the wire schema.
        Invalid { message: String } => "payload is invalid: {message}",
        /// A valid payload could not be mapped to the wire shape.
        Transform { message: String } => "payload transform failed: {message}",
    }
}

/// Validates domain payloads and maps them to wire shapes.
///
/// Both operations are CPU-bound and synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait PayloadSchema: Send + Sync {
    /// Check `payload` (and any extras it relies on) against `shape`.
    fn validate(
        &self,
        shape: WireShape,
        payload: &Value,
        extras: &ProtocolExtras,
    ) -> Result<(), PayloadSchemaError>;

    /// Map a validated payload to the wire body for `shape`.
    fn transform(
        &self,
        shape: WireShape,
        payload: &Value,
        extras: &ProtocolExtras,
    ) -> Result<Value, PayloadSchemaError>;
}
