//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each trait exposes typed errors so adapters map their failures into
//! predictable variants. Collaborators are shared as `Arc<dyn Port>`.

mod macros;
pub(crate) use macros::define_port_error;

mod callback_transport;
mod event_source;
mod message_signer;
mod operator_errors;
mod participant_directory;
mod payload_schema;

#[cfg(test)]
pub use callback_transport::MockCallbackTransport;
pub use callback_transport::{CallbackRequest, CallbackTransport, CallbackTransportError};
#[cfg(test)]
pub use event_source::MockEventBatchSource;
pub use event_source::{EventBatch, EventBatchSource, EventSourceError};
pub use message_signer::{MessageSigner, MessageSignerError};
#[cfg(test)]
pub use operator_errors::MockOperatorErrorPublisher;
pub use operator_errors::{
    OperatorErrorEvent, OperatorErrorPublishError, OperatorErrorPublisher, OperatorErrorSubject,
};
#[cfg(test)]
pub use participant_directory::MockParticipantDirectory;
pub use participant_directory::{
    FixtureParticipantDirectory, Participant, ParticipantDirectory, ParticipantDirectoryError,
    ParticipantEndpoint,
};
#[cfg(test)]
pub use payload_schema::MockPayloadSchema;
pub use payload_schema::{PayloadSchema, PayloadSchemaError};
