//! Translation core.
//!
//! Purpose: turn bounded-context domain events into FSPIOP callbacks, or
//! into standard error callbacks when translation fails. Everything here is
//! independent of transports; collaborators are reached through [`ports`].
//!
//! Public surface:
//! - [`EventDispatcher`]: one per bounded context, built by
//!   [`wire_dispatcher`].
//! - [`address`] and [`Direction`]: the header-direction engine.
//! - [`ErrorTable`]: static error mapping per context.
//! - [`CallbackExecutor`], [`ErrorFeedbackSender`], [`PayloadGate`],
//!   [`SigningGate`], [`EndpointResolver`]: the shared pipeline stages.

pub mod context;
pub mod direction;
pub mod dispatcher;
pub mod endpoint_resolver;
pub mod error;
pub mod error_mapping;
pub mod event;
pub mod executor;
pub mod feedback;
pub mod payload_gate;
pub mod ports;
pub mod rules;
pub mod signing_gate;
pub mod wiring;

pub use self::context::{BoundedContext, WiringError, parse_contexts};
pub use self::direction::{Addressing, Direction, address};
pub use self::dispatcher::{
    BatchReport, DispatchOutcome, DispatcherPorts, DropReason, EventDispatcher,
};
pub use self::endpoint_resolver::{EndpointResolver, ResolveError};
pub use self::error::{StandardError, StandardErrorValidationError, TranslationError};
pub use self::error_mapping::{
    ACCOUNT_LOOKUP_ERRORS, ErrorMappingEntry, ErrorTable, QUOTING_ERRORS, TRANSFERS_ERRORS,
};
pub use self::event::{DomainEvent, FspiopState, ProtocolExtras, ProtocolHeaders, ProtocolState};
pub use self::executor::{CallbackExecutor, CallbackExecutorPorts, OutboundCallback};
pub use self::feedback::{ErrorFeedbackSender, FeedbackReport, FeedbackRequest};
pub use self::payload_gate::{PayloadGate, WireShape};
pub use self::rules::{CallbackPlan, ContextRules, KindRule, PayloadFields, PlannedBody};
pub use self::signing_gate::SigningGate;
pub use self::wiring::{TranslatorOptions, TranslatorPorts, wire_dispatcher, wire_dispatchers};
