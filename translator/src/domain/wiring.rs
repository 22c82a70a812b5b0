//! Composition of dispatchers from ports.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::context::{BoundedContext, WiringError, parse_contexts};
use crate::domain::dispatcher::{DispatcherPorts, EventDispatcher};
use crate::domain::endpoint_resolver::EndpointResolver;
use crate::domain::executor::{CallbackExecutor, CallbackExecutorPorts};
use crate::domain::feedback::ErrorFeedbackSender;
use crate::domain::payload_gate::PayloadGate;
use crate::domain::ports::{
    CallbackTransport, MessageSigner, OperatorErrorPublisher, ParticipantDirectory, PayloadSchema,
};
use crate::domain::rules::ContextRules;
use crate::domain::signing_gate::SigningGate;

/// Adapters shared by every dispatcher.
#[derive(Clone)]
pub struct TranslatorPorts {
    /// Participant directory.
    pub directory: Arc<dyn ParticipantDirectory>,
    /// Wire schema.
    pub schema: Arc<dyn PayloadSchema>,
    /// Signer; `None` disables signing.
    pub signer: Option<Arc<dyn MessageSigner>>,
    /// HTTP delivery.
    pub transport: Arc<dyn CallbackTransport>,
    /// Escalation topic.
    pub publisher: Arc<dyn OperatorErrorPublisher>,
    /// Clock for `date` headers.
    pub clock: Arc<dyn Clock>,
}

/// Identity and protocol settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Canonical identity of the switch.
    pub hub_id: String,
    /// FSPIOP API version used in content types.
    pub protocol_version: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            hub_id: "hub".to_owned(),
            protocol_version: fspiop::DEFAULT_PROTOCOL_VERSION.to_owned(),
        }
    }
}

/// Build the dispatcher for one bounded context.
pub fn wire_dispatcher(
    ports: &TranslatorPorts,
    options: &TranslatorOptions,
    context: BoundedContext,
) -> EventDispatcher {
    let executor = CallbackExecutor::new(
        CallbackExecutorPorts {
            resolver: EndpointResolver::new(Arc::clone(&ports.directory)),
            transport: Arc::clone(&ports.transport),
            signing: SigningGate::new(ports.signer.clone()),
            clock: Arc::clone(&ports.clock),
        },
        options.protocol_version.clone(),
    );
    let feedback = ErrorFeedbackSender::new(executor.clone(), Arc::clone(&ports.publisher));
    EventDispatcher::new(
        ContextRules::for_context(context),
        DispatcherPorts {
            executor,
            gate: PayloadGate::new(Arc::clone(&ports.schema)),
            feedback,
        },
        options.hub_id.clone(),
    )
}

/// Build one dispatcher per context named in a comma-separated list.
///
/// # Errors
///
/// Returns [`WiringError`] when the list is empty or names a context this
/// translator does not handle. Nothing is built in that case.
pub fn wire_dispatchers(
    ports: &TranslatorPorts,
    options: &TranslatorOptions,
    contexts: &str,
) -> Result<Vec<EventDispatcher>, WiringError> {
    Ok(parse_contexts(contexts)?
        .into_iter()
        .map(|context| wire_dispatcher(ports, options, context))
        .collect())
}
