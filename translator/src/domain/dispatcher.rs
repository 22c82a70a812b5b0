//! Per-context event dispatcher.
//!
//! The dispatcher owns a [`ContextRules`] table and the shared translation
//! components. `dispatch` never fails: every outcome, including handler
//! failures turned into error feedback, is reported as a
//! [`DispatchOutcome`].

use std::ops::AddAssign;

use fspiop::codes;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::context::BoundedContext;
use crate::domain::direction::address;
use crate::domain::error::{StandardError, TranslationError};
use crate::domain::event::{DomainEvent, FspiopState, ProtocolExtras, ProtocolHeaders, ProtocolState};
use crate::domain::executor::{CallbackExecutor, OutboundCallback};
use crate::domain::feedback::{ErrorFeedbackSender, FeedbackReport, FeedbackRequest};
use crate::domain::payload_gate::PayloadGate;
use crate::domain::rules::{CallbackPlan, ContextRules, KindRule, PayloadFields, PlannedBody};

/// Why an event was dropped without feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The event carries no protocol state.
    NoProtocolState,
    /// The event came in over another protocol.
    UnsupportedProtocol,
    /// The FSPIOP state has no headers.
    MissingHeaders,
    /// The source header is blank, so nobody can be notified.
    BlankSource,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every planned callback was sent.
    Delivered { callbacks: usize },
    /// A bounded-context error event was reported to the participants.
    ErrorNotified { feedback: FeedbackReport },
    /// Translation failed and the failure was reported instead.
    Failed {
        code: &'static str,
        feedback: FeedbackReport,
    },
    /// No rule is registered for the kind.
    UnknownKind,
    /// The event was dropped without feedback.
    Dropped(DropReason),
}

/// Counts of outcomes across one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Events whose callbacks were sent.
    pub delivered: usize,
    /// Error events reported to participants.
    pub notified: usize,
    /// Events that failed and were turned into feedback.
    pub failed: usize,
    /// Events of unknown kinds.
    pub ignored: usize,
    /// Events dropped for lack of a usable protocol state.
    pub dropped: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Delivered { .. } => self.delivered += 1,
            DispatchOutcome::ErrorNotified { .. } => self.notified += 1,
            DispatchOutcome::Failed { .. } => self.failed += 1,
            DispatchOutcome::UnknownKind => self.ignored += 1,
            DispatchOutcome::Dropped(_) => self.dropped += 1,
        }
    }

    /// Number of events accounted for.
    pub const fn total(&self) -> usize {
        self.delivered + self.notified + self.failed + self.ignored + self.dropped
    }
}

impl AddAssign for BatchReport {
    fn add_assign(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.notified += other.notified;
        self.failed += other.failed;
        self.ignored += other.ignored;
        self.dropped += other.dropped;
    }
}

/// Shared components a dispatcher composes.
#[derive(Clone)]
pub struct DispatcherPorts {
    /// Callback delivery.
    pub executor: CallbackExecutor,
    /// Payload validation and shaping.
    pub gate: PayloadGate,
    /// Error feedback and escalation.
    pub feedback: ErrorFeedbackSender,
}

/// Translates events of one bounded context into callbacks.
#[derive(Clone)]
pub struct EventDispatcher {
    rules: ContextRules,
    ports: DispatcherPorts,
    hub_id: String,
}

struct Inbound<'a> {
    headers: &'a ProtocolHeaders,
    extras: &'a ProtocolExtras,
}

impl EventDispatcher {
    /// Dispatcher for `rules`, answering query responses as `hub_id`.
    pub fn new(rules: ContextRules, ports: DispatcherPorts, hub_id: impl Into<String>) -> Self {
        Self {
            rules,
            ports,
            hub_id: hub_id.into(),
        }
    }

    /// Bounded context served by this dispatcher.
    pub const fn context(&self) -> BoundedContext {
        self.rules.context()
    }

    /// Handle one event.
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchOutcome {
        let span = info_span!("dispatch", context = %self.context(), kind = %event.kind);
        self.dispatch_inner(event).instrument(span).await
    }

    /// Handle a batch strictly in delivery order.
    pub async fn dispatch_batch(&self, events: &[DomainEvent]) -> BatchReport {
        let mut report = BatchReport::default();
        for event in events {
            let outcome = self.dispatch(event).await;
            report.record(&outcome);
        }
        debug!(context = %self.context(), ?report, "batch dispatched");
        report
    }

    async fn dispatch_inner(&self, event: &DomainEvent) -> DispatchOutcome {
        let inbound = match inbound_of(event) {
            Ok(inbound) => inbound,
            Err(reason) => {
                warn!(?reason, "dropping event without usable protocol state");
                return DispatchOutcome::Dropped(reason);
            }
        };
        let Some(rule) = self.rules.rule(&event.kind) else {
            warn!("no rule registered for event kind; ignoring");
            return DispatchOutcome::UnknownKind;
        };

        match *rule {
            KindRule::ErrorNotification => self.notify_error(event, &inbound).await,
            KindRule::Callback { translate, .. } => {
                let result = match PayloadFields::read(&event.payload) {
                    Ok(fields) => match translate(&fields) {
                        Ok(plan) => self.execute(plan, event, &inbound).await,
                        Err(error) => Err(error),
                    },
                    Err(error) => Err(error),
                };
                match result {
                    Ok(callbacks) => {
                        info!(callbacks, "event translated");
                        DispatchOutcome::Delivered { callbacks }
                    }
                    Err(error) => self.report_failure(error, event, &inbound).await,
                }
            }
        }
    }

    async fn execute(
        &self,
        plan: CallbackPlan,
        event: &DomainEvent,
        inbound: &Inbound<'_>,
    ) -> Result<usize, TranslationError> {
        let mut next = Some(plan);
        let mut sent = 0;
        while let Some(plan) = next.take() {
            let CallbackPlan {
                direction,
                entity,
                segments,
                method,
                signing_method,
                body,
                follow_up,
            } = plan;
            let addressing = address(&direction, inbound.headers, &self.hub_id)?;
            let body = match body {
                PlannedBody::Empty => None,
                PlannedBody::Wire(shape) => {
                    Some(self.ports.gate.prepare(shape, &event.payload, inbound.extras)?)
                }
            };
            debug!(direction = direction.as_str(), fsp_id = %addressing.target_fsp_id, "delivering callback");
            self.ports
                .executor
                .deliver(OutboundCallback {
                    target_fsp_id: addressing.target_fsp_id,
                    entity,
                    segments,
                    error_path: addressing.error_path,
                    method,
                    signing_method,
                    headers: addressing.headers,
                    body,
                })
                .await?;
            sent += 1;
            next = follow_up.map(|plan| *plan);
        }
        Ok(sent)
    }

    async fn notify_error(&self, event: &DomainEvent, inbound: &Inbound<'_>) -> DispatchOutcome {
        let code = self.rules.errors().map(&event.kind);
        let Some(error) = self.standard_error(code, inbound.headers) else {
            return DispatchOutcome::Dropped(DropReason::BlankSource);
        };
        let error = error.with_destination(inbound.headers.destination_id().map(str::to_owned));
        let feedback = self.send_feedback(&error, event, inbound).await;
        DispatchOutcome::ErrorNotified { feedback }
    }

    async fn report_failure(
        &self,
        failure: TranslationError,
        event: &DomainEvent,
        inbound: &Inbound<'_>,
    ) -> DispatchOutcome {
        let code = failure.code();
        warn!(error = %failure, code, "event translation failed");
        let standard = self
            .rules
            .errors()
            .lookup(code)
            .unwrap_or(codes::GENERIC_SERVER_ERROR);
        let Some(error) = self.standard_error(standard, inbound.headers) else {
            return DispatchOutcome::Dropped(DropReason::BlankSource);
        };
        let feedback = self.send_feedback(&error, event, inbound).await;
        DispatchOutcome::Failed { code, feedback }
    }

    fn standard_error(
        &self,
        code: fspiop::ApiErrorCode,
        headers: &ProtocolHeaders,
    ) -> Option<StandardError> {
        match StandardError::try_new(code, headers.source.as_str()) {
            Ok(error) => Some(error),
            Err(error) => {
                warn!(%error, "cannot report failure without a source");
                None
            }
        }
    }

    async fn send_feedback(
        &self,
        error: &StandardError,
        event: &DomainEvent,
        inbound: &Inbound<'_>,
    ) -> FeedbackReport {
        let fields = PayloadFields::read(&event.payload).unwrap_or_default();
        let entity = self.rules.error_entity(&event.kind, inbound.headers);
        self.ports
            .feedback
            .send(FeedbackRequest {
                error,
                entity,
                segments: fields.segments(entity),
                inbound: inbound.headers,
                subject: self.rules.operator_subject(&fields),
            })
            .await
    }
}

fn inbound_of(event: &DomainEvent) -> Result<Inbound<'_>, DropReason> {
    let state: &FspiopState = match event.protocol_state.as_ref() {
        None => return Err(DropReason::NoProtocolState),
        Some(ProtocolState::Unsupported) => return Err(DropReason::UnsupportedProtocol),
        Some(ProtocolState::Fspiop(state)) => state,
    };
    let headers = state.headers.as_ref().ok_or(DropReason::MissingHeaders)?;
    if headers.has_blank_source() {
        return Err(DropReason::BlankSource);
    }
    Ok(Inbound {
        headers,
        extras: &state.extras,
    })
}
