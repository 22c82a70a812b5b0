//! Two-tier error feedback.
//!
//! Tier one sends the standard error to every affected participant. When
//! that fails for a participant, tier two publishes an operator-error event
//! so the failure is never silently lost.

use std::sync::Arc;

use fspiop::{EntityCategory, HttpMethod};
use tracing::{error, info, warn};

use crate::domain::error::StandardError;
use crate::domain::event::ProtocolHeaders;
use crate::domain::executor::{CallbackExecutor, OutboundCallback};
use crate::domain::ports::{OperatorErrorEvent, OperatorErrorPublisher, OperatorErrorSubject};

/// What an error feedback attempt achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackReport {
    /// Participants that received the error callback.
    pub delivered: usize,
    /// Participants escalated to operators instead.
    pub escalated: usize,
}

/// Failure to report, addressed at one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest<'a> {
    /// Error to deliver.
    pub error: &'a StandardError,
    /// Resource family of the failed request.
    pub entity: EntityCategory,
    /// Path segments of the failed resource.
    pub segments: Vec<Option<String>>,
    /// Headers of the inbound request; pass-through headers are kept.
    pub inbound: &'a ProtocolHeaders,
    /// Identifiers used if escalation is needed.
    pub subject: OperatorErrorSubject,
}

/// Sends standard errors to participants and escalates what cannot be sent.
#[derive(Clone)]
pub struct ErrorFeedbackSender {
    executor: CallbackExecutor,
    publisher: Arc<dyn OperatorErrorPublisher>,
}

impl ErrorFeedbackSender {
    /// Sender delivering through `executor` and escalating to `publisher`.
    pub fn new(executor: CallbackExecutor, publisher: Arc<dyn OperatorErrorPublisher>) -> Self {
        Self {
            executor,
            publisher,
        }
    }

    /// Report `request.error` to its source and, when known, destination.
    ///
    /// Never fails: delivery failures are escalated and escalation failures
    /// are logged.
    pub async fn send(&self, request: FeedbackRequest<'_>) -> FeedbackReport {
        let FeedbackRequest {
            error,
            entity,
            segments,
            inbound,
            subject,
        } = request;

        let mut headers = inbound.for_outbound_hop();
        headers.source = error.source_fsp_id().to_owned();
        headers.destination = error.destination_fsp_id().map(str::to_owned);
        let body = Some(error.to_information().to_body());

        let mut report = FeedbackReport::default();
        for fsp_id in error.recipients() {
            let callback = OutboundCallback {
                target_fsp_id: fsp_id.to_owned(),
                entity,
                segments: segments.clone(),
                error_path: true,
                method: HttpMethod::Put,
                signing_method: HttpMethod::Put,
                headers: headers.clone(),
                body: body.clone(),
            };
            match self.executor.deliver(callback).await {
                Ok(()) => {
                    info!(fsp_id, error_code = error.code().code, "error callback delivered");
                    report.delivered += 1;
                }
                Err(failure) => {
                    warn!(
                        fsp_id,
                        error_code = error.code().code,
                        error = %failure,
                        "error callback failed; escalating to operators"
                    );
                    self.escalate(OperatorErrorEvent {
                        subject: subject.clone(),
                        fsp_id: fsp_id.to_owned(),
                        error_code: error.code().code.to_owned(),
                        description: failure.to_string(),
                    })
                    .await;
                    report.escalated += 1;
                }
            }
        }
        report
    }

    async fn escalate(&self, event: OperatorErrorEvent) {
        let fsp_id = event.fsp_id.clone();
        if let Err(publish_error) = self.publisher.publish(event).await {
            error!(fsp_id, error = %publish_error, "operator error event could not be published");
        }
    }
}

#[cfg(test)]
mod tests {
    use fspiop::codes;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::endpoint_resolver::EndpointResolver;
    use crate::domain::executor::CallbackExecutorPorts;
    use crate::domain::ports::{
        FixtureParticipantDirectory, MockOperatorErrorPublisher, OperatorErrorPublishError,
    };
    use crate::domain::signing_gate::SigningGate;
    use crate::test_support::{FixedClock, RecordingTransport};

    #[fixture]
    fn transport() -> Arc<RecordingTransport> {
        Arc::new(RecordingTransport::default())
    }

    fn sender(
        transport: Arc<RecordingTransport>,
        publisher: MockOperatorErrorPublisher,
    ) -> ErrorFeedbackSender {
        let directory = FixtureParticipantDirectory::default()
            .with_fspiop_endpoint("bankA", "http://bankA.example");
        let executor = CallbackExecutor::new(
            CallbackExecutorPorts {
                resolver: EndpointResolver::new(Arc::new(directory)),
                transport,
                signing: SigningGate::disabled(),
                clock: Arc::new(FixedClock::default()),
            },
            "1.1",
        );
        ErrorFeedbackSender::new(executor, Arc::new(publisher))
    }

    fn subject() -> OperatorErrorSubject {
        OperatorErrorSubject::Quoting {
            quote_id: Some("q-1".to_owned()),
            bulk_quote_id: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn source_receives_the_error_callback(transport: Arc<RecordingTransport>) {
        let mut publisher = MockOperatorErrorPublisher::new();
        publisher.expect_publish().never();
        let error = StandardError::try_new(codes::DESTINATION_FSP_ERROR, "bankA")
            .expect("valid error");
        let inbound = ProtocolHeaders::from_source("bankA").with_destination("bankB");

        let report = sender(transport.clone(), publisher)
            .send(FeedbackRequest {
                error: &error,
                entity: EntityCategory::Quotes,
                segments: vec![Some("q-1".to_owned())],
                inbound: &inbound,
                subject: subject(),
            })
            .await;

        assert_eq!(report, FeedbackReport { delivered: 1, escalated: 0 });
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://bankA.example/quotes/q-1/error");
        assert_eq!(requests[0].header("fspiop-source"), Some("bankA"));
        assert_eq!(requests[0].header("fspiop-destination"), None);
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({
                "errorInformation": {
                    "errorCode": "3201",
                    "errorDescription": "Destination FSP Error"
                }
            }))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_participants_are_escalated(transport: Arc<RecordingTransport>) {
        let mut publisher = MockOperatorErrorPublisher::new();
        publisher
            .expect_publish()
            .withf(|event| {
                event.fsp_id == "bankZ"
                    && event.error_code == "3205"
                    && event.subject
                        == OperatorErrorSubject::Quoting {
                            quote_id: Some("q-1".to_owned()),
                            bulk_quote_id: None,
                        }
            })
            .times(1)
            .return_once(|_| Err(OperatorErrorPublishError::unavailable("topic down")));
        let error = StandardError::try_new(codes::QUOTE_ID_NOT_FOUND, "bankA")
            .expect("valid error")
            .with_destination(Some("bankZ".to_owned()));
        let inbound = ProtocolHeaders::from_source("bankA").with_destination("bankZ");

        let report = sender(transport.clone(), publisher)
            .send(FeedbackRequest {
                error: &error,
                entity: EntityCategory::Quotes,
                segments: vec![Some("q-1".to_owned())],
                inbound: &inbound,
                subject: subject(),
            })
            .await;

        assert_eq!(report, FeedbackReport { delivered: 1, escalated: 1 });
        assert_eq!(transport.requests().len(), 1);
    }
}
