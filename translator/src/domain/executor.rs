//! Outbound executor: resolve, address, sign and send one callback.

use std::sync::Arc;

use fspiop::{EntityCategory, HttpMethod, UrlSpec};
use mockable::Clock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::endpoint_resolver::EndpointResolver;
use crate::domain::error::TranslationError;
use crate::domain::event::ProtocolHeaders;
use crate::domain::ports::{CallbackRequest, CallbackTransport};
use crate::domain::signing_gate::SigningGate;

/// HTTP date format used for the `date` header.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A callback ready for delivery once its target is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCallback {
    /// Participant whose endpoint receives the callback.
    pub target_fsp_id: String,
    /// Resource family of the callback.
    pub entity: EntityCategory,
    /// Path segments after the entity; `None` and blank entries are dropped.
    pub segments: Vec<Option<String>>,
    /// Whether the path ends in `/error`.
    pub error_path: bool,
    /// HTTP verb on the wire.
    pub method: HttpMethod,
    /// Verb declared in `fspiop-http-method` when signing.
    pub signing_method: HttpMethod,
    /// Outbound headers after direction rules.
    pub headers: ProtocolHeaders,
    /// Wire body; `None` for bodiless verbs.
    pub body: Option<Value>,
}

/// Collaborators of the executor.
#[derive(Clone)]
pub struct CallbackExecutorPorts {
    /// Endpoint resolution.
    pub resolver: EndpointResolver,
    /// HTTP delivery.
    pub transport: Arc<dyn CallbackTransport>,
    /// Optional signing.
    pub signing: SigningGate,
    /// Source of the `date` header.
    pub clock: Arc<dyn Clock>,
}

/// Delivers callbacks without retrying.
#[derive(Clone)]
pub struct CallbackExecutor {
    ports: CallbackExecutorPorts,
    protocol_version: String,
}

impl CallbackExecutor {
    /// Executor speaking `protocol_version` of the FSPIOP content types.
    pub fn new(ports: CallbackExecutorPorts, protocol_version: impl Into<String>) -> Self {
        Self {
            ports,
            protocol_version: protocol_version.into(),
        }
    }

    /// Resolve the target, build the URL, stamp and sign the headers, then
    /// send.
    ///
    /// # Errors
    ///
    /// Resolution failures map to [`TranslationError::ParticipantNotFound`]
    /// or [`TranslationError::EndpointNotFound`]; signing failures to
    /// [`TranslationError::Signing`]; transport failures and non-success
    /// statuses to [`TranslationError::Network`]. Nothing is sent unless
    /// every earlier step succeeded.
    pub async fn deliver(&self, callback: OutboundCallback) -> Result<(), TranslationError> {
        let OutboundCallback {
            target_fsp_id,
            entity,
            segments,
            error_path,
            method,
            signing_method,
            mut headers,
            body,
        } = callback;

        let endpoint = self.ports.resolver.resolve(&target_fsp_id).await?;
        let spec = UrlSpec::new(&endpoint.base_url, entity)
            .map_err(|error| {
                warn!(fsp_id = %target_fsp_id, %error, "participant endpoint is not a usable URL");
                TranslationError::EndpointNotFound {
                    fsp_id: target_fsp_id.clone(),
                }
            })?
            .segments(segments)
            .error_path(error_path);
        let url = spec.build();

        headers.content_type = Some(entity.content_type(&self.protocol_version));
        headers.date = Some(self.ports.clock.utc().format(HTTP_DATE_FORMAT).to_string());
        let body = body.filter(|_| method.has_body());
        let headers =
            self.ports
                .signing
                .maybe_sign(headers, signing_method, &spec.path(), body.as_ref())?;

        debug!(fsp_id = %target_fsp_id, %method, %url, "sending callback");
        self.ports
            .transport
            .send(CallbackRequest {
                url,
                method,
                headers: headers.to_pairs(),
                body,
            })
            .await
            .map_err(|error| {
                warn!(fsp_id = %target_fsp_id, kind = error.kind(), %error, "callback delivery failed");
                TranslationError::network(error.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{
        CallbackTransportError, FixtureParticipantDirectory, MockCallbackTransport,
    };
    use crate::test_support::FixedClock;

    #[fixture]
    fn clock() -> Arc<dyn Clock> {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 6, 7, 8, 9)
            .single()
            .expect("valid time");
        Arc::new(FixedClock::new(now))
    }

    fn executor(transport: MockCallbackTransport, clock: Arc<dyn Clock>) -> CallbackExecutor {
        let directory = FixtureParticipantDirectory::default()
            .with_fspiop_endpoint("bankB", "http://bankb.example/");
        CallbackExecutor::new(
            CallbackExecutorPorts {
                resolver: EndpointResolver::new(Arc::new(directory)),
                transport: Arc::new(transport),
                signing: SigningGate::disabled(),
                clock,
            },
            "1.1",
        )
    }

    fn callback(target: &str) -> OutboundCallback {
        OutboundCallback {
            target_fsp_id: target.to_owned(),
            entity: EntityCategory::Quotes,
            segments: vec![Some("q-1".to_owned()), None],
            error_path: true,
            method: HttpMethod::Put,
            signing_method: HttpMethod::Put,
            headers: ProtocolHeaders::from_source("bankA").with_destination("bankB"),
            body: Some(json!({ "errorInformation": {} })),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn sends_addressed_and_stamped_request(clock: Arc<dyn Clock>) {
        let mut transport = MockCallbackTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.url == "http://bankb.example/quotes/q-1/error"
                    && request.method == HttpMethod::Put
                    && request.header("fspiop-source") == Some("bankA")
                    && request.header("fspiop-destination") == Some("bankB")
                    && request.header("content-type")
                        == Some("application/vnd.interoperability.quotes+json;version=1.1")
                    && request.header("date") == Some("Mon, 06 May 2024 07:08:09 GMT")
            })
            .times(1)
            .return_once(|_| Ok(()));

        executor(transport, clock)
            .deliver(callback("bankB"))
            .await
            .expect("delivered");
    }

    #[rstest]
    #[tokio::test]
    async fn unresolvable_target_sends_nothing(clock: Arc<dyn Clock>) {
        let mut transport = MockCallbackTransport::new();
        transport.expect_send().never();

        let error = executor(transport, clock)
            .deliver(callback("bankZ"))
            .await
            .expect_err("resolution fails");

        assert_eq!(
            error,
            TranslationError::ParticipantNotFound {
                fsp_id: "bankZ".to_owned()
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn transport_failures_become_network_errors(clock: Arc<dyn Clock>) {
        let mut transport = MockCallbackTransport::new();
        transport
            .expect_send()
            .times(1)
            .return_once(|_| Err(CallbackTransportError::status(503_u16)));

        let error = executor(transport, clock)
            .deliver(callback("bankB"))
            .await
            .expect_err("send fails");

        assert!(matches!(error, TranslationError::Network { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn bodiless_verbs_drop_the_body(clock: Arc<dyn Clock>) {
        let mut transport = MockCallbackTransport::new();
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Get && request.body.is_none())
            .times(1)
            .return_once(|_| Ok(()));
        let mut get = callback("bankB");
        get.method = HttpMethod::Get;
        get.signing_method = HttpMethod::Get;
        get.error_path = false;

        executor(transport, clock).deliver(get).await.expect("delivered");
    }
}
