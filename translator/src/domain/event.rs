//! Inbound domain events and the protocol state they carry.
//!
//! Events arrive decoded from the bus. Their `protocol_state` is a tagged
//! union keyed by the inbound protocol; only the FSPIOP variant carries the
//! typed header record and the protocol extras the translator needs. Any
//! other tag decodes to [`ProtocolState::Unsupported`] so that the
//! dispatcher can drop the event instead of failing the whole batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded domain event as delivered by the message bus.
///
/// # Examples
/// ```
/// use translator::domain::{DomainEvent, ProtocolState};
/// use serde_json::json;
///
/// let event: DomainEvent = serde_json::from_value(json!({
///     "kind": "QuoteQueryResponse",
///     "payload": { "quoteId": "q-1" },
///     "protocolState": {
///         "type": "FSPIOP_v1_1",
///         "headers": { "fspiop-source": "bankA" }
///     }
/// }))?;
/// assert!(matches!(event.protocol_state, Some(ProtocolState::Fspiop(_))));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    /// Discriminator selecting the translation rule.
    pub kind: String,
    /// Kind-specific record.
    #[serde(default)]
    pub payload: Value,
    /// Inbound protocol state; absent for events raised without an
    /// originating FSPIOP request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_state: Option<ProtocolState>,
}

impl DomainEvent {
    /// Build an FSPIOP event from its parts.
    pub fn fspiop(kind: impl Into<String>, payload: Value, headers: ProtocolHeaders) -> Self {
        Self {
            kind: kind.into(),
            payload,
            protocol_state: Some(ProtocolState::Fspiop(FspiopState {
                headers: Some(headers),
                extras: ProtocolExtras::default(),
            })),
        }
    }

    /// Attach protocol extras to an FSPIOP event; other states are kept as is.
    #[must_use]
    pub fn with_extras(mut self, extras: ProtocolExtras) -> Self {
        if let Some(ProtocolState::Fspiop(state)) = self.protocol_state.as_mut() {
            state.extras = extras;
        }
        self
    }
}

/// Protocol state tagged by inbound protocol version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProtocolState {
    /// FSPIOP v1.1 request state.
    #[serde(rename = "FSPIOP_v1_1")]
    Fspiop(FspiopState),
    /// Any protocol this translator does not speak.
    #[serde(other)]
    Unsupported,
}

/// FSPIOP-specific protocol state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FspiopState {
    /// Headers of the originating request.
    #[serde(default)]
    pub headers: Option<ProtocolHeaders>,
    /// Protocol-specific values that are not part of the domain payload.
    #[serde(default)]
    pub extras: ProtocolExtras,
}

/// Typed FSPIOP header record.
///
/// Known headers are named fields; anything else is preserved in `other` and
/// forwarded unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolHeaders {
    /// `fspiop-source`.
    #[serde(rename = "fspiop-source", default)]
    pub source: String,
    /// `fspiop-destination`.
    #[serde(
        rename = "fspiop-destination",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub destination: Option<String>,
    /// `content-type`.
    #[serde(rename = "content-type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `accept`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    /// `date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `fspiop-http-method`.
    #[serde(
        rename = "fspiop-http-method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub http_method: Option<String>,
    /// `fspiop-uri`.
    #[serde(rename = "fspiop-uri", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// `fspiop-signature`.
    #[serde(
        rename = "fspiop-signature",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub signature: Option<String>,
    /// Every other header, by lower-case name.
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl ProtocolHeaders {
    /// Headers carrying only a source identity.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the destination identity.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Destination identity, treating blank values as absent.
    pub fn destination_id(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Whether the source identity is blank.
    pub fn has_blank_source(&self) -> bool {
        self.source.trim().is_empty()
    }

    /// Copy of these headers suitable for a new outbound hop: values that
    /// are recomputed per request (signature, URI, declared method) are
    /// cleared and only forwardable extra headers are kept.
    #[must_use]
    pub fn for_outbound_hop(&self) -> Self {
        let mut copy = self.clone();
        copy.signature = None;
        copy.uri = None;
        copy.http_method = None;
        copy.other
            .retain(|name, _| fspiop::headers::is_forwarded(name));
        copy
    }

    /// Render the headers as `(name, value)` pairs in canonical form.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        use fspiop::headers;

        let mut pairs = vec![(headers::SOURCE.to_owned(), self.source.clone())];
        let named = [
            (headers::DESTINATION, self.destination.as_ref()),
            (headers::CONTENT_TYPE, self.content_type.as_ref()),
            (headers::ACCEPT, self.accept.as_ref()),
            (headers::DATE, self.date.as_ref()),
            (headers::HTTP_METHOD, self.http_method.as_ref()),
            (headers::URI, self.uri.as_ref()),
            (headers::SIGNATURE, self.signature.as_ref()),
        ];
        pairs.extend(
            named
                .into_iter()
                .filter_map(|(name, value)| value.map(|value| (name.to_owned(), value.clone()))),
        );
        pairs.extend(
            self.other
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        pairs
    }
}

/// Named protocol extras carried alongside the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolExtras {
    /// ILP execution condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// ILP fulfilment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfilment: Option<String>,
    /// ILP packet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ilp_packet: Option<String>,
    /// FSPIOP extension list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_list: Option<Value>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn other_protocols_decode_as_unsupported() {
        let event: DomainEvent = serde_json::from_value(json!({
            "kind": "TransferPrepared",
            "payload": {},
            "protocolState": { "type": "ISO20022", "headers": {} }
        }))
        .expect("event decodes");
        assert_eq!(event.protocol_state, Some(ProtocolState::Unsupported));
    }

    #[rstest]
    fn unknown_headers_are_preserved() {
        let headers: ProtocolHeaders = serde_json::from_value(json!({
            "fspiop-source": "bankA",
            "fspiop-destination": "bankB",
            "x-request-id": "abc"
        }))
        .expect("headers decode");
        assert_eq!(headers.destination_id(), Some("bankB"));
        assert_eq!(headers.other.get("x-request-id").map(String::as_str), Some("abc"));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("  "), None)]
    #[case(Some("bankB"), Some("bankB"))]
    fn blank_destination_is_treated_as_absent(
        #[case] destination: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let headers = ProtocolHeaders {
            destination: destination.map(str::to_owned),
            ..ProtocolHeaders::from_source("bankA")
        };
        assert_eq!(headers.destination_id(), expected);
    }

    #[rstest]
    fn outbound_hop_clears_recomputed_headers() {
        let mut headers = ProtocolHeaders::from_source("bankA");
        headers.signature = Some("sig".to_owned());
        headers.uri = Some("/quotes".to_owned());
        headers.http_method = Some("POST".to_owned());
        headers
            .other
            .insert("content-length".to_owned(), "12".to_owned());
        headers.other.insert("traceparent".to_owned(), "00-1".to_owned());
        headers
            .other
            .insert("fspiop-encryption".to_owned(), "jwe".to_owned());
        for (name, value) in [
            ("host", "switch.internal:4000"),
            ("transfer-encoding", "chunked"),
            ("connection", "keep-alive"),
        ] {
            headers.other.insert(name.to_owned(), value.to_owned());
        }

        let outbound = headers.for_outbound_hop();

        assert!(outbound.signature.is_none());
        assert!(outbound.uri.is_none());
        assert!(outbound.http_method.is_none());
        let kept: Vec<_> = outbound.other.keys().map(String::as_str).collect();
        assert_eq!(kept, vec!["fspiop-encryption", "traceparent"]);
        assert_eq!(headers.signature.as_deref(), Some("sig"));
    }
}
