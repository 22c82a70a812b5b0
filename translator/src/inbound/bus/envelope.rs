//! Topic routing for `{topic, event}` envelopes.
//!
//! The binary reads JSON-lines envelopes (one per line) and hands each
//! event to the channel of the bounded context named by its topic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use super::channel::EventSender;
use crate::domain::{BoundedContext, DomainEvent};

/// One published event and the topic it was published on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Topic name; equal to the bounded-context name.
    pub topic: String,
    /// The event.
    pub event: DomainEvent,
}

/// Errors raised while routing one envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The line is not a valid envelope.
    #[error("envelope could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    /// The topic names no known bounded context.
    #[error("unknown topic '{topic}'")]
    UnknownTopic {
        /// Topic as published.
        topic: String,
    },
    /// No consumer runs for the context.
    #[error("no consumer subscribed to '{context}'")]
    NotSubscribed {
        /// Context named by the topic.
        context: BoundedContext,
    },
    /// The context's consumer has shut down.
    #[error("consumer for '{context}' has shut down")]
    Closed {
        /// Context named by the topic.
        context: BoundedContext,
    },
}

/// Counts of lines handled by [`TopicRouter::feed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Envelopes handed to a consumer.
    pub routed: usize,
    /// Lines that could not be routed.
    pub rejected: usize,
}

/// Routes envelopes to per-context senders.
#[derive(Debug, Clone, Default)]
pub struct TopicRouter {
    senders: HashMap<BoundedContext, EventSender>,
}

impl TopicRouter {
    /// Router with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver events published on `context`'s topic to `sender`.
    pub fn subscribe(&mut self, context: BoundedContext, sender: EventSender) {
        self.senders.insert(context, sender);
    }

    /// Decode one JSON envelope and forward its event.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError`] when the line cannot be decoded or the
    /// topic has no live consumer.
    pub async fn route(&self, line: &str) -> Result<BoundedContext, EnvelopeError> {
        let envelope: EventEnvelope = serde_json::from_str(line)?;
        let context = envelope
            .topic
            .parse::<BoundedContext>()
            .map_err(|_| EnvelopeError::UnknownTopic {
                topic: envelope.topic.clone(),
            })?;
        let sender = self
            .senders
            .get(&context)
            .ok_or(EnvelopeError::NotSubscribed { context })?;
        sender
            .send(envelope.event)
            .await
            .map_err(|_| EnvelopeError::Closed { context })?;
        Ok(context)
    }

    /// Route every non-blank line of `reader` until it is exhausted.
    ///
    /// Lines that cannot be routed are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that stopped reading.
    pub async fn feed<R>(&self, reader: R) -> std::io::Result<FeedSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut summary = FeedSummary::default();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match self.route(&line).await {
                Ok(context) => {
                    debug!(%context, "event routed");
                    summary.routed += 1;
                }
                Err(error) => {
                    warn!(%error, "dropping unroutable envelope");
                    summary.rejected += 1;
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::EventBatchSource;
    use crate::inbound::bus::ChannelEventSource;

    const QUOTE_LINE: &str = r#"{"topic":"quoting","event":{"kind":"QuoteQueryResponse","payload":{"quoteId":"q-1"},"protocolState":{"type":"FSPIOP_v1_1","headers":{"fspiop-source":"bankA"}}}}"#;

    #[rstest]
    #[tokio::test]
    async fn routes_to_the_named_context() {
        let (source, sender) = ChannelEventSource::channel(4, 4);
        let mut router = TopicRouter::new();
        router.subscribe(BoundedContext::Quoting, sender);

        assert_eq!(router.route(QUOTE_LINE).await.expect("routed"), BoundedContext::Quoting);
        drop(router);
        let batch = source.next_batch().await.expect("receive").expect("batch");
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.events[0].kind, "QuoteQueryResponse");
    }

    #[rstest]
    #[case(r#"{"topic":"settlements","event":{"kind":"X"}}"#, "unknown topic")]
    #[case(r#"{"topic":"transfers","event":{"kind":"X"}}"#, "no consumer")]
    #[case("not json", "could not be decoded")]
    #[tokio::test]
    async fn unroutable_lines_are_errors(#[case] line: &str, #[case] message: &str) {
        let (_source, sender) = ChannelEventSource::channel(4, 4);
        let mut router = TopicRouter::new();
        router.subscribe(BoundedContext::Quoting, sender);

        let error = router.route(line).await.expect_err("must fail");
        assert!(error.to_string().contains(message), "{error}");
    }

    #[rstest]
    #[tokio::test]
    async fn feed_skips_blank_and_bad_lines() {
        let (_source, sender) = ChannelEventSource::channel(4, 4);
        let mut router = TopicRouter::new();
        router.subscribe(BoundedContext::Quoting, sender);
        let input = format!("{QUOTE_LINE}\n\n   \nnot json\n{QUOTE_LINE}\n");

        let summary = router.feed(input.as_bytes()).await.expect("fed");

        assert_eq!(
            summary,
            FeedSummary {
                routed: 2,
                rejected: 1
            }
        );
    }
}
