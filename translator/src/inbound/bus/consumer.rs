//! Per-context consumer loop.
//!
//! Pulls a batch, dispatches it in delivery order, and commits it once the
//! dispatcher returns, whatever the individual outcomes. A commit the bus
//! refuses is logged; the loop carries on with the next batch.

use std::sync::Arc;

use tracing::{Instrument, error, info, info_span, warn};

use crate::domain::ports::{EventBatchSource, EventSourceError};
use crate::domain::{BatchReport, BoundedContext, EventDispatcher};

/// Totals for one consumer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerSummary {
    /// Batches dispatched.
    pub batches: usize,
    /// Batches whose commit was refused.
    pub failed_commits: usize,
    /// Aggregated outcomes.
    pub report: BatchReport,
}

/// Drives one dispatcher from one batch source.
pub struct ConsumerLoop {
    source: Arc<dyn EventBatchSource>,
    dispatcher: EventDispatcher,
}

impl ConsumerLoop {
    /// Loop feeding `dispatcher` from `source`.
    pub fn new(source: Arc<dyn EventBatchSource>, dispatcher: EventDispatcher) -> Self {
        Self { source, dispatcher }
    }

    /// Context of the underlying dispatcher.
    pub const fn context(&self) -> BoundedContext {
        self.dispatcher.context()
    }

    /// Consume until the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the receive error that stopped the loop.
    pub async fn run(&self) -> Result<ConsumerSummary, EventSourceError> {
        let span = info_span!("consumer", context = %self.context());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<ConsumerSummary, EventSourceError> {
        let mut summary = ConsumerSummary::default();
        loop {
            let batch = match self.source.next_batch().await {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(err) => {
                    error!(kind = err.kind(), error = %err, "event batch could not be received; stopping");
                    return Err(err);
                }
            };
            let report = self.dispatcher.dispatch_batch(&batch.events).await;
            summary.batches += 1;
            summary.report += report;
            if let Err(err) = self.source.commit(batch.offset).await {
                warn!(error = %err, offset = batch.offset, "batch commit refused");
                summary.failed_commits += 1;
            }
        }
        info!(
            batches = summary.batches,
            events = summary.report.total(),
            "event source exhausted"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{EventBatch, FixtureParticipantDirectory, MockEventBatchSource};
    use crate::domain::wiring::{TranslatorOptions, wire_dispatcher};
    use crate::domain::{DomainEvent, ProtocolHeaders};
    use crate::inbound::bus::ChannelEventSource;
    use crate::test_support::{Recorders, recording_ports};

    #[fixture]
    fn quoting() -> (EventDispatcher, Recorders) {
        let directory = FixtureParticipantDirectory::default()
            .with_fspiop_endpoint("bankA", "http://bankA.example");
        let (ports, recorders) = recording_ports(directory);
        (
            wire_dispatcher(&ports, &TranslatorOptions::default(), BoundedContext::Quoting),
            recorders,
        )
    }

    fn query_response(quote_id: &str) -> DomainEvent {
        DomainEvent::fspiop(
            "QuoteQueryResponse",
            json!({ "quoteId": quote_id }),
            ProtocolHeaders::from_source("bankA"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn batches_are_dispatched_then_committed(quoting: (EventDispatcher, Recorders)) {
        let (dispatcher, recorders) = quoting;
        let (source, sender) = ChannelEventSource::channel(8, 8);
        for quote_id in ["q-1", "q-2"] {
            sender.send(query_response(quote_id)).await.expect("sent");
        }
        sender
            .send(DomainEvent {
                kind: "QuoteQueryResponse".to_owned(),
                payload: json!({}),
                protocol_state: None,
            })
            .await
            .expect("sent");
        drop(sender);
        let source = Arc::new(source);
        let consumer = ConsumerLoop::new(source.clone(), dispatcher);

        let summary = consumer.run().await.expect("runs to exhaustion");

        assert_eq!(summary.batches, 1);
        assert_eq!(summary.failed_commits, 0);
        assert_eq!(summary.report.delivered, 2);
        assert_eq!(summary.report.dropped, 1);
        assert_eq!(source.committed(), 1);
        assert_eq!(recorders.transport.requests().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn refused_commits_do_not_stop_the_loop(quoting: (EventDispatcher, Recorders)) {
        let (dispatcher, _) = quoting;
        let mut source = MockEventBatchSource::new();
        let mut sequence = Sequence::new();
        for offset in [7_u64, 8] {
            source
                .expect_next_batch()
                .times(1)
                .in_sequence(&mut sequence)
                .returning(move || {
                    Ok(Some(EventBatch {
                        offset,
                        events: vec![query_response("q-1")],
                    }))
                });
            source
                .expect_commit()
                .withf(move |committed| *committed == offset)
                .times(1)
                .in_sequence(&mut sequence)
                .returning(|committed| Err(EventSourceError::commit(committed)));
        }
        source
            .expect_next_batch()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|| Ok(None));

        let summary = ConsumerLoop::new(Arc::new(source), dispatcher)
            .run()
            .await
            .expect("runs to exhaustion");

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.failed_commits, 2);
        assert_eq!(summary.report.delivered, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn receive_errors_stop_the_loop(quoting: (EventDispatcher, Recorders)) {
        let (dispatcher, _) = quoting;
        let mut source = MockEventBatchSource::new();
        source
            .expect_next_batch()
            .times(1)
            .returning(|| Err(EventSourceError::receive("broker gone")));
        source.expect_commit().never();

        let result = ConsumerLoop::new(Arc::new(source), dispatcher).run().await;

        assert_eq!(result, Err(EventSourceError::receive("broker gone")));
    }
}
