//! Service assembly: adapters from settings, one consumer per context.
//!
//! [`Service::start`] wires a dispatcher for each configured bounded
//! context, gives each its own in-process channel and spawns its consumer
//! loop. Events reach the loops through the service's [`TopicRouter`].
//! [`Service::shutdown`] closes the channels and waits for every loop to
//! finish its current batch.

mod adapters;

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use adapters::{build_directory, build_ports, build_signer, translator_options};

use crate::config::TranslatorSettings;
use crate::domain::ports::{EventSourceError, OperatorErrorPublisher};
use crate::domain::{BoundedContext, TranslatorPorts, WiringError, wire_dispatchers};
use crate::inbound::bus::{ChannelEventSource, ConsumerLoop, ConsumerSummary, TopicRouter};
use crate::outbound::directory::StaticDirectoryError;
use crate::outbound::escalation::TracingOperatorErrorPublisher;
use crate::outbound::signing::SigningKeyError;

/// Events a context channel holds before senders wait.
const CHANNEL_CAPACITY: usize = 1024;

/// Errors returned while assembling the service.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The context list is empty or names an unknown context.
    #[error(transparent)]
    Wiring(#[from] WiringError),
    /// Neither a participants URL nor a participants file is configured.
    #[error("configure either a participants URL or a participants file")]
    NoParticipantDirectory,
    /// The participants URL does not parse.
    #[error("invalid participants URL '{url}': {source}")]
    InvalidParticipantsUrl {
        /// URL as configured.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The participant cache TTL is out of range.
    #[error("participant cache TTL is out of range")]
    InvalidCacheTtl,
    /// The participants file could not be loaded.
    #[error(transparent)]
    StaticDirectory(#[from] StaticDirectoryError),
    /// Signing is enabled but no key file is configured.
    #[error("signing is enabled but no signing key file is configured")]
    MissingSigningKey,
    /// The signing key could not be loaded.
    #[error(transparent)]
    SigningKey(#[from] SigningKeyError),
    /// An HTTP client could not be built.
    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[from] reqwest::Error),
}

type ConsumerHandle = JoinHandle<Result<ConsumerSummary, EventSourceError>>;

/// A running translator.
pub struct Service {
    router: TopicRouter,
    consumers: Vec<(BoundedContext, ConsumerHandle)>,
    sources: Vec<Arc<ChannelEventSource>>,
}

impl Service {
    /// Build adapters from `settings` and start one consumer per context.
    ///
    /// Operator-error events are written to the log under the configured
    /// escalation topic.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when configuration or adapter
    /// construction fails. No consumer is started in that case.
    pub fn start(settings: &TranslatorSettings) -> Result<Self, BootstrapError> {
        let publisher = Arc::new(TracingOperatorErrorPublisher::new(settings.escalation_topic()));
        let ports = build_ports(settings, publisher as Arc<dyn OperatorErrorPublisher>)?;
        Self::start_with(settings, &ports)
    }

    /// Start one consumer per configured context over prebuilt `ports`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Wiring`] when the context list is invalid.
    pub fn start_with(
        settings: &TranslatorSettings,
        ports: &TranslatorPorts,
    ) -> Result<Self, BootstrapError> {
        let options = translator_options(settings);
        let dispatchers = wire_dispatchers(ports, &options, settings.contexts())?;

        let mut router = TopicRouter::new();
        let mut consumers = Vec::with_capacity(dispatchers.len());
        let mut sources = Vec::with_capacity(dispatchers.len());
        for dispatcher in dispatchers {
            let context = dispatcher.context();
            let (source, sender) =
                ChannelEventSource::channel(CHANNEL_CAPACITY, settings.batch_size());
            let source = Arc::new(source);
            router.subscribe(context, sender);
            let consumer = ConsumerLoop::new(source.clone(), dispatcher);
            consumers.push((context, tokio::spawn(async move { consumer.run().await })));
            sources.push(source);
            info!(%context, "consumer started");
        }
        Ok(Self {
            router,
            consumers,
            sources,
        })
    }

    /// Router delivering envelopes to the running consumers.
    pub const fn router(&self) -> &TopicRouter {
        &self.router
    }

    /// Contexts with a running consumer, in startup order.
    pub fn contexts(&self) -> Vec<BoundedContext> {
        self.consumers.iter().map(|(context, _)| *context).collect()
    }

    /// Close every channel and wait for the consumers to drain.
    pub async fn shutdown(self) -> Vec<(BoundedContext, ConsumerSummary)> {
        let Self {
            router,
            consumers,
            sources,
        } = self;
        drop(router);
        let mut summaries = Vec::with_capacity(consumers.len());
        for (context, handle) in consumers {
            match handle.await {
                Ok(Ok(summary)) => {
                    info!(%context, batches = summary.batches, events = summary.report.total(), "consumer stopped");
                    summaries.push((context, summary));
                }
                Ok(Err(err)) => error!(%context, error = %err, "consumer failed"),
                Err(err) => error!(%context, error = %err, "consumer task did not complete"),
            }
        }
        let committed: u64 = sources.iter().map(|source| source.committed()).sum();
        info!(committed, "translator stopped");
        summaries
    }
}

#[cfg(test)]
mod tests;
