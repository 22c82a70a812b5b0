//! Message-bus side of the translator.
//!
//! Responsibilities:
//! - deliver batches of decoded events per bounded context ([`channel`])
//! - drive one dispatcher per context and commit each handled batch
//!   ([`consumer`])
//! - route `{topic, event}` envelopes to the matching context ([`envelope`])

pub mod channel;
pub mod consumer;
pub mod envelope;

pub use channel::{BusClosed, ChannelEventSource, EventSender};
pub use consumer::{ConsumerLoop, ConsumerSummary};
pub use envelope::{EnvelopeError, EventEnvelope, TopicRouter};
