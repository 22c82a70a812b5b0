//! Driving-side port delivering event batches from the message bus.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::event::DomainEvent;

/// A batch of decoded events plus the bus position to acknowledge.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBatch {
    /// Opaque bus position committed once the batch is handled.
    pub offset: u64,
    /// Events in delivery order.
    pub events: Vec<DomainEvent>,
}

define_port_error! {
    /// Errors raised by bus consumers.
    pub enum EventSourceError {
        /// The bus could not deliver the next batch.
        Receive { message: String } => "event batch could not be received: {message}",
        /// The bus refused the commit.
        Commit { offset: u64 } => "event batch {offset} could not be committed",
    }
}

/// Port pulling batches for one bounded context.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBatchSource: Send + Sync {
    /// Wait for the next batch; `Ok(None)` once the source is exhausted.
    async fn next_batch(&self) -> Result<Option<EventBatch>, EventSourceError>;

    /// Acknowledge a handled batch.
    async fn commit(&self, offset: u64) -> Result<(), EventSourceError>;
}
