//! Operator escalation publishers.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::error;

use crate::domain::ports::{OperatorErrorEvent, OperatorErrorPublishError, OperatorErrorPublisher};

/// Publisher writing each operator-error event to the log at `error` level.
#[derive(Debug, Clone)]
pub struct TracingOperatorErrorPublisher {
    topic: String,
}

impl TracingOperatorErrorPublisher {
    /// Publisher labelling records with `topic`.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl OperatorErrorPublisher for TracingOperatorErrorPublisher {
    async fn publish(&self, event: OperatorErrorEvent) -> Result<(), OperatorErrorPublishError> {
        let record = serde_json::to_string(&event)
            .map_err(|err| OperatorErrorPublishError::unavailable(err.to_string()))?;
        error!(
            topic = %self.topic,
            context = %event.subject.context(),
            fsp_id = %event.fsp_id,
            error_code = %event.error_code,
            %record,
            "operator error"
        );
        Ok(())
    }
}

/// Publisher forwarding events to an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelOperatorErrorPublisher {
    sender: mpsc::Sender<OperatorErrorEvent>,
}

impl ChannelOperatorErrorPublisher {
    /// Publisher and the receiving end of a channel holding `capacity`
    /// events.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OperatorErrorEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl OperatorErrorPublisher for ChannelOperatorErrorPublisher {
    async fn publish(&self, event: OperatorErrorEvent) -> Result<(), OperatorErrorPublishError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| OperatorErrorPublishError::unavailable("escalation channel closed"))
    }
}
