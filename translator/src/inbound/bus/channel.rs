//! In-process event bus over a tokio channel.
//!
//! Events are grouped into batches of at most `max_batch` events: a batch
//! starts with the next event to arrive and takes whatever else is already
//! queued. Offsets count batches from zero.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use crate::domain::DomainEvent;
use crate::domain::ports::{EventBatch, EventBatchSource, EventSourceError};

/// The receiving side of the bus has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event bus is closed")]
pub struct BusClosed;

/// Publishing handle of one context's channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<DomainEvent>,
}

impl EventSender {
    /// Queue `event`, waiting for capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BusClosed`] once the source has been dropped.
    pub async fn send(&self, event: DomainEvent) -> Result<(), BusClosed> {
        self.sender.send(event).await.map_err(|_| BusClosed)
    }
}

/// Batch source reading from an in-process channel.
pub struct ChannelEventSource {
    receiver: Mutex<mpsc::Receiver<DomainEvent>>,
    max_batch: usize,
    next_offset: AtomicU64,
    committed: AtomicU64,
}

impl ChannelEventSource {
    /// Source and sender sharing a channel of `capacity` events; batches
    /// hold at most `max_batch` events.
    pub fn channel(capacity: usize, max_batch: usize) -> (Self, EventSender) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let source = Self {
            receiver: Mutex::new(receiver),
            max_batch: max_batch.max(1),
            next_offset: AtomicU64::new(0),
            committed: AtomicU64::new(0),
        };
        (source, EventSender { sender })
    }

    /// Number of batches committed so far.
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl EventBatchSource for ChannelEventSource {
    async fn next_batch(&self) -> Result<Option<EventBatch>, EventSourceError> {
        let mut receiver = self.receiver.lock().await;
        let Some(first) = receiver.recv().await else {
            return Ok(None);
        };
        let mut events = vec![first];
        while events.len() < self.max_batch {
            match receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        let offset = self.next_offset.fetch_add(1, Ordering::AcqRel);
        Ok(Some(EventBatch { offset, events }))
    }

    async fn commit(&self, offset: u64) -> Result<(), EventSourceError> {
        if offset >= self.next_offset.load(Ordering::Acquire) {
            return Err(EventSourceError::commit(offset));
        }
        self.committed.fetch_max(offset + 1, Ordering::AcqRel);
        Ok(())
    }
}
