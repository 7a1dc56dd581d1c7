use crate::domain::event::BrokerMessage;
use crate::domain::ports::{EventPublisher, EventSubscriber};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{RwLock, mpsc};

/// Single-partition in-process broker.
///
/// The subscription ends once every publisher handle is dropped and the
/// backlog is drained.
pub struct InMemoryBroker;

impl InMemoryBroker {
    pub fn channel() -> (InMemoryPublisher, InMemorySubscriber) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let publisher = InMemoryPublisher {
            sender,
            next_offset: Arc::new(AtomicI64::new(0)),
            published: Arc::new(RwLock::new(Vec::new())),
        };
        let subscriber = InMemorySubscriber {
            receiver,
            committed: None,
        };
        (publisher, subscriber)
    }
}

#[derive(Clone)]
pub struct InMemoryPublisher {
    sender: mpsc::UnboundedSender<BrokerMessage>,
    next_offset: Arc<AtomicI64>,
    published: Arc<RwLock<Vec<BrokerMessage>>>,
}

impl InMemoryPublisher {
    /// Every message accepted so far, in offset order.
    pub async fn published(&self) -> Vec<BrokerMessage> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()> {
        // Held across the send so offsets and `published()` keep delivery order.
        let mut published = self.published.write().await;
        let message = BrokerMessage {
            topic: topic.to_string(),
            key: Some(key.to_string()),
            payload,
            partition: 0,
            offset: self.next_offset.load(Ordering::SeqCst),
        };
        self.sender
            .send(message.clone())
            .map_err(|_| PipelineError::QueueError("subscriber is gone".to_string()))?;
        self.next_offset.fetch_add(1, Ordering::SeqCst);
        published.push(message);
        Ok(())
    }
}

pub struct InMemorySubscriber {
    receiver: mpsc::UnboundedReceiver<BrokerMessage>,
    committed: Option<i64>,
}

impl InMemorySubscriber {
    /// Non-blocking poll; `None` when nothing is queued right now.
    pub fn try_next(&mut self) -> Option<BrokerMessage> {
        self.receiver.try_recv().ok()
    }

    /// Offset of the last acknowledged message.
    pub fn committed(&self) -> Option<i64> {
        self.committed
    }
}

#[async_trait]
impl EventSubscriber for InMemorySubscriber {
    async fn next_message(&mut self) -> Option<Result<BrokerMessage>> {
        self.receiver.recv().await.map(Ok)
    }

    async fn ack(&mut self, message: &BrokerMessage) -> Result<()> {
        self.committed = Some(message.offset);
        Ok(())
    }
}
