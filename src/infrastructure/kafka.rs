use crate::domain::event::BrokerMessage;
use crate::domain::ports::{EventPublisher, EventSubscriber};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::{Offset, TopicPartitionList};
use std::time::Duration;
use tracing::{debug, info};

/// Kafka connection settings.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
}

impl KafkaConfig {
    pub fn new(brokers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            group_id: group_id.into(),
        }
    }
}

pub struct KafkaPublisher {
    producer: FutureProducer,
    queue_timeout: Duration,
}

impl KafkaPublisher {
    pub fn new(config: &KafkaConfig, queue_timeout: Duration) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", queue_timeout.as_millis().to_string())
            .create()
            .map_err(|e| PipelineError::QueueError(e.to_string()))?;

        Ok(Self {
            producer,
            queue_timeout,
        })
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()> {
        let record = FutureRecord::to(topic).key(key).payload(&payload);
        match self.producer.send(record, self.queue_timeout).await {
            Ok((partition, offset)) => {
                debug!(topic, key, partition, offset, "event delivered");
                Ok(())
            }
            Err((e, _)) => Err(PipelineError::QueueError(e.to_string())),
        }
    }
}

/// Consumer-group subscription with manual offset commits.
pub struct KafkaSubscriber {
    consumer: StreamConsumer,
}

impl KafkaSubscriber {
    pub fn new(config: &KafkaConfig, topic: &str) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "false")
            .create()
            .map_err(|e| PipelineError::QueueError(e.to_string()))?;

        consumer
            .subscribe(&[topic])
            .map_err(|e| PipelineError::QueueError(e.to_string()))?;
        info!(topic, group = %config.group_id, "Kafka consumer subscribed");

        Ok(Self { consumer })
    }
}

#[async_trait]
impl EventSubscriber for KafkaSubscriber {
    async fn next_message(&mut self) -> Option<Result<BrokerMessage>> {
        let message = match self.consumer.recv().await {
            Ok(m) => BrokerMessage {
                topic: m.topic().to_string(),
                key: m.key().map(|k| String::from_utf8_lossy(k).into_owned()),
                payload: m.payload().unwrap_or_default().to_vec(),
                partition: m.partition(),
                offset: m.offset(),
            },
            Err(e) => return Some(Err(PipelineError::QueueError(e.to_string()))),
        };
        Some(Ok(message))
    }

    async fn ack(&mut self, message: &BrokerMessage) -> Result<()> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &message.topic,
            message.partition,
            Offset::Offset(message.offset + 1),
        )
        .map_err(|e| PipelineError::QueueError(e.to_string()))?;
        self.consumer
            .commit(&tpl, CommitMode::Async)
            .map_err(|e| PipelineError::QueueError(e.to_string()))
    }
}
