//! Kafka consumer for the order topic.

use rdkafka::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;

use crate::config::KafkaConfig;

/// Consumer subscribed to the order topic.
///
/// Offsets are auto-committed, giving at-least-once delivery; duplicate
/// records are absorbed downstream by the write-once conflict path. New
/// consumer groups start from the earliest offset so a fresh deployment
/// ingests the topic's backlog.
pub struct OrderConsumer {
    inner: StreamConsumer,
}

impl OrderConsumer {
    /// Connect to the brokers and subscribe to the configured topic.
    ///
    /// # Errors
    ///
    /// Returns [`KafkaError`] if the consumer cannot be created or the
    /// subscription is rejected.
    pub fn new(config: &KafkaConfig) -> Result<Self, KafkaError> {
        let inner: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()?;

        inner.subscribe(&[config.topic.as_str()])?;

        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            group = %config.group_id,
            "subscribed to order topic"
        );

        Ok(Self { inner })
    }

    /// Wait for the next record and return its payload.
    ///
    /// Cancellation-safe: dropping the returned future leaves the consumer
    /// usable, so it can sit inside a `select!` against a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns [`KafkaError`] on a transient read failure; the caller
    /// recovers by polling again.
    pub async fn recv(&self) -> Result<Vec<u8>, KafkaError> {
        let message = self.inner.recv().await?;
        Ok(message.payload().unwrap_or_default().to_vec())
    }
}
