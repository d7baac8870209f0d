//!
//! Broker-backed implementations of the tail seams, built on `rdkafka`.
//!
use std::sync::Arc;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::{Offset, TopicPartitionList};

use crate::config::{RunConfig, StartMode};
use crate::{Error, Result};

pub mod checkpoint;
pub mod source;

pub use checkpoint::KafkaOffsetStore;
pub use source::KafkaRecordSource;

/// Connect to the broker and bind a consumer to one partition of the topic.
///
/// The partition is assigned directly rather than subscribed, so no
/// consumer-group rebalancing is involved; the group id only keys the
/// durable checkpoint. The returned source and store share the consumer.
pub fn connect(config: &RunConfig) -> Result<(KafkaRecordSource, KafkaOffsetStore)> {
    if config.partition < 0 {
        return Err(Error::InvalidConfig(format!(
            "partition {} out of range",
            config.partition
        )));
    }

    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .set("group.id", &config.client_id)
        .set("enable.auto.commit", "false")
        .set("enable.auto.offset.store", "false")
        // EOF events are the caught-up signal for one-pass runs.
        .set("enable.partition.eof", "true")
        // A fresh client identifier starts from the earliest record.
        .set("auto.offset.reset", "earliest")
        .set("session.timeout.ms", "6000")
        .create()
        .map_err(Error::Connectivity)?;

    let start_offset = match config.start {
        // The controller seeks and commits the reset itself; starting the
        // assignment at the beginning just avoids one stored-offset fetch.
        StartMode::FromBeginning => Offset::Beginning,
        StartMode::FromLastCommitted => Offset::Stored,
    };
    let mut assignment = TopicPartitionList::new();
    assignment
        .add_partition_offset(&config.topic, config.partition, start_offset)
        .map_err(Error::Connectivity)?;
    consumer.assign(&assignment).map_err(Error::Connectivity)?;

    tracing::debug!(
        topic = %config.topic,
        partition = config.partition,
        brokers = %config.brokers,
        "consumer assigned"
    );

    let consumer = Arc::new(consumer);
    let source = KafkaRecordSource::new(Arc::clone(&consumer));
    let store = KafkaOffsetStore::new(consumer, config.topic.clone(), config.partition);
    Ok((source, store))
}
