//!
//! Durable consumption progress, held by the broker per
//! (client identifier, topic, partition).
//!
use std::sync::Arc;
use std::time::Duration;

use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::{Offset, TopicPartitionList};

use crate::tail::{OffsetStore, Position, SeekTarget};
use crate::{Error, Result};

/// Ceiling for one-shot broker calls (watermark fetches)
const BROKER_OP_TIMEOUT: Duration = Duration::from_secs(10);

/// [`OffsetStore`] over a shared `rdkafka` consumer
pub struct KafkaOffsetStore {
    consumer: Arc<StreamConsumer>,
    topic: String,
    partition: i32,
}

impl KafkaOffsetStore {
    pub(crate) fn new(consumer: Arc<StreamConsumer>, topic: String, partition: i32) -> Self {
        Self {
            consumer,
            topic,
            partition,
        }
    }

    fn partition_list(&self, offset: Offset) -> Result<TopicPartitionList> {
        let mut list = TopicPartitionList::new();
        list.add_partition_offset(&self.topic, self.partition, offset)
            .map_err(Error::Connectivity)?;
        Ok(list)
    }
}

impl OffsetStore for KafkaOffsetStore {
    /// Re-assign the partition at the resolved position. Assignment is used
    /// instead of a seek so the call also works before the first fetch has
    /// completed.
    async fn seek(&mut self, target: SeekTarget) -> Result<Position> {
        let position = match target {
            SeekTarget::Earliest => {
                let (low, _high) = self
                    .consumer
                    .fetch_watermarks(&self.topic, self.partition, BROKER_OP_TIMEOUT)
                    .map_err(Error::Connectivity)?;
                low
            }
            SeekTarget::Offset(position) => position,
        };
        let assignment = self.partition_list(Offset::Offset(position))?;
        self.consumer
            .assign(&assignment)
            .map_err(Error::Connectivity)?;
        tracing::debug!(position, "seek");
        Ok(position)
    }

    /// Commit synchronously: the commit is the one short critical section of
    /// a run and is not raced against shutdown.
    async fn commit(&mut self, position: Option<Position>) -> Result<()> {
        let Some(position) = position else {
            tracing::debug!("nothing observed this run, existing checkpoint stands");
            return Ok(());
        };
        let checkpoint = self.partition_list(Offset::Offset(position))?;
        self.consumer
            .commit(&checkpoint, CommitMode::Sync)
            .map_err(Error::Commit)?;
        tracing::debug!(position, "committed");
        Ok(())
    }
}
