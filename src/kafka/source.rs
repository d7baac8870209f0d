//!
//! Batch polling over an assigned partition.
//!
use std::sync::Arc;

use futures_util::FutureExt;
use rdkafka::consumer::StreamConsumer;
use rdkafka::error::KafkaError;
use rdkafka::message::BorrowedMessage;
use rdkafka::Message;
use tokio::time::timeout;

use crate::tail::{PollWait, Polled, Record, RecordSource};
use crate::{Error, Result};

/// Cap on records returned by one poll, so a deep backlog cannot starve
/// the budget and interrupt checks between batches.
const MAX_BATCH: usize = 500;

/// [`RecordSource`] over a shared `rdkafka` consumer
pub struct KafkaRecordSource {
    consumer: Arc<StreamConsumer>,
}

impl KafkaRecordSource {
    pub(crate) fn new(consumer: Arc<StreamConsumer>) -> Self {
        Self { consumer }
    }

    fn push(records: &mut Vec<Record>, msg: &BorrowedMessage<'_>) {
        records.push(Record {
            payload: msg.payload().unwrap_or_default().to_vec(),
            offset: msg.offset(),
        });
    }
}

impl RecordSource for KafkaRecordSource {
    /// The first fetch honors the wait budget; the rest of the batch drains
    /// whatever the consumer has already buffered.
    async fn poll(&mut self, wait: PollWait) -> Result<Polled> {
        let mut polled = Polled::default();

        match wait {
            PollWait::Bounded(d) => match timeout(d, self.consumer.recv()).await {
                // Nothing became ready within the wait.
                Err(_) => return Ok(polled),
                Ok(Ok(msg)) => Self::push(&mut polled.records, &msg),
                Ok(Err(KafkaError::PartitionEOF(_))) => {
                    polled.exhausted = true;
                    return Ok(polled);
                }
                Ok(Err(e)) => return Err(Error::Connectivity(e)),
            },
            PollWait::Unbounded => match self.consumer.recv().await {
                Ok(msg) => Self::push(&mut polled.records, &msg),
                Err(KafkaError::PartitionEOF(_)) => {
                    polled.exhausted = true;
                    return Ok(polled);
                }
                Err(e) => return Err(Error::Connectivity(e)),
            },
        }

        while polled.records.len() < MAX_BATCH {
            match self.consumer.recv().now_or_never() {
                None => break,
                Some(Ok(msg)) => Self::push(&mut polled.records, &msg),
                Some(Err(KafkaError::PartitionEOF(_))) => {
                    polled.exhausted = true;
                    break;
                }
                Some(Err(e)) => return Err(Error::Connectivity(e)),
            }
        }

        tracing::trace!(
            records = polled.records.len(),
            exhausted = polled.exhausted,
            "poll"
        );
        Ok(polled)
    }
}
