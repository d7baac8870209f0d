//!
//! The consumption-progress and polling-loop engine.
//!
//! [`controller::TailController`] drives a run against two seams: a
//! [`RecordSource`] that hands it batches of records, and an [`OffsetStore`]
//! that owns the durable checkpoint. The broker-backed implementations live
//! in [`crate::kafka`]; tests substitute in-memory ones.
//!
use crate::Result;
use std::time::Duration;
use tokio::sync::watch;

pub mod controller;

/// Next offset to read within the partition. Follows Kafka's committed-offset
/// convention: one past the last consumed record.
pub type Position = i64;

/// A single record as read from the topic
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Payload bytes as published
    pub payload: Vec<u8>,

    /// Offset of this record within its partition
    pub offset: Position,
}

impl Record {
    /// Position of whatever comes after this record
    #[must_use]
    pub const fn next_position(&self) -> Position {
        self.offset + 1
    }
}

/// How long a poll may wait for records
#[derive(Clone, Copy, Debug)]
pub enum PollWait {
    /// Return within roughly this long with whatever is ready, possibly
    /// nothing
    Bounded(Duration),
    /// Block until at least one record arrives or the source reports
    /// caught-up
    Unbounded,
}

/// Outcome of a single poll
#[derive(Clone, Debug, Default)]
pub struct Polled {
    /// Records fetched, in partition order
    pub records: Vec<Record>,

    /// The source reported no more currently-available records
    pub exhausted: bool,
}

/// Where a seek lands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekTarget {
    /// The earliest offset still available on the partition
    Earliest,
    /// A previously committed offset
    Offset(Position),
}

/// Hands the controller batches of records from the topic.
///
/// Each call is independent; the only state shared between calls is the
/// read position of the underlying consumer.
pub trait RecordSource {
    /// Fetch the next batch, waiting at most as long as `wait` allows.
    ///
    /// An empty batch is not an error. Connectivity failures are fatal for
    /// the run; the controller still attempts one final commit.
    async fn poll(&mut self, wait: PollWait) -> Result<Polled>;
}

/// Durable consumption progress for one (client identifier, topic, partition).
pub trait OffsetStore {
    /// Point subsequent reads at `target` and return the concrete position
    /// they will start from.
    async fn seek(&mut self, target: SeekTarget) -> Result<Position>;

    /// Durably record `position` as the checkpoint. Committing the same
    /// position twice is a no-op, as is committing `None` (no position
    /// observed this run, the existing checkpoint stands).
    async fn commit(&mut self, position: Option<Position>) -> Result<()>;
}

/// Create a stop handle and the signal a controller observes.
///
/// The signal is checked cooperatively between polls and between emitted
/// records, so stop latency is bounded by one poll interval.
#[must_use]
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Requests a graceful stop of a running tail
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Ask the controller to finish its current step and commit
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observed by the controller at its suspension points
#[derive(Clone, Debug)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Has a stop been requested?
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn stop_signal_observes_handle() {
        let (handle, signal) = super::stop_channel();
        assert!(!signal.is_stopped());
        handle.stop();
        assert!(signal.is_stopped());
    }

    #[test]
    fn next_position_is_one_past_the_record() {
        let record = super::Record {
            payload: b"x".to_vec(),
            offset: 41,
        };
        assert_eq!(record.next_position(), 42);
    }
}
