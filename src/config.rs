//!
//! Per-run configuration.
//!
use std::time::Duration;

/// Where consumption starts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartMode {
    /// Resume from the checkpoint the broker holds for this client identifier
    #[default]
    FromLastCommitted,
    /// Reset to the earliest available offset, committing the reset before
    /// any record is read
    FromBeginning,
}

/// Whether the run keeps tailing after catching up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FollowMode {
    /// Read the records available now, then stop
    #[default]
    OnePass,
    /// Keep polling for new records as the topic grows
    Continuous,
}

/// Immutable configuration snapshot for a single run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Broker address as `host:port`
    pub brokers: String,

    /// Client identifier, the key of the durable checkpoint
    pub client_id: String,

    /// Topic to read
    pub topic: String,

    /// Partition to read
    pub partition: i32,

    /// Where consumption starts
    pub start: StartMode,

    /// Whether the run keeps tailing after catching up
    pub follow: FollowMode,

    /// Wall-clock budget for the whole run
    pub max_time: Option<Duration>,

    /// Bounded-poll wait used between budget and interrupt checks. A slow
    /// poll can overshoot the time budget by up to this long.
    pub poll_interval: Duration,
}

impl RunConfig {
    /// Default bounded-poll wait
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

    /// Create a configuration with the default client identifier, partition
    /// 0, one-pass mode and no time budget
    #[must_use]
    pub fn new(brokers: &str, topic: &str) -> Self {
        Self {
            brokers: brokers.into(),
            client_id: "kafcat".into(),
            topic: topic.into(),
            partition: 0,
            start: StartMode::default(),
            follow: FollowMode::default(),
            max_time: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the client identifier the checkpoint is keyed by
    #[must_use]
    pub fn with_client_id(self, client_id: &str) -> Self {
        Self {
            client_id: client_id.into(),
            ..self
        }
    }

    /// Set the partition to read
    #[must_use]
    pub fn with_partition(self, partition: i32) -> Self {
        Self { partition, ..self }
    }

    /// Set where consumption starts
    #[must_use]
    pub fn with_start(self, start: StartMode) -> Self {
        Self { start, ..self }
    }

    /// Set whether the run keeps tailing after catching up
    #[must_use]
    pub fn with_follow(self, follow: FollowMode) -> Self {
        Self { follow, ..self }
    }

    /// Bound the total run time
    #[must_use]
    pub fn with_max_time(self, max_time: Duration) -> Self {
        Self {
            max_time: Some(max_time),
            ..self
        }
    }

    /// Set the bounded-poll wait
    #[must_use]
    pub fn with_poll_interval(self, poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FollowMode, RunConfig, StartMode};
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = RunConfig::new("localhost:9092", "orders");
        assert_eq!(&config.client_id, "kafcat");
        assert_eq!(config.partition, 0);
        assert_eq!(config.start, StartMode::FromLastCommitted);
        assert_eq!(config.follow, FollowMode::OnePass);
        assert_eq!(config.max_time, None);
        assert_eq!(config.poll_interval, RunConfig::DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn setters() {
        let config = RunConfig::new("broker:9999", "orders")
            .with_client_id("other")
            .with_partition(3)
            .with_start(StartMode::FromBeginning)
            .with_follow(FollowMode::Continuous)
            .with_max_time(Duration::from_secs(2));
        assert_eq!(&config.brokers, "broker:9999");
        assert_eq!(&config.client_id, "other");
        assert_eq!(config.partition, 3);
        assert_eq!(config.start, StartMode::FromBeginning);
        assert_eq!(config.follow, FollowMode::Continuous);
        assert_eq!(config.max_time, Some(Duration::from_secs(2)));
    }
}
