//!
//! Read the contents of a Kafka topic and stream them to stdout.
//!
//! The interesting part lives in [`tail`]: a small state machine that decides
//! how much of the topic to read, polls for records, applies an optional time
//! budget, and guarantees that consumption progress is durably committed
//! exactly once per run, whether the run ends normally, on budget expiry, or
//! on interrupt. The [`kafka`] module binds that machine to a real broker
//! through `rdkafka`.
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), kafcat::Error> {
//!     use kafcat::{kafka, tail, FollowMode, RunConfig, TailController};
//!
//!     let config = RunConfig::new("localhost:9092", "orders")
//!         .with_follow(FollowMode::Continuous);
//!     let (source, store) = kafka::connect(&config)?;
//!
//!     let (stop, signal) = tail::stop_channel();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         stop.stop();
//!     });
//!
//!     let controller = TailController::new(config, source, store, std::io::stdout(), signal);
//!     let summary = controller.run().await?;
//!     eprintln!("{} records", summary.records_emitted);
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)]

pub mod config;
pub mod kafka;
pub mod tail;

pub use config::{FollowMode, RunConfig, StartMode};
pub use tail::controller::{Outcome, RunSummary, TailController};

/// Error returned by library functions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Broker unreachable or the connection dropped mid-run
    #[error("broker connectivity: {0}")]
    Connectivity(#[source] rdkafka::error::KafkaError),

    /// The offset commit itself failed; the next run may re-read records
    #[error("offset commit: {0}")]
    Commit(#[source] rdkafka::error::KafkaError),

    /// Writing to the output sink failed
    #[error("IO error {0}")]
    IO(#[from] std::io::Error),

    /// Rejected configuration value, caught before any broker interaction
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
