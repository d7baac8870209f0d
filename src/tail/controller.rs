//!
//! The tail state machine: start, poll, budget, interrupt, commit.
//!
use std::io::Write;

use tokio::time::Instant;

use super::{OffsetStore, PollWait, Position, Record, RecordSource, SeekTarget, StopSignal};
use crate::config::{FollowMode, RunConfig, StartMode};
use crate::Result;

/// How a run reached its end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A one-pass run drained everything currently available
    Completed,
    /// The configured time budget elapsed
    BudgetExpired,
    /// An external interrupt asked the run to stop
    Interrupted,
}

/// What a finished run did
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// How the run ended
    pub outcome: Outcome,

    /// Number of records written to the sink
    pub records_emitted: u64,

    /// Position reached, `None` if nothing was observed this run
    pub position: Option<Position>,
}

/// Drives one run end to end: decides the starting offset, polls the source,
/// applies the time budget, observes the stop signal, and issues exactly one
/// terminal commit on every exit path.
pub struct TailController<S, O, W> {
    config: RunConfig,
    source: S,
    store: O,
    sink: W,
    stop: StopSignal,
    position: Option<Position>,
    emitted: u64,
}

impl<S, O, W> TailController<S, O, W>
where
    S: RecordSource,
    O: OffsetStore,
    W: Write,
{
    /// Create a controller for one run. The stop signal comes from
    /// [`super::stop_channel`]; a caller that never stops the run can simply
    /// drop the handle.
    pub fn new(config: RunConfig, source: S, store: O, sink: W, stop: StopSignal) -> Self {
        Self {
            config,
            source,
            store,
            sink,
            stop,
            position: None,
            emitted: 0,
        }
    }

    /// Run to completion.
    ///
    /// The terminal commit is attempted on every path, including after a
    /// connectivity or sink failure; a failed commit is reported on the
    /// error stream and the next run re-reads the uncommitted records.
    pub async fn run(mut self) -> Result<RunSummary> {
        if self.config.start == StartMode::FromBeginning {
            let earliest = self.store.seek(SeekTarget::Earliest).await?;
            self.position = Some(earliest);
            // Make the reset durable before any record is read, so a crash
            // cannot revert to the previous checkpoint.
            if let Err(e) = self.store.commit(self.position).await {
                tracing::error!("committing the offset reset failed: {e}");
            }
            tracing::debug!(position = earliest, "reset to earliest");
        }

        let deadline = self.config.max_time.map(|budget| Instant::now() + budget);

        let polled = match self.config.follow {
            FollowMode::Continuous => self.follow_loop(deadline).await,
            FollowMode::OnePass => self.drain_once(deadline).await,
        };

        // The one terminal commit, also reached when the loop failed.
        if let Err(e) = self.store.commit(self.position).await {
            tracing::error!("final commit failed, the next run may re-read records: {e}");
        }

        let outcome = polled?;
        tracing::debug!(?outcome, records = self.emitted, "run finished");
        Ok(RunSummary {
            outcome,
            records_emitted: self.emitted,
            position: self.position,
        })
    }

    /// Continuous mode: bounded polls until the budget expires or a stop is
    /// requested. An empty poll is the idle-wait of `tail -f`, not an error.
    async fn follow_loop(&mut self, deadline: Option<Instant>) -> Result<Outcome> {
        loop {
            if self.stop.is_stopped() {
                return Ok(Outcome::Interrupted);
            }
            let wait = match deadline {
                Some(d) => {
                    let remaining = d.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(Outcome::BudgetExpired);
                    }
                    // Clamp so an idle run ends at the budget, not one full
                    // interval past it.
                    remaining.min(self.config.poll_interval)
                }
                None => self.config.poll_interval,
            };
            let polled = self.source.poll(PollWait::Bounded(wait)).await?;
            if let Some(outcome) = self.emit_batch(&polled.records, deadline)? {
                return Ok(outcome);
            }
        }
    }

    /// One-pass mode: unbounded polls until the source reports caught-up.
    async fn drain_once(&mut self, deadline: Option<Instant>) -> Result<Outcome> {
        loop {
            if self.stop.is_stopped() {
                return Ok(Outcome::Interrupted);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(Outcome::BudgetExpired);
            }
            let polled = self.source.poll(PollWait::Unbounded).await?;
            if let Some(outcome) = self.emit_batch(&polled.records, deadline)? {
                return Ok(outcome);
            }
            if polled.exhausted {
                return Ok(Outcome::Completed);
            }
        }
    }

    /// Emit a batch, advancing the position past each record as it is
    /// written. Budget and stop are re-checked between records so a long
    /// burst cannot overshoot either unboundedly; records cut off here were
    /// never emitted and are re-read by the next run.
    fn emit_batch(
        &mut self,
        records: &[Record],
        deadline: Option<Instant>,
    ) -> Result<Option<Outcome>> {
        for record in records {
            self.sink.write_all(&record.payload)?;
            self.sink.write_all(b"\n")?;
            self.position = Some(record.next_position());
            self.emitted += 1;
            if deadline.is_some_and(|d| Instant::now() >= d) {
                self.sink.flush()?;
                return Ok(Some(Outcome::BudgetExpired));
            }
            if self.stop.is_stopped() {
                self.sink.flush()?;
                return Ok(Some(Outcome::Interrupted));
            }
        }
        self.sink.flush()?;
        Ok(None)
    }
}
