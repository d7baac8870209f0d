//!
//! CLI driver: parse arguments, connect, run the tail, map exit codes.
//!
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use kafcat::tail::stop_channel;
use kafcat::{kafka, FollowMode, Outcome, RunConfig, StartMode, TailController};

/// Read Kafka topic contents and output them to stdout.
#[derive(Debug, Parser)]
#[command(name = "kafcat", version, about)]
struct Args {
    /// Topic to read
    topic: String,

    /// Kafka node hostname
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Kafka node port number
    #[arg(long, default_value_t = 9092)]
    port: u16,

    /// Client identifier the consumption checkpoint is keyed by
    #[arg(long, default_value = "kafcat")]
    id: String,

    /// Partition to read
    #[arg(long, default_value_t = 0)]
    partition: i32,

    /// Start from the beginning of the topic instead of the last committed
    /// offset
    #[arg(short = 'b')]
    from_beginning: bool,

    /// Output appended data as the topic grows
    #[arg(short = 'f')]
    follow: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    maxtime: Option<u64>,
}

impl Args {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(&format!("{}:{}", self.host, self.port), &self.topic)
            .with_client_id(&self.id)
            .with_partition(self.partition);
        if self.from_beginning {
            config = config.with_start(StartMode::FromBeginning);
        }
        if self.follow {
            config = config.with_follow(FollowMode::Continuous);
        }
        if let Some(seconds) = self.maxtime {
            config = config.with_max_time(Duration::from_secs(seconds));
        }
        config
    }
}

const EXIT_FAILURE: u8 = 1;
// 128 + SIGINT, the conventional code for an interrupted run.
const EXIT_INTERRUPTED: u8 = 130;

async fn run(config: RunConfig) -> anyhow::Result<Outcome> {
    let (source, store) = kafka::connect(&config).context("connecting to broker")?;

    let (stop, signal) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, committing progress");
            stop.stop();
        }
    });

    let stdout = std::io::stdout().lock();
    let controller = TailController::new(config, source, store, stdout, signal);
    let summary = controller.run().await?;
    tracing::debug!(records = summary.records_emitted, "done");
    Ok(summary.outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(args.into_config()).await {
        Ok(Outcome::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
