use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use tarmac::SimulationBuilder;
use tarmac::sync::ReleasePolicy;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the landing simulation
#[derive(Debug, Parser)]
#[command(name = "tarmac", version, about = "Land a number of flights on a single runway")]
struct Cli {
    /// Number of flights contending for the runway
    #[arg(
        short = 'n',
        long = "flights",
        env = "TARMAC_FLIGHTS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    flights: u32,

    /// Exclusive upper bound of a flight's hold time, in milliseconds
    #[arg(long = "max-hold-ms", default_value_t = 5000)]
    max_hold_ms: u64,

    /// Reject runway releases from flights that do not hold it
    #[arg(long = "strict")]
    strict: bool,

    /// Give up if the flights have not all landed after this many seconds
    #[arg(long = "deadline-secs")]
    deadline_secs: Option<u64>,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let policy = if cli.strict {
        ReleasePolicy::Strict
    } else {
        ReleasePolicy::Lenient
    };

    let mut builder = SimulationBuilder::new()
        .flights(cli.flights as usize)
        .max_hold(Duration::from_millis(cli.max_hold_ms))
        .release_policy(policy);

    if let Some(secs) = cli.deadline_secs {
        builder = builder.deadline(Duration::from_secs(secs));
    }

    let report = builder.run().context("landing simulation failed")?;

    println!(
        "Mission completed....All {} flights landed successfully in {:?}",
        report.landed(),
        report.elapsed()
    );

    Ok(())
}
