//! docket-stats CLI
//!
//! Prints how many unique JSON files the mirrulations archive holds for a
//! docket next to the counts regulations.gov reports.

use clap::Parser;
use docket_stats::report::GATHERING_MESSAGE;
use docket_stats::s3::S3ListingSource;
use docket_stats::{Config, DocketStatsError, Reconciler, RegulationsClient, TerminalProgress};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Compare regulations.gov record counts with the mirrulations S3 archive.
///
/// Requires the API_KEY environment variable (a regulations.gov API key).
/// Set RUST_LOG=debug to trace API requests and listing pages on stderr.
#[derive(Parser, Debug)]
#[command(name = "docket-stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Docket identifier, e.g. EPA-HQ-OAR-2021-0317
    docket_id: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so stdout only carries the report.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> docket_stats::Result<()> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration resolved");

    println!("{GATHERING_MESSAGE}");

    let api = RegulationsClient::from_config(&config)?;
    let store = S3ListingSource::from_config(&config).await?;
    tracing::debug!(bucket = store.bucket(), api = api.base_url(), "clients ready");
    let mut progress = TerminalProgress::new("Comments");

    let report = Reconciler::new(&api, &store)
        .run(&cli.docket_id, &mut progress)
        .await?;

    print!("{report}");
    Ok(())
}

fn report_error(err: &DocketStatsError) {
    for line in err.stderr_lines() {
        eprintln!("{line}");
    }
}
