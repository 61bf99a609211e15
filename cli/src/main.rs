//! CLI for Repo Radar.
//!
//! Polls the public repositories of the tracked accounts, records the newly
//! published ones with README excerpts, and updates the JSON artifacts
//! consumed by the viewer.

use clap::Parser;
use repo_radar::{RunSummary, Runner, RunnerConfig, RunnerError, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Repo Radar - track newly published public repositories of a set of accounts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Comma-separated account names to track.
    #[arg(long, env = "TRACKED_ACCOUNTS")]
    accounts: Option<String>,

    /// Directory for the snapshot and history files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for viewer-facing artifacts.
    #[arg(long, default_value = "docs")]
    docs_dir: PathBuf,

    /// Preview discoveries without writing artifacts.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let Args {
        token,
        accounts,
        data_dir,
        docs_dir,
        dry_run,
    } = Args::parse();

    // Missing configuration aborts before any network or file activity.
    let settings = match Settings::from_values(token, accounts) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Missing configuration");
            return ExitCode::from(1);
        }
    };

    // Run the main logic
    match run(settings, data_dir, docs_dir, dry_run).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Main execution logic.
async fn run(
    settings: Settings,
    data_dir: PathBuf,
    docs_dir: PathBuf,
    dry_run: bool,
) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(settings, data_dir, docs_dir, dry_run);
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Accounts checked: {}", summary.accounts_checked);
    println!("  Repositories seen: {}", summary.repositories_seen);
    println!("  New repositories: {}", summary.new_repositories);

    if summary.new_repositories > 0 {
        println!("  Snippets unavailable: {}", summary.snippets_unavailable);
    }
}
