//! Tripwire binary — scan captured page snapshots for automation
//! frameworks.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tripwire::cli::{baseline_cmd, probes_cmd, scan_cmd};
use tripwire::executor::DEFAULT_PROBE_BUDGET;

#[derive(Parser)]
#[command(
    name = "tripwire",
    version,
    about = "Detect browser-automation frameworks from captured page state"
)]
struct Cli {
    /// Emit machine-readable JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    quiet: bool,

    /// Show per-probe results.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the probe battery against a captured page snapshot.
    Scan {
        /// Path to a PageSnapshot JSON file.
        snapshot: PathBuf,

        /// Per-probe wall-clock budget in milliseconds.
        #[arg(long, default_value_t = DEFAULT_PROBE_BUDGET.as_millis() as u64)]
        budget_ms: u64,

        /// Only run probes for one framework.
        #[arg(long)]
        framework: Option<String>,

        /// Append the report to ~/.tripwire/runs.jsonl.
        #[arg(long)]
        log: bool,
    },
    /// List the built-in probe catalog.
    Probes,
    /// Verify the no-false-positives property on an empty snapshot.
    Baseline {
        /// Per-probe wall-clock budget in milliseconds.
        #[arg(long, default_value_t = DEFAULT_PROBE_BUDGET.as_millis() as u64)]
        budget_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // subcommands read these instead of threading flags everywhere
    if cli.json {
        std::env::set_var("TRIPWIRE_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("TRIPWIRE_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("TRIPWIRE_VERBOSE", "1");
    }

    match cli.command {
        Command::Scan {
            snapshot,
            budget_ms,
            framework,
            log,
        } => scan_cmd::run(&snapshot, budget_ms, framework.as_deref(), log).await,
        Command::Probes => probes_cmd::run(),
        Command::Baseline { budget_ms } => baseline_cmd::run(budget_ms).await,
    }
}
