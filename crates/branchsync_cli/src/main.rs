//! Branchsync CLI - prune Codeberg mirror branches that are gone from GitHub.

mod commands;
mod config;
mod logging;
mod progress;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::summary::{OutputFormat, PairSummary};
use crate::config::{Config, DEFAULT_CONFIG_FILE};

/// Exit status when a run completed but some pairs or deletions failed.
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "branchsync")]
#[command(version)]
#[command(about = "Clean up branches in mirrored git repositories")]
#[command(
    long_about = "Branchsync compares the branches of each GitHub repository with its \
Codeberg mirror and deletes mirror branches that no longer exist on GitHub. \
Branches are never created or updated."
)]
#[command(after_long_help = r#"EXAMPLES
    Create a config file to fill in:
        $ branchsync --generate-config

    See what would be deleted:
        $ branchsync --dry-run

    Prune mirrors, keeping a debug log:
        $ branchsync -f mirrors.yml --log-file branchsync.log

CONFIGURATION
    Branchsync reads configuration from:
      1. The YAML file given with -f (default: ./config.yml)
      2. Environment variables (BRANCHSYNC_* prefix, '__' between keys)
      3. .env file in current directory

ENVIRONMENT VARIABLES
    BRANCHSYNC_GITHUB__TOKEN        GitHub personal access token
    BRANCHSYNC_GITHUB__USER         GitHub account owning the repositories
    BRANCHSYNC_CODEBERG__TOKEN      Codeberg API token
    BRANCHSYNC_CODEBERG__USER       Codeberg account owning the mirrors
    BRANCHSYNC_HTTP__TIMEOUT_SECS   Request timeout in seconds (default: 30)
    RUST_LOG                        Console log filter (overrides --debug)

EXIT STATUS
    0    every pair synchronized
    1    configuration or startup error
    2    some pairs were skipped or some deletions failed
    130  interrupted with Ctrl+C
"#)]
struct Cli {
    /// Will not delete branches, just print what would be deleted
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Path to config file
    #[arg(short = 'f', long, default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Also write DEBUG-level logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Generate default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// Request timeout in seconds (overrides http.timeout_secs)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Summary output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _log_guard = match logging::init(cli.debug, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to open log file: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if cli.generate_config {
        commands::generate::handle_generate(&cli.config_file)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(&cli.config_file)?;

    // Set up graceful shutdown handler (Ctrl+C)
    shutdown::setup_shutdown_handler();

    let report =
        commands::sync::handle_sync(&config, cli.dry_run, config.timeout(cli.timeout)).await?;

    let rows = PairSummary::rows(&report, &config.pairs());
    PairSummary::print_many(rows, cli.output)?;

    let elapsed = report.finished_at - report.started_at;
    tracing::debug!(elapsed_ms = elapsed.num_milliseconds(), "Run finished");

    if report.interrupted || shutdown::is_shutdown_requested() {
        return Ok(ExitCode::from(shutdown::FORCE_QUIT_EXIT_CODE as u8));
    }
    if report.has_failures() {
        return Ok(ExitCode::from(EXIT_PARTIAL_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}
