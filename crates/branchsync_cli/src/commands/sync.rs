//! The sync run: build both remotes from config and prune every mirror.

use std::sync::Arc;
use std::time::Duration;

use branchsync::forge::{Dialect, ForgeClient, ForgeError};
use branchsync::sync::{Remote, SyncOptions, SyncReport, sync_pairs};

use crate::config::{Config, RemoteConfig};
use crate::progress::LoggingReporter;
use crate::shutdown::shutdown_flag;

fn build_remote(
    config: &RemoteConfig,
    dialect: Dialect,
    timeout: Duration,
) -> Result<Remote, ForgeError> {
    let credentials = config.credentials();
    let client = ForgeClient::new(config.dialect(dialect), &credentials.token, timeout)?;
    Ok(Remote::new(client, credentials.user))
}

/// Run every configured pair and return the report.
///
/// Only client construction can fail here; per-pair and per-branch failures
/// are recorded in the report.
pub(crate) async fn handle_sync(
    config: &Config,
    dry_run: bool,
    timeout: Duration,
) -> Result<SyncReport, ForgeError> {
    tracing::debug!(
        github = ?config.github,
        codeberg = ?config.codeberg,
        repositories = ?config.repositories,
        timeout_secs = timeout.as_secs(),
        "Configuration"
    );

    let github = build_remote(&config.github, Dialect::github(), timeout)?;
    let codeberg = build_remote(&config.codeberg, Dialect::codeberg(), timeout)?;

    let reporter = Arc::new(LoggingReporter::new());
    let callback = reporter.as_callback();

    let options = SyncOptions {
        dry_run,
        shutdown: Some(shutdown_flag()),
    };
    let pairs = config.pairs();

    Ok(sync_pairs(&github, &codeberg, &pairs, &options, Some(&callback)).await)
}
