//! Progress reporting for sync runs.
//!
//! The library reports every step as a [`SyncProgress`] event; the
//! [`LoggingReporter`] turns them into structured `tracing` records.

use std::sync::Arc;

use branchsync::sync::{ProgressCallback, SyncProgress};

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| {
            reporter.handle(event);
        })
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::SyncingPairs { count, dry_run } => {
                if dry_run {
                    tracing::info!("DRY_RUN mode enabled, no changes will be made");
                }
                tracing::info!(pairs = count, "Synchronizing branches");
            }

            SyncProgress::PairStarted { source, mirror } => {
                tracing::info!(
                    github = %source,
                    codeberg = %mirror,
                    "Processing repository pair"
                );
            }

            SyncProgress::FetchingBranches { remote, repository } => {
                tracing::info!(remote = %remote, repo = %repository, "Getting branches");
            }

            SyncProgress::FetchedPage {
                remote,
                repository,
                page,
                count,
                total_so_far,
            } => {
                tracing::debug!(remote = %remote, repo = %repository, page, count, total_so_far, "Fetched page");
            }

            SyncProgress::FetchComplete {
                remote,
                repository,
                total,
            } => {
                tracing::debug!(remote = %remote, repo = %repository, total, "Fetch complete");
            }

            SyncProgress::PlanReady {
                repository,
                to_delete,
            } => {
                tracing::info!(repo = %repository, to_delete, "Found branches missing upstream");
            }

            SyncProgress::NothingToDelete { repository } => {
                tracing::warn!(repo = %repository, "No branches to delete");
            }

            SyncProgress::WouldDelete { repository, branch } => {
                tracing::info!(repo = %repository, branch = %branch, "[DRY RUN] Would delete branch");
            }

            SyncProgress::DeletedBranch { repository, branch } => {
                tracing::info!(repo = %repository, branch = %branch, "Deleted branch");
            }

            SyncProgress::DeleteError {
                repository,
                branch,
                error,
            } => {
                tracing::error!(repo = %repository, branch = %branch, error = %error, "Failed to delete branch");
            }

            SyncProgress::PairSkipped {
                source,
                mirror,
                error,
            } => {
                tracing::error!(
                    github = %source,
                    codeberg = %mirror,
                    error = %error,
                    "Skipping repository pair"
                );
            }

            SyncProgress::PairComplete {
                repository,
                deleted,
                would_delete,
                failed,
            } => {
                tracing::debug!(repo = %repository, deleted, would_delete, failed, "Pair complete");
            }

            SyncProgress::Interrupted { remaining } => {
                tracing::warn!(remaining, "Shutdown requested, skipping remaining pairs");
            }

            SyncProgress::SyncComplete {
                synced,
                skipped,
                deleted,
                failed,
            } => {
                tracing::info!(synced, skipped, deleted, failed, "Done synchronizing branches");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
