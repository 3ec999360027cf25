//! Sync engine: list both sides of each repository pair and prune the mirror.

use std::sync::atomic::Ordering;

use chrono::Utc;

use super::error::SyncError;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::reconcile::{MirrorRepository, reconcile};
use super::types::{
    BranchSet, DeletionReport, PairReport, Remote, RepositoryPair, SyncOptions, SyncReport,
};
use crate::forge::short_error_message;

async fn list_side(
    remote: &Remote,
    repo: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<BranchSet, SyncError> {
    remote
        .client
        .list_branches(&remote.owner, repo, on_progress)
        .await
        .map_err(|source| SyncError::Listing {
            remote: remote.name().to_string(),
            repository: remote.full_name(repo),
            source,
        })
}

/// Synchronize one repository pair.
///
/// The source is listed first, then the mirror; if either listing fails no
/// deletion is attempted and the listing error is returned.
pub async fn sync_pair(
    source: &Remote,
    mirror: &Remote,
    pair: &RepositoryPair,
    dry_run: bool,
    on_progress: Option<&ProgressCallback>,
) -> Result<DeletionReport, SyncError> {
    let source_branches = list_side(source, &pair.source, on_progress).await?;
    let mirror_branches = list_side(mirror, &pair.mirror, on_progress).await?;

    let deleter = MirrorRepository::new(&mirror.client, &mirror.owner, &pair.mirror);
    Ok(reconcile(
        &source_branches,
        &mirror_branches,
        &deleter,
        dry_run,
        on_progress,
    )
    .await)
}

/// Synchronize every configured pair, one after another.
///
/// A pair whose branches cannot be listed is reported and skipped; the
/// remaining pairs are still processed. When `options.shutdown` is set the
/// run stops before the next pair and the report is marked interrupted.
pub async fn sync_pairs(
    source: &Remote,
    mirror: &Remote,
    pairs: &[RepositoryPair],
    options: &SyncOptions<'_>,
    on_progress: Option<&ProgressCallback>,
) -> SyncReport {
    let started_at = Utc::now();
    let mut reports = Vec::with_capacity(pairs.len());
    let mut interrupted = false;

    emit(
        on_progress,
        SyncProgress::SyncingPairs {
            count: pairs.len(),
            dry_run: options.dry_run,
        },
    );

    for (index, pair) in pairs.iter().enumerate() {
        if options
            .shutdown
            .is_some_and(|flag| flag.load(Ordering::Acquire))
        {
            emit(
                on_progress,
                SyncProgress::Interrupted {
                    remaining: pairs.len() - index,
                },
            );
            interrupted = true;
            break;
        }

        let source_name = source.full_name(&pair.source);
        let mirror_name = mirror.full_name(&pair.mirror);
        emit(
            on_progress,
            SyncProgress::PairStarted {
                source: source_name.clone(),
                mirror: mirror_name.clone(),
            },
        );

        let outcome = sync_pair(source, mirror, pair, options.dry_run, on_progress).await;

        match &outcome {
            Ok(report) => emit(
                on_progress,
                SyncProgress::PairComplete {
                    repository: mirror_name,
                    deleted: report.deleted(),
                    would_delete: report.would_delete(),
                    failed: report.failed(),
                },
            ),
            Err(e) => emit(
                on_progress,
                SyncProgress::PairSkipped {
                    source: source_name,
                    mirror: mirror_name,
                    error: match e {
                        SyncError::Listing {
                            remote,
                            repository,
                            source,
                        } => format!("{remote} {repository}: {}", short_error_message(source)),
                        other => other.to_string(),
                    },
                },
            ),
        }

        reports.push(PairReport {
            pair: pair.clone(),
            outcome,
        });
    }

    let report = SyncReport {
        started_at,
        finished_at: Utc::now(),
        dry_run: options.dry_run,
        pairs: reports,
        interrupted,
    };

    emit(
        on_progress,
        SyncProgress::SyncComplete {
            synced: report.synced(),
            skipped: report.skipped(),
            deleted: report.deleted(),
            failed: report.failed_deletions(),
        },
    );

    report
}
