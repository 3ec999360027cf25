//! Mirror reconciliation: delete mirror branches that are gone from the source.

use async_trait::async_trait;

use super::error::SyncError;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{BranchSet, DeletionOutcome, DeletionReport, SyncPlan};
use crate::forge::{ForgeClient, ForgeError, short_error_message};

/// Deletes branches from one mirror repository.
#[async_trait]
pub trait BranchDeleter: Send + Sync {
    /// Remote name used in error context, e.g. "Codeberg".
    fn remote(&self) -> &str;

    /// `owner/name` of the repository branches are deleted from.
    fn repository(&self) -> String;

    async fn delete_branch(&self, branch: &str) -> Result<(), ForgeError>;
}

/// A [`ForgeClient`] bound to one mirror repository.
pub struct MirrorRepository<'a> {
    client: &'a ForgeClient,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> MirrorRepository<'a> {
    pub fn new(client: &'a ForgeClient, owner: &'a str, repo: &'a str) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }
}

#[async_trait]
impl BranchDeleter for MirrorRepository<'_> {
    fn remote(&self) -> &str {
        self.client.name()
    }

    fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    async fn delete_branch(&self, branch: &str) -> Result<(), ForgeError> {
        self.client
            .delete_branch(self.owner, self.repo, branch)
            .await
    }
}

/// Delete every branch that exists on the mirror but not on the source.
///
/// Candidates are processed one at a time in lexicographic order. In dry-run
/// mode the deleter is never called. A failed deletion is recorded and the
/// sweep moves on; nothing is retried.
pub async fn reconcile(
    source: &BranchSet,
    mirror: &BranchSet,
    deleter: &dyn BranchDeleter,
    dry_run: bool,
    on_progress: Option<&ProgressCallback>,
) -> DeletionReport {
    let plan = SyncPlan::compute(source, mirror);
    let repository = deleter.repository();

    let mut report = DeletionReport {
        dry_run,
        outcomes: Vec::with_capacity(plan.to_delete.len()),
    };

    if plan.is_empty() {
        emit(on_progress, SyncProgress::NothingToDelete { repository });
        return report;
    }

    emit(
        on_progress,
        SyncProgress::PlanReady {
            repository: repository.clone(),
            to_delete: plan.to_delete.len(),
        },
    );

    for branch in plan.to_delete {
        if dry_run {
            emit(
                on_progress,
                SyncProgress::WouldDelete {
                    repository: repository.clone(),
                    branch: branch.clone(),
                },
            );
            report.outcomes.push(DeletionOutcome::WouldDelete(branch));
            continue;
        }

        match deleter.delete_branch(&branch).await {
            Ok(()) => {
                emit(
                    on_progress,
                    SyncProgress::DeletedBranch {
                        repository: repository.clone(),
                        branch: branch.clone(),
                    },
                );
                report.outcomes.push(DeletionOutcome::Deleted(branch));
            }
            Err(e) => {
                emit(
                    on_progress,
                    SyncProgress::DeleteError {
                        repository: repository.clone(),
                        branch: branch.clone(),
                        error: short_error_message(&e),
                    },
                );
                let error = SyncError::Deletion {
                    remote: deleter.remote().to_string(),
                    repository: repository.clone(),
                    branch: branch.clone(),
                    source: e,
                };
                report.outcomes.push(DeletionOutcome::Failed { branch, error });
            }
        }
    }

    report
}
