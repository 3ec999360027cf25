//! Core sync types: branch sets, repository pairs and run reports.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};

use super::error::SyncError;
use crate::forge::ForgeClient;

/// Branch names of one repository at one point in time.
///
/// Iteration order is lexicographic so plans and logs are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSet(BTreeSet<String>);

impl BranchSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Names in `self` that are not in `other`, in lexicographic order.
    #[must_use]
    pub fn difference(&self, other: &BranchSet) -> Vec<String> {
        self.0.difference(&other.0).cloned().collect()
    }

    #[must_use]
    pub fn is_subset(&self, other: &BranchSet) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl<S: Into<String>> FromIterator<S> for BranchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for BranchSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// A source repository and the mirror that should track it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPair {
    /// Repository name on the source remote.
    pub source: String,
    /// Repository name on the mirror remote.
    pub mirror: String,
}

impl RepositoryPair {
    pub fn new(source: impl Into<String>, mirror: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mirror: mirror.into(),
        }
    }
}

/// Account name and access token for one remote.
///
/// The token is opaque and never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A forge client bound to the account that owns the synchronized repositories.
#[derive(Clone)]
pub struct Remote {
    pub client: ForgeClient,
    pub owner: String,
}

impl Remote {
    pub fn new(client: ForgeClient, owner: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
        }
    }

    /// Remote name, e.g. "GitHub".
    #[must_use]
    pub fn name(&self) -> &str {
        self.client.name()
    }

    /// `owner/repo` as displayed in progress events.
    #[must_use]
    pub fn full_name(&self, repo: &str) -> String {
        format!("{}/{}", self.owner, repo)
    }
}

/// Options for a sync run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncOptions<'a> {
    /// Report deletions without performing them.
    pub dry_run: bool,
    /// Checked between pairs; when set, remaining pairs are not processed.
    pub shutdown: Option<&'a AtomicBool>,
}

/// Branches to delete from a mirror: `mirror − source`, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_delete: Vec<String>,
}

impl SyncPlan {
    #[must_use]
    pub fn compute(source: &BranchSet, mirror: &BranchSet) -> Self {
        Self {
            to_delete: mirror.difference(source),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
    }
}

/// What happened to one deletion candidate.
#[derive(Debug)]
pub enum DeletionOutcome {
    /// Dry run: the branch would have been deleted.
    WouldDelete(String),
    /// The branch was deleted.
    Deleted(String),
    /// Deleting the branch failed.
    Failed { branch: String, error: SyncError },
}

impl DeletionOutcome {
    #[must_use]
    pub fn branch(&self) -> &str {
        match self {
            DeletionOutcome::WouldDelete(branch) | DeletionOutcome::Deleted(branch) => branch,
            DeletionOutcome::Failed { branch, .. } => branch,
        }
    }
}

/// Result of reconciling one mirror repository.
///
/// An empty outcome list means there was nothing to delete.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub dry_run: bool,
    pub outcomes: Vec<DeletionOutcome>,
}

impl DeletionReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, DeletionOutcome::Deleted(_)))
    }

    #[must_use]
    pub fn would_delete(&self) -> usize {
        self.count(|o| matches!(o, DeletionOutcome::WouldDelete(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeletionOutcome::Failed { .. }))
    }

    /// At least one deletion in an otherwise completed sweep failed.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        self.failed() > 0
    }

    /// Failed deletions with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SyncError)> {
        self.outcomes.iter().filter_map(|o| match o {
            DeletionOutcome::Failed { branch, error } => Some((branch.as_str(), error)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&DeletionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Result of one repository pair.
#[derive(Debug)]
pub struct PairReport {
    pub pair: RepositoryPair,
    /// `Err` when either side's branches could not be listed.
    pub outcome: Result<DeletionReport, SyncError>,
}

/// Result of a whole run.
#[derive(Debug)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub pairs: Vec<PairReport>,
    /// Shutdown was requested before every pair was processed.
    pub interrupted: bool,
}

impl SyncReport {
    #[must_use]
    pub fn synced(&self) -> usize {
        self.pairs.iter().filter(|p| p.outcome.is_ok()).count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.pairs.iter().filter(|p| p.outcome.is_err()).count()
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.reports().map(DeletionReport::deleted).sum()
    }

    #[must_use]
    pub fn failed_deletions(&self) -> usize {
        self.reports().map(DeletionReport::failed).sum()
    }

    /// Any pair was skipped, any deletion failed, or the run was interrupted.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.interrupted || self.skipped() > 0 || self.failed_deletions() > 0
    }

    fn reports(&self) -> impl Iterator<Item = &DeletionReport> {
        self.pairs.iter().filter_map(|p| p.outcome.as_ref().ok())
    }
}
