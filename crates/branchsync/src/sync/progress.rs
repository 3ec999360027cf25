//! Progress reporting types for sync operations.
//!
//! Every observable step is emitted as a [`SyncProgress`] event through a
//! caller-supplied [`ProgressCallback`]; the CLI turns these into log records.
//! The only records the library writes itself are `tracing::debug!` lines for
//! outgoing HTTP requests.

/// Progress events emitted while listing and pruning branches.
///
/// `repository` fields hold `owner/name` of the repository on the remote
/// named by `remote`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting a run over the configured repository pairs.
    SyncingPairs {
        /// Number of configured pairs.
        count: usize,
        /// Whether deletions are simulated.
        dry_run: bool,
    },

    /// Starting work on one repository pair.
    PairStarted {
        /// `owner/name` on the source remote.
        source: String,
        /// `owner/name` on the mirror remote.
        mirror: String,
    },

    /// Starting to list branches of a repository.
    FetchingBranches { remote: String, repository: String },

    /// Fetched one page of branches.
    FetchedPage {
        remote: String,
        repository: String,
        /// Page number (1-indexed).
        page: u32,
        /// Number of branches on this page.
        count: usize,
        /// Distinct branch names collected so far.
        total_so_far: usize,
    },

    /// Finished listing branches of a repository.
    FetchComplete {
        remote: String,
        repository: String,
        /// Number of distinct branch names.
        total: usize,
    },

    /// Deletion candidates computed for a mirror repository.
    PlanReady {
        repository: String,
        /// Number of branches on the mirror but not on the source.
        to_delete: usize,
    },

    /// The mirror has no branches missing from the source.
    NothingToDelete { repository: String },

    /// Dry run: the branch would have been deleted.
    WouldDelete { repository: String, branch: String },

    /// The branch was deleted from the mirror.
    DeletedBranch { repository: String, branch: String },

    /// Deleting the branch failed; the sweep continues.
    DeleteError {
        repository: String,
        branch: String,
        /// Error message.
        error: String,
    },

    /// Listing failed on one side; the pair was skipped.
    PairSkipped {
        source: String,
        mirror: String,
        /// Error message.
        error: String,
    },

    /// Finished one repository pair.
    PairComplete {
        repository: String,
        deleted: usize,
        would_delete: usize,
        failed: usize,
    },

    /// Shutdown was requested; remaining pairs are not processed.
    Interrupted {
        /// Number of pairs left unprocessed.
        remaining: usize,
    },

    /// Finished all repository pairs.
    SyncComplete {
        /// Pairs whose branches were listed and reconciled.
        synced: usize,
        /// Pairs skipped because listing failed.
        skipped: usize,
        /// Branches deleted across all pairs.
        deleted: usize,
        /// Branch deletions that failed across all pairs.
        failed: usize,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// This is a convenience function to avoid repetitive `if let Some(cb) = ...` patterns.
///
/// # Example
///
/// ```
/// use branchsync::sync::{SyncProgress, emit};
///
/// emit(None, SyncProgress::NothingToDelete { repository: "octo/hello".into() });
/// ```
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
