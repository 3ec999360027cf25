//! Branch pruning for mirrored repositories.
//!
//! A run walks the configured repository pairs one at a time. For each pair
//! both sides are listed, and every branch present on the mirror but absent
//! from the source is deleted from the mirror (or only reported, in dry-run
//! mode).
//!
//! # Module Structure
//!
//! - [`types`] - Core types: `BranchSet`, `RepositoryPair`, `SyncOptions`, reports
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`reconcile`] - Deletion sweep for one mirror: `reconcile()`, `BranchDeleter`
//! - [`engine`] - Pair orchestration: `sync_pair()`, `sync_pairs()`
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use branchsync::forge::{Dialect, ForgeClient};
//! use branchsync::sync::{Remote, RepositoryPair, SyncOptions, sync_pairs};
//!
//! # async fn run() -> Result<(), branchsync::forge::ForgeError> {
//! let timeout = Duration::from_secs(30);
//! let github = Remote::new(ForgeClient::new(Dialect::github(), "ghp_...", timeout)?, "octo");
//! let codeberg = Remote::new(ForgeClient::new(Dialect::codeberg(), "...", timeout)?, "octo");
//!
//! let pairs = [RepositoryPair::new("hello", "hello")];
//! let options = SyncOptions { dry_run: true, ..Default::default() };
//! let report = sync_pairs(&github, &codeberg, &pairs, &options, None).await;
//! println!("{} pair(s) synced", report.synced());
//! # Ok(())
//! # }
//! ```

pub mod engine;
mod error;
pub mod progress;
pub mod reconcile;
pub mod types;

pub use error::SyncError;

// Re-export types
pub use types::{
    BranchSet, Credentials, DeletionOutcome, DeletionReport, PairReport, Remote, RepositoryPair,
    SyncOptions, SyncPlan, SyncReport,
};

// Re-export progress types
pub use progress::{ProgressCallback, SyncProgress, emit};

pub use engine::{sync_pair, sync_pairs};
pub use reconcile::{BranchDeleter, MirrorRepository, reconcile};
