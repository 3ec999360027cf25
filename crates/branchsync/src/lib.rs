//! Branchsync - prune stale branches from Codeberg mirrors of GitHub repositories.
//!
//! A mirror is pruned by listing the branches of the source repository and
//! of its mirror, then deleting from the mirror every branch the source no
//! longer has. Branches are never created or updated.
//!
//! # Example
//!
//! ```ignore
//! use branchsync::{Dialect, ForgeClient, Remote, RepositoryPair, SyncOptions, sync_pairs};
//!
//! let github = Remote::new(ForgeClient::new(Dialect::github(), &gh_token, timeout)?, "octo");
//! let codeberg = Remote::new(ForgeClient::new(Dialect::codeberg(), &cb_token, timeout)?, "octo");
//!
//! let report = sync_pairs(&github, &codeberg, &pairs, &SyncOptions::default(), None).await;
//! ```

pub mod forge;
pub mod http;
pub mod sync;

pub use forge::{Dialect, ForgeClient, ForgeError};
pub use http::{DEFAULT_TIMEOUT, HttpTransport};
pub use sync::{
    BranchSet, ProgressCallback, Remote, RepositoryPair, SyncError, SyncOptions, SyncProgress,
    SyncReport, sync_pair, sync_pairs,
};
