//! Errors surfaced by the sync engine.

use thiserror::Error;

use crate::forge::ForgeError;

/// A forge error together with the remote, repository and branch it concerns.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing the branches of one side of a pair failed.
    #[error("failed to list branches of {remote} repository {repository}: {source}")]
    Listing {
        remote: String,
        /// `owner/name`
        repository: String,
        source: ForgeError,
    },

    /// Deleting one branch from the mirror failed.
    #[error("failed to delete branch '{branch}' from {remote} repository {repository}: {source}")]
    Deletion {
        remote: String,
        /// `owner/name`
        repository: String,
        branch: String,
        source: ForgeError,
    },
}

impl SyncError {
    /// The underlying forge error.
    #[must_use]
    pub fn forge_error(&self) -> &ForgeError {
        match self {
            SyncError::Listing { source, .. } | SyncError::Deletion { source, .. } => source,
        }
    }
}
