//! backend::traits
//!
//! The repository backend: where the object sets get their data.
//!
//! # Design
//!
//! The `RepoBackend` trait is async because listing objects touches the
//! disk (or, for a remote-backed provider, the network) and must never run
//! on the thread that owns the tree. Every method takes the
//! [`RepositoryContext`] the fetch was issued against.
//!
//! Backends:
//! - May fail; a failure is contained to the one object set that asked
//! - Never mutate the tree; they only return data
//!
//! # Example
//!
//! ```ignore
//! use repotree::backend::{RepoBackend, BackendError};
//! use repotree::core::context::RepositoryContext;
//!
//! async fn count_stashes(backend: &dyn RepoBackend, ctx: &RepositoryContext)
//!     -> Result<usize, BackendError>
//! {
//!     Ok(backend.stashes(ctx).await?.len())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::context::RepositoryContext;
use crate::core::objects::{BranchInfo, StashInfo, TagInfo};
use crate::git::GitError;

/// Errors from backend fetches.
///
/// Cloneable so a single failure can be both reported and returned
/// through a reload handle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The context does not point at a repository.
    #[error("not a repository: {0}")]
    NotARepo(String),

    /// The repository was found but reading it failed.
    #[error("repository read failed: {0}")]
    ReadFailed(String),

    /// The backend could not run the fetch at all.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl From<GitError> for BackendError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::NotARepo { path } => BackendError::NotARepo(path.display().to_string()),
            other => BackendError::ReadFailed(other.to_string()),
        }
    }
}

/// A source of repository objects.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; fetches for different object
/// sets run concurrently on the async runtime.
#[async_trait]
pub trait RepoBackend: Send + Sync {
    /// Backend name, for diagnostics (e.g., "git", "mock").
    fn name(&self) -> &'static str;

    /// List local branches.
    async fn branches(&self, ctx: &RepositoryContext) -> Result<Vec<BranchInfo>, BackendError>;

    /// List tags.
    async fn tags(&self, ctx: &RepositoryContext) -> Result<Vec<TagInfo>, BackendError>;

    /// List stash entries, newest first.
    async fn stashes(&self, ctx: &RepositoryContext) -> Result<Vec<StashInfo>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_a_repo_keeps_path() {
        let err: BackendError = GitError::NotARepo {
            path: PathBuf::from("/tmp/nowhere"),
        }
        .into();
        assert_eq!(err, BackendError::NotARepo("/tmp/nowhere".to_string()));
    }

    #[test]
    fn other_git_errors_are_read_failures() {
        let err: BackendError = GitError::Internal {
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, BackendError::ReadFailed(msg) if msg.contains("boom")));
    }
}
