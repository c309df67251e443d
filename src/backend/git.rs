//! backend::git
//!
//! Backend that reads objects from a local repository through the
//! [`crate::git`] doorway.
//!
//! libgit2 calls are blocking, so each fetch opens its own repository
//! handle inside `tokio::task::spawn_blocking`.

use async_trait::async_trait;

use super::traits::{BackendError, RepoBackend};
use crate::core::context::RepositoryContext;
use crate::core::objects::{BranchInfo, StashInfo, TagInfo};
use crate::git::{Git, GitError};

/// Reads branches, tags and stashes with git2.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitBackend;

impl GitBackend {
    /// Create a new git backend.
    pub fn new() -> Self {
        Self
    }
}

/// Run `read` against a freshly opened repository on the blocking pool.
async fn with_repo<T, F>(ctx: &RepositoryContext, read: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: FnOnce(&mut Git) -> Result<T, GitError> + Send + 'static,
{
    let path = ctx.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut git = Git::open(&path)?;
        read(&mut git)
    })
    .await
    .map_err(|e| BackendError::Unavailable(format!("fetch task failed: {e}")))?
    .map_err(BackendError::from)
}

#[async_trait]
impl RepoBackend for GitBackend {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn branches(&self, ctx: &RepositoryContext) -> Result<Vec<BranchInfo>, BackendError> {
        with_repo(ctx, |git| git.list_branches()).await
    }

    async fn tags(&self, ctx: &RepositoryContext) -> Result<Vec<TagInfo>, BackendError> {
        with_repo(ctx, |git| git.list_tags()).await
    }

    async fn stashes(&self, ctx: &RepositoryContext) -> Result<Vec<StashInfo>, BackendError> {
        with_repo(ctx, |git| git.list_stashes()).await
    }
}
