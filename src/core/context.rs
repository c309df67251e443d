//! core::context
//!
//! The handle identifying the currently open repository.
//!
//! A [`RepositoryContext`] is created by the host each time a repository is
//! opened (or reopened) and handed to the tree controller. It is read-only
//! from the tree's point of view. Every context gets a process-unique id so
//! results fetched against a replaced context can be recognised and dropped.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, cheaply clonable handle to an open repository.
///
/// # Example
///
/// ```
/// use repotree::core::context::RepositoryContext;
///
/// let first = RepositoryContext::new("/tmp/repo");
/// let again = RepositoryContext::new("/tmp/repo");
///
/// // Same path, but a distinct context: reopening invalidates the old one.
/// assert_ne!(first.id(), again.id());
/// assert_eq!(first.clone().id(), first.id());
/// ```
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    id: u64,
    path: PathBuf,
}

impl RepositoryContext {
    /// Create a context for the repository at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
                path: path.into(),
            }),
        }
    }

    /// Process-unique id of this context. Never zero.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Path the repository was opened from.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl PartialEq for RepositoryContext {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for RepositoryContext {}
