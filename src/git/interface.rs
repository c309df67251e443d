//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! repotree. No other module imports `git2` directly; everything above this
//! layer sees the strong types from [`crate::core`].
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::CheckoutConflict`]: Checkout would overwrite local changes
//! - [`GitError::BareRepo`]: Operation needs a working directory
//!
//! # Example
//!
//! ```ignore
//! use repotree::git::Git;
//! use std::path::Path;
//!
//! let mut git = Git::open(Path::new("."))?;
//! for branch in git.list_branches()? {
//!     println!("{} {}", branch.tip.short(7), branch.name);
//! }
//! let stashes = git.list_stashes()?;
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::objects::{BranchInfo, StashInfo, TagInfo};
use crate::core::types::{BranchName, Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("operation requires a working directory, repository is bare")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Checkout refused because it would clobber local changes.
    #[error("cannot check out {branch}: {message}")]
    CheckoutConflict {
        /// Branch being checked out
        branch: String,
        /// libgit2's description of the conflict
        message: String,
    },

    /// A value read from the repository failed validation.
    #[error("invalid value from repository: {0}")]
    InvalidValue(#[from] TypeError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound if context.starts_with("refs/") => GitError::RefNotFound {
                refname: context.to_string(),
            },
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. All repository
/// reads and writes flow through this interface.
///
/// `Git` wraps a `git2::Repository`, which is `Send` but not `Sync`; open a
/// fresh handle on whichever thread does the work.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository. Bare repositories are accepted; operations
    /// that need a working directory report [`GitError::BareRepo`].
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Path to the working directory, if the repository has one.
    pub fn work_dir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        match head.shorthand() {
            Some(name) if head.is_branch() => Ok(Some(BranchName::new(name)?)),
            _ => Ok(None),
        }
    }

    // =========================================================================
    // Object Enumeration
    // =========================================================================

    /// List all local branches in ref-name order.
    ///
    /// Branches whose names fail validation or whose tip is not a commit are
    /// skipped rather than failing the whole listing.
    pub fn list_branches(&self) -> Result<Vec<BranchInfo>, GitError> {
        let branches = self
            .repo
            .branches(Some(git2::BranchType::Local))
            .map_err(|e| GitError::from_git2(e, "branches"))?;

        let mut result = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(|e| GitError::from_git2(e, "branches"))?;

            let Some(name) = branch.name().ok().flatten() else {
                continue; // non-UTF8 name
            };
            let Ok(name) = BranchName::new(name) else {
                continue;
            };
            let Ok(commit) = branch.get().peel_to_commit() else {
                continue;
            };

            let mut info = BranchInfo::new(name, Oid::new(commit.id().to_string())?)
                .with_summary(commit.summary().unwrap_or(""));
            if branch.is_head() {
                info = info.at_head();
            }
            result.push(info);
        }

        Ok(result)
    }

    /// List all tags, sorted by name.
    ///
    /// Annotated tags report their message and the object they point to;
    /// lightweight tags report the ref target directly.
    pub fn list_tags(&self) -> Result<Vec<TagInfo>, GitError> {
        let mut raw: Vec<(String, git2::Oid)> = Vec::new();
        self.repo
            .tag_foreach(|oid, name| {
                let name = String::from_utf8_lossy(name);
                if let Some(short) = name.strip_prefix("refs/tags/") {
                    raw.push((short.to_string(), oid));
                }
                true
            })
            .map_err(|e| GitError::from_git2(e, "tags"))?;
        raw.sort_by(|a, b| a.0.cmp(&b.0));

        let mut tags = Vec::with_capacity(raw.len());
        for (name, oid) in raw {
            let (target, message) = match self.repo.find_tag(oid) {
                Ok(tag) => (tag.target_id(), tag.message().map(|m| m.trim().to_string())),
                Err(_) => (oid, None),
            };
            tags.push(TagInfo {
                name,
                target: Oid::new(target.to_string())?,
                message,
            });
        }

        Ok(tags)
    }

    /// List stash entries, newest first (`stash@{0}` first).
    ///
    /// Takes `&mut self` because libgit2's stash iteration requires a
    /// mutable repository handle.
    pub fn list_stashes(&mut self) -> Result<Vec<StashInfo>, GitError> {
        let mut raw: Vec<(usize, String, git2::Oid)> = Vec::new();
        self.repo
            .stash_foreach(|index, message, oid| {
                raw.push((index, message.to_string(), *oid));
                true
            })
            .map_err(|e| GitError::from_git2(e, "stash"))?;

        let mut stashes = Vec::with_capacity(raw.len());
        for (index, message, oid) in raw {
            let time = self
                .repo
                .find_commit(oid)
                .ok()
                .and_then(|commit| DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0));
            stashes.push(StashInfo {
                index,
                message,
                oid: Oid::new(oid.to_string())?,
                time,
            });
        }

        Ok(stashes)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Check out a local branch and point HEAD at it.
    ///
    /// Uses a safe checkout: files with local modifications are never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// - [`GitError::BareRepo`] if there is no working directory
    /// - [`GitError::RefNotFound`] if the branch doesn't exist
    /// - [`GitError::CheckoutConflict`] if local changes would be lost
    pub fn checkout_branch(&self, branch: &BranchName) -> Result<(), GitError> {
        if self.repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        let refname = format!("refs/heads/{}", branch);
        let reference = self
            .repo
            .find_reference(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;
        let commit = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, &refname))?;

        let mut opts = git2::build::CheckoutBuilder::new();
        opts.safe();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut opts))
            .map_err(|e| match e.code() {
                git2::ErrorCode::Conflict => GitError::CheckoutConflict {
                    branch: branch.to_string(),
                    message: e.message().to_string(),
                },
                _ => GitError::from_git2(e, &refname),
            })?;

        self.repo
            .set_head(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;

        Ok(())
    }
}
