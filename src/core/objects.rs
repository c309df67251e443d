//! core::objects
//!
//! Records for the repository objects mirrored into the tree.
//!
//! These are plain data produced by a backend (the real `git` doorway or a
//! test double) and consumed by the object sets that map them onto nodes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{BranchName, Oid};

/// A local branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    /// Branch name
    pub name: BranchName,
    /// Commit the branch points to
    pub tip: Oid,
    /// First line of the tip commit's message
    pub summary: String,
    /// Whether HEAD is on this branch
    pub is_head: bool,
}

impl BranchInfo {
    /// Create a branch record with an empty summary, not checked out.
    pub fn new(name: BranchName, tip: Oid) -> Self {
        Self {
            name,
            tip,
            summary: String::new(),
            is_head: false,
        }
    }

    /// Set the tip commit summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Mark this branch as the one HEAD points at.
    pub fn at_head(mut self) -> Self {
        self.is_head = true;
        self
    }
}

/// A tag (lightweight or annotated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    /// Tag name without the `refs/tags/` prefix
    pub name: String,
    /// Object the tag ultimately points to
    pub target: Oid,
    /// Annotation message, for annotated tags
    pub message: Option<String>,
}

/// A stash entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StashInfo {
    /// Position in the stash list (`stash@{index}`)
    pub index: usize,
    /// Stash message as recorded by git
    pub message: String,
    /// Stash commit
    pub oid: Oid,
    /// When the stash was created, if known
    pub time: Option<DateTime<Utc>>,
}

impl StashInfo {
    /// The reflog-style selector for this entry, e.g. `stash@{0}`.
    pub fn selector(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}
