//! sync::sets
//!
//! The concrete object sets: branches, tags and stashes.

use async_trait::async_trait;
use std::sync::Arc;

use super::object_set::ObjectSet;
use crate::backend::{BackendError, RepoBackend};
use crate::core::context::RepositoryContext;
use crate::core::objects::{BranchInfo, StashInfo, TagInfo};
use crate::core::types::RootKind;
use crate::tree::{Accent, NodeId, NodeSpec, TreeError, TreeWidget};

/// Abbreviated object id length used in tooltips.
const SHORT_OID: usize = 7;

// =============================================================================
// Branches
// =============================================================================

/// Local branches.
///
/// With grouping on, `feature/auth/login` lands under folder nodes
/// `feature` and `auth`. The leaf always carries the full branch name as
/// its label, so activating it names a real branch. Folder keys are
/// prefixed `dir:`, which no branch name can contain.
pub struct BranchSet {
    backend: Arc<dyn RepoBackend>,
    group: bool,
}

impl BranchSet {
    pub fn new(backend: Arc<dyn RepoBackend>, group: bool) -> Self {
        Self { backend, group }
    }

    fn folder(
        tree: &mut dyn TreeWidget,
        parent: NodeId,
        segment: &str,
    ) -> Result<NodeId, TreeError> {
        let key = format!("dir:{segment}");
        match tree.find_child(parent, &key) {
            Some(existing) => Ok(existing),
            None => tree.append_child(
                parent,
                NodeSpec::new(key, segment).with_accent(Accent::Folder),
            ),
        }
    }
}

#[async_trait]
impl ObjectSet for BranchSet {
    type Item = BranchInfo;

    fn kind(&self) -> RootKind {
        RootKind::Branches
    }

    async fn fetch(&self, ctx: &RepositoryContext) -> Result<Vec<BranchInfo>, BackendError> {
        self.backend.branches(ctx).await
    }

    fn add_child(
        &self,
        tree: &mut dyn TreeWidget,
        parent: NodeId,
        item: &BranchInfo,
    ) -> Result<NodeId, TreeError> {
        let mut parent = parent;
        if self.group {
            let segments: Vec<&str> = item.name.segments().collect();
            if let Some((_, folders)) = segments.split_last() {
                for segment in folders {
                    parent = Self::folder(tree, parent, segment)?;
                }
            }
        }

        let name = item.name.as_str();
        let mut tooltip = item.tip.short(SHORT_OID).to_string();
        if !item.summary.is_empty() {
            tooltip.push(' ');
            tooltip.push_str(&item.summary);
        }
        let accent = if item.is_head {
            Accent::Current
        } else {
            Accent::Plain
        };

        tree.append_child(
            parent,
            NodeSpec::new(name, name)
                .with_tooltip(tooltip)
                .with_accent(accent),
        )
    }
}

// =============================================================================
// Tags
// =============================================================================

/// Tags, lightweight and annotated.
pub struct TagSet {
    backend: Arc<dyn RepoBackend>,
}

impl TagSet {
    pub fn new(backend: Arc<dyn RepoBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ObjectSet for TagSet {
    type Item = TagInfo;

    fn kind(&self) -> RootKind {
        RootKind::Tags
    }

    async fn fetch(&self, ctx: &RepositoryContext) -> Result<Vec<TagInfo>, BackendError> {
        self.backend.tags(ctx).await
    }

    fn add_child(
        &self,
        tree: &mut dyn TreeWidget,
        parent: NodeId,
        item: &TagInfo,
    ) -> Result<NodeId, TreeError> {
        let target = item.target.short(SHORT_OID);
        let tooltip = match item.message.as_deref().and_then(|m| m.lines().next()) {
            Some(first_line) if !first_line.is_empty() => format!("{target} {first_line}"),
            _ => target.to_string(),
        };
        tree.append_child(
            parent,
            NodeSpec::new(item.name.as_str(), item.name.as_str()).with_tooltip(tooltip),
        )
    }
}

// =============================================================================
// Stashes
// =============================================================================

/// Stash entries, newest first. Keyed by selector since messages repeat.
pub struct StashSet {
    backend: Arc<dyn RepoBackend>,
}

impl StashSet {
    pub fn new(backend: Arc<dyn RepoBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ObjectSet for StashSet {
    type Item = StashInfo;

    fn kind(&self) -> RootKind {
        RootKind::Stashes
    }

    async fn fetch(&self, ctx: &RepositoryContext) -> Result<Vec<StashInfo>, BackendError> {
        self.backend.stashes(ctx).await
    }

    fn add_child(
        &self,
        tree: &mut dyn TreeWidget,
        parent: NodeId,
        item: &StashInfo,
    ) -> Result<NodeId, TreeError> {
        let tooltip = match item.time {
            Some(time) => format!("{} {}", item.selector(), time.format("%Y-%m-%d %H:%M")),
            None => item.selector(),
        };
        tree.append_child(
            parent,
            NodeSpec::new(item.selector(), item.message.as_str()).with_tooltip(tooltip),
        )
    }
}
