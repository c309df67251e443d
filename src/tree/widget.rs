//! tree::widget
//!
//! The tree widget primitives the synchronization core is written against.
//!
//! # Design
//!
//! A tree widget is single-thread affine: it is only ever touched by the
//! thread that owns it. The trait therefore takes `&mut self` for every
//! mutation and is not required to be `Send`. Object sets and the
//! controller only use these primitives; how a node is drawn (fonts,
//! icons, tooltips) is the widget's business.
//!
//! Rebuilds must be atomic from the widget's point of view, so besides
//! `clear_children` the trait exposes detach / reattach / remove, which let
//! a rebuild set the old children aside and put them back if it fails.

use thiserror::Error;

use super::node::{NodeId, NodeSpec, NodeStyle, TreeNode};
use crate::core::types::RootKind;

/// Errors from tree mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not name a live node.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A sibling already uses this key.
    #[error("duplicate key '{key}' under '{parent}'")]
    DuplicateKey {
        /// Label of the parent node
        parent: String,
        /// The clashing key
        key: String,
    },

    /// Keys identify nodes and cannot be empty.
    #[error("node key cannot be empty")]
    EmptyKey,

    /// Reattaching children onto a node that already has some.
    #[error("node {0} already has children")]
    Occupied(NodeId),
}

/// Tree widget primitives.
pub trait TreeWidget {
    /// Create a top-level node tagged with `kind`, keyed and labelled after it.
    fn create_root(&mut self, kind: RootKind) -> NodeId;

    /// Top-level nodes, in creation order.
    fn roots(&self) -> Vec<NodeId>;

    /// Look a node up.
    fn node(&self, id: NodeId) -> Option<&TreeNode>;

    /// Append a child under `parent`.
    ///
    /// The child takes the parent's current style; no separate styling pass
    /// is needed for nodes added after the parent was styled.
    fn append_child(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId, TreeError>;

    /// Destroy every descendant of `node`.
    fn clear_children(&mut self, node: NodeId) -> Result<(), TreeError>;

    /// Unlink the children of `node` without destroying them.
    ///
    /// Detached subtrees stay alive until passed to `reattach_children` or
    /// `remove_subtrees`.
    fn detach_children(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError>;

    /// Put previously detached children back under an empty `node`.
    fn reattach_children(&mut self, node: NodeId, children: Vec<NodeId>)
        -> Result<(), TreeError>;

    /// Destroy detached subtrees.
    fn remove_subtrees(&mut self, detached: Vec<NodeId>);

    /// Set the style of a single node.
    fn apply_style(&mut self, node: NodeId, style: NodeStyle) -> Result<(), TreeError>;

    /// Expand or collapse one node.
    fn set_expanded(&mut self, node: NodeId, expanded: bool) -> Result<(), TreeError>;

    /// Expand every node.
    fn expand_all(&mut self);

    /// Collapse every node.
    fn collapse_all(&mut self);

    // =========================================================================
    // Provided queries
    // =========================================================================

    /// Parent of `id`, if it has one.
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(TreeNode::parent)
    }

    /// Children of `id`, in order. Empty for unknown nodes.
    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
    }

    /// Whether `id` has any children.
    fn has_children(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(TreeNode::has_children)
    }

    /// Walk parent links from `id` to its top-level ancestor.
    ///
    /// Returns `id` itself for a root, `None` if `id` is unknown.
    fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        self.node(current)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// The root tagged `kind`, if one exists.
    fn root(&self, kind: RootKind) -> Option<NodeId> {
        self.roots()
            .into_iter()
            .find(|id| self.node(*id).and_then(TreeNode::root_kind) == Some(kind))
    }

    /// Direct child of `parent` with the given key.
    fn find_child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.node(parent)?
            .children()
            .iter()
            .copied()
            .find(|child| self.node(*child).is_some_and(|n| n.key() == key))
    }

    /// First descendant of `ancestor` (depth-first, in order) with the given label.
    fn find_descendant(&self, ancestor: NodeId, label: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(ancestor).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if node.label() == label {
                return Some(id);
            }
            stack.extend(node.children().iter().rev().copied());
        }
        None
    }
}
