//! tree::model
//!
//! In-memory tree widget.
//!
//! `TreeModel` is a slot arena of [`TreeNode`]s. It is what the `rtree`
//! binary renders from, and what the tests assert against. Freed slots are
//! reused with a bumped stamp so stale [`NodeId`]s are rejected.

use super::node::{NodeId, NodeSpec, NodeStyle, TreeNode};
use super::widget::{TreeError, TreeWidget};
use crate::core::types::RootKind;

#[derive(Debug, Default)]
struct Slot {
    stamp: u32,
    node: Option<TreeNode>,
}

/// Arena-backed tree widget.
///
/// # Example
///
/// ```
/// use repotree::core::types::RootKind;
/// use repotree::tree::{NodeSpec, TreeModel, TreeWidget};
///
/// let mut tree = TreeModel::new();
/// let tags = tree.create_root(RootKind::Tags);
/// let v1 = tree.append_child(tags, NodeSpec::new("v1.0", "v1.0")).unwrap();
///
/// assert_eq!(tree.root_of(v1), Some(tags));
/// assert_eq!(tree.labels(tags), vec!["v1.0"]);
/// ```
#[derive(Debug, Default)]
pub struct TreeModel {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
}

impl TreeModel {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes, roots included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Whether the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels of the direct children of `id`, in order.
    pub fn labels(&self, id: NodeId) -> Vec<String> {
        self.children(id)
            .into_iter()
            .filter_map(|child| self.node(child).map(|n| n.label().to_string()))
            .collect()
    }

    fn alloc(&mut self, node: TreeNode) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                stamp: slot.stamp,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            stamp: 0,
            node: Some(node),
        });
        NodeId { index, stamp: 0 }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode, TreeError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.stamp == id.stamp)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Free `id` and every node below it.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|slot| slot.stamp == current.stamp)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.stamp = slot.stamp.wrapping_add(1);
                self.free.push(current.index);
                stack.extend(node.children);
            }
        }
    }

    fn live_ids(&self) -> Vec<NodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.node.is_some())
            .map(|(index, slot)| NodeId {
                index: index as u32,
                stamp: slot.stamp,
            })
            .collect()
    }
}

impl TreeWidget for TreeModel {
    fn create_root(&mut self, kind: RootKind) -> NodeId {
        let id = self.alloc(TreeNode::root(kind));
        self.roots.push(id);
        id
    }

    fn roots(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.stamp == id.stamp)
            .and_then(|slot| slot.node.as_ref())
    }

    fn append_child(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId, TreeError> {
        if spec.key.is_empty() {
            return Err(TreeError::EmptyKey);
        }
        let parent_node = self.node(parent).ok_or(TreeError::UnknownNode(parent))?;
        if self.find_child(parent, &spec.key).is_some() {
            return Err(TreeError::DuplicateKey {
                parent: parent_node.label().to_string(),
                key: spec.key,
            });
        }

        let style = parent_node.style().cloned();
        let id = self.alloc(TreeNode::child(parent, spec, style));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn clear_children(&mut self, node: NodeId) -> Result<(), TreeError> {
        let children = self.detach_children(node)?;
        self.remove_subtrees(children);
        Ok(())
    }

    fn detach_children(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError> {
        Ok(std::mem::take(&mut self.node_mut(node)?.children))
    }

    fn reattach_children(
        &mut self,
        node: NodeId,
        children: Vec<NodeId>,
    ) -> Result<(), TreeError> {
        if let Some(missing) = children.iter().find(|c| self.node(**c).is_none()) {
            return Err(TreeError::UnknownNode(*missing));
        }
        let target = self.node_mut(node)?;
        if !target.children.is_empty() {
            return Err(TreeError::Occupied(node));
        }
        target.children = children;
        Ok(())
    }

    fn remove_subtrees(&mut self, detached: Vec<NodeId>) {
        for id in detached {
            self.free_subtree(id);
        }
    }

    fn apply_style(&mut self, node: NodeId, style: NodeStyle) -> Result<(), TreeError> {
        self.node_mut(node)?.style = Some(style);
        Ok(())
    }

    fn set_expanded(&mut self, node: NodeId, expanded: bool) -> Result<(), TreeError> {
        self.node_mut(node)?.expanded = expanded;
        Ok(())
    }

    fn expand_all(&mut self) {
        for id in self.live_ids() {
            let _ = self.set_expanded(id, true);
        }
    }

    fn collapse_all(&mut self) {
        for id in self.live_ids() {
            let _ = self.set_expanded(id, false);
        }
    }
}
