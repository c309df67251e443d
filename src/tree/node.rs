//! tree::node
//!
//! Tree node data. No synchronization logic lives here.

use serde::Serialize;

use crate::core::types::RootKind;

/// Handle to a node in a tree widget.
///
/// Handles carry a stamp so a handle to a destroyed node never aliases a
/// node later created in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) stamp: u32,
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}.{}", self.index, self.stamp)
    }
}

/// Visual style shared down a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    /// Font family name
    pub font: String,
}

impl NodeStyle {
    /// Style using the given font.
    pub fn with_font(font: impl Into<String>) -> Self {
        Self { font: font.into() }
    }
}

/// Per-node emphasis, independent of the inherited style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Plain,
    /// Grouping node (a branch path segment)
    Folder,
    /// The checked-out branch
    Current,
}

/// Description of a child to append.
///
/// # Example
///
/// ```
/// use repotree::tree::{Accent, NodeSpec};
///
/// let spec = NodeSpec::new("stash@{0}", "WIP on main")
///     .with_tooltip("2 hours ago")
///     .with_accent(Accent::Plain);
/// assert_eq!(spec.key, "stash@{0}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    /// Stable key, unique among siblings
    pub key: String,
    /// Display label
    pub label: String,
    /// Hover text
    pub tooltip: Option<String>,
    /// Emphasis
    pub accent: Accent,
}

impl NodeSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            tooltip: None,
            accent: Accent::Plain,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_accent(mut self, accent: Accent) -> Self {
        self.accent = accent;
        self
    }
}

/// A node in the hierarchy.
///
/// Children are ordered; order reflects the fetch order of the object set
/// that built them. The parent link is a non-owning back-reference.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) tooltip: Option<String>,
    pub(crate) accent: Accent,
    pub(crate) style: Option<NodeStyle>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) root_kind: Option<RootKind>,
    pub(crate) expanded: bool,
}

impl TreeNode {
    pub(crate) fn root(kind: RootKind) -> Self {
        Self {
            key: kind.key().to_string(),
            label: kind.label().to_string(),
            tooltip: None,
            accent: Accent::Plain,
            style: None,
            parent: None,
            children: Vec::new(),
            root_kind: Some(kind),
            expanded: false,
        }
    }

    pub(crate) fn child(parent: NodeId, spec: NodeSpec, style: Option<NodeStyle>) -> Self {
        Self {
            key: spec.key,
            label: spec.label,
            tooltip: spec.tooltip,
            accent: spec.accent,
            style,
            parent: Some(parent),
            children: Vec::new(),
            root_kind: None,
            expanded: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    pub fn style(&self) -> Option<&NodeStyle> {
        self.style.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The region tag, set only on root nodes.
    pub fn root_kind(&self) -> Option<RootKind> {
        self.root_kind
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}
