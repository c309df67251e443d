//! tree::render
//!
//! Text and JSON renderings of a tree widget, used by `rtree show`.

use serde::Serialize;

use super::node::{Accent, NodeId};
use super::widget::TreeWidget;

/// Serializable snapshot of a subtree.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNode {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub accent: Accent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
}

/// Snapshot the subtree rooted at `id`.
pub fn snapshot(tree: &dyn TreeWidget, id: NodeId) -> Option<RenderedNode> {
    let node = tree.node(id)?;
    Some(RenderedNode {
        key: node.key().to_string(),
        label: node.label().to_string(),
        tooltip: node.tooltip().map(str::to_string),
        accent: node.accent(),
        children: node
            .children()
            .iter()
            .filter_map(|child| snapshot(tree, *child))
            .collect(),
    })
}

/// Snapshot every root, in order.
pub fn snapshot_all(tree: &dyn TreeWidget) -> Vec<RenderedNode> {
    tree.roots()
        .into_iter()
        .filter_map(|root| snapshot(tree, root))
        .collect()
}

/// Render the whole tree as pretty JSON.
pub fn render_json(tree: &dyn TreeWidget) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot_all(tree))
}

/// Render the tree as indented text.
///
/// Collapsed nodes hide their children unless `all` is set. Expandable
/// nodes are marked `▾` (expanded) or `▸` (collapsed); the checked-out
/// branch is prefixed with `*`.
///
/// ```text
/// ▾ Branches
///   * main
///   ▸ feature
/// ▾ Tags
///     v1.0
/// ```
pub fn render_text(tree: &dyn TreeWidget, all: bool) -> String {
    let mut out = String::new();
    for root in tree.roots() {
        render_node(tree, root, 0, all, &mut out);
    }
    out
}

fn render_node(tree: &dyn TreeWidget, id: NodeId, depth: usize, all: bool, out: &mut String) {
    let Some(node) = tree.node(id) else {
        return;
    };

    let marker = match (node.has_children(), node.is_expanded() || all) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) if node.accent() == Accent::Current => "* ",
        (false, _) => "  ",
    };
    out.push_str(&"  ".repeat(depth));
    out.push_str(marker);
    out.push_str(node.label());
    out.push('\n');

    if node.is_expanded() || all {
        for child in node.children() {
            render_node(tree, *child, depth + 1, all, out);
        }
    }
}
