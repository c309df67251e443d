//! sync::object_set
//!
//! The `ObjectSet` trait: one kind of repository object mirrored under
//! one root.
//!
//! # Design
//!
//! An object set is three operations over one item type:
//!
//! - `fetch` reads the collection from the backend, off the owning thread
//! - `reset` prepares the root for a rebuild
//! - `add_child` maps one item onto the tree, in fetch order
//!
//! Sets never decide *whether* a result is applied; generation and
//! context checks live in [`super::ObjectSetSynchronizer`]. A set only
//! says how its items look in the tree.
//!
//! # Example
//!
//! ```ignore
//! struct Remotes { backend: Arc<dyn RemoteLister> }
//!
//! #[async_trait]
//! impl ObjectSet for Remotes {
//!     type Item = String;
//!
//!     fn kind(&self) -> RootKind { RootKind::Branches }
//!
//!     async fn fetch(&self, ctx: &RepositoryContext) -> Result<Vec<String>, BackendError> {
//!         self.backend.remotes(ctx).await
//!     }
//!
//!     fn add_child(&self, tree: &mut dyn TreeWidget, parent: NodeId, item: &String)
//!         -> Result<NodeId, TreeError>
//!     {
//!         tree.append_child(parent, NodeSpec::new(item.as_str(), item.as_str()))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::backend::BackendError;
use crate::core::context::RepositoryContext;
use crate::core::types::RootKind;
use crate::tree::{NodeId, TreeError, TreeWidget};

/// A refreshable collection of one object kind.
#[async_trait]
pub trait ObjectSet: Send + Sync + 'static {
    /// One fetched object.
    type Item: Send + 'static;

    /// The region this set fills.
    fn kind(&self) -> RootKind;

    /// Read the collection for `ctx`.
    async fn fetch(&self, ctx: &RepositoryContext) -> Result<Vec<Self::Item>, BackendError>;

    /// Clear the root ahead of a rebuild with `items`.
    ///
    /// The default destroys every child of `root`.
    fn reset(
        &self,
        tree: &mut dyn TreeWidget,
        root: NodeId,
        items: &[Self::Item],
    ) -> Result<(), TreeError> {
        let _ = items;
        tree.clear_children(root)
    }

    /// Map one item into the tree under `parent`, returning the item's node.
    fn add_child(
        &self,
        tree: &mut dyn TreeWidget,
        parent: NodeId,
        item: &Self::Item,
    ) -> Result<NodeId, TreeError>;
}
