//! sync::registry
//!
//! An ordered collection of synchronizers under one tree.
//!
//! Sets are independent: registration order only fixes the order in which
//! reloads are issued. No set may share a root with another.

use thiserror::Error;

use super::object_set::ObjectSet;
use super::synchronizer::{ObjectSetSynchronizer, ReloadHandle};
use crate::core::context::RepositoryContext;
use crate::core::types::RootKind;
use crate::tree::NodeId;

/// Errors from registering a set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("root {root} is already owned by the {owner} set")]
    RootAlreadyOwned { root: NodeId, owner: RootKind },
}

/// Type-erased view of a synchronizer, whatever its item type.
pub trait RefreshableSet {
    fn kind(&self) -> RootKind;
    fn root(&self) -> NodeId;
    fn bind(&mut self, ctx: RepositoryContext);
    fn reload_async(&self) -> ReloadHandle;
    fn generation(&self) -> u64;
}

impl<S: ObjectSet> RefreshableSet for ObjectSetSynchronizer<S> {
    fn kind(&self) -> RootKind {
        ObjectSetSynchronizer::kind(self)
    }

    fn root(&self) -> NodeId {
        ObjectSetSynchronizer::root(self)
    }

    fn bind(&mut self, ctx: RepositoryContext) {
        ObjectSetSynchronizer::bind(self, ctx)
    }

    fn reload_async(&self) -> ReloadHandle {
        ObjectSetSynchronizer::reload_async(self)
    }

    fn generation(&self) -> u64 {
        ObjectSetSynchronizer::generation(self)
    }
}

/// Registered synchronizers, in registration order.
#[derive(Default)]
pub struct TreeSetRegistry {
    sets: Vec<Box<dyn RefreshableSet>>,
}

impl TreeSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set.
    ///
    /// # Errors
    ///
    /// `RootAlreadyOwned` if a registered set already owns the same root.
    pub fn register(&mut self, set: impl RefreshableSet + 'static) -> Result<(), RegistryError> {
        if let Some(owner) = self.sets.iter().find(|s| s.root() == set.root()) {
            return Err(RegistryError::RootAlreadyOwned {
                root: set.root(),
                owner: owner.kind(),
            });
        }
        log::debug!("registered {} set", set.kind());
        self.sets.push(Box::new(set));
        Ok(())
    }

    /// Bind every set to `ctx`. Does not fetch.
    pub fn bind_all(&mut self, ctx: &RepositoryContext) {
        for set in &mut self.sets {
            set.bind(ctx.clone());
        }
    }

    /// Issue a reload on every set, in registration order.
    pub fn reload_all(&self) -> Vec<ReloadHandle> {
        self.sets.iter().map(|set| set.reload_async()).collect()
    }

    /// Issue a reload on the first set of `kind`.
    pub fn reload(&self, kind: RootKind) -> Option<ReloadHandle> {
        self.get(kind).map(|set| set.reload_async())
    }

    /// The first set of `kind`.
    pub fn get(&self, kind: RootKind) -> Option<&dyn RefreshableSet> {
        self.sets
            .iter()
            .find(|set| set.kind() == kind)
            .map(|set| set.as_ref())
    }

    /// Kinds of the registered sets, in order.
    pub fn kinds(&self) -> Vec<RootKind> {
        self.sets.iter().map(|set| set.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::sync::queue::tree_queue;
    use crate::sync::report::LogReporter;
    use crate::sync::sets::{StashSet, TagSet};
    use crate::tree::{TreeModel, TreeWidget};
    use std::sync::Arc;

    #[test]
    fn second_owner_of_a_root_rejected() {
        let mut tree = TreeModel::new();
        let root = tree.create_root(RootKind::Stashes);
        let (queue, _inbox) = tree_queue();
        let backend = Arc::new(MockBackend::new());

        let mut registry = TreeSetRegistry::new();
        registry
            .register(ObjectSetSynchronizer::new(
                StashSet::new(backend.clone()),
                root,
                queue.clone(),
                Arc::new(LogReporter),
            ))
            .unwrap();

        let err = registry
            .register(ObjectSetSynchronizer::new(
                TagSet::new(backend),
                root,
                queue,
                Arc::new(LogReporter),
            ))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::RootAlreadyOwned {
                root,
                owner: RootKind::Stashes
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn bind_all_then_reload_all_in_order() {
        let mut tree = TreeModel::new();
        let tags = tree.create_root(RootKind::Tags);
        let stashes = tree.create_root(RootKind::Stashes);
        let (queue, _inbox) = tree_queue();
        let backend = Arc::new(MockBackend::new());

        let mut registry = TreeSetRegistry::new();
        registry
            .register(ObjectSetSynchronizer::new(
                TagSet::new(backend.clone()),
                tags,
                queue.clone(),
                Arc::new(LogReporter),
            ))
            .unwrap();
        registry
            .register(ObjectSetSynchronizer::new(
                StashSet::new(backend.clone()),
                stashes,
                queue,
                Arc::new(LogReporter),
            ))
            .unwrap();
        assert_eq!(registry.kinds(), vec![RootKind::Tags, RootKind::Stashes]);

        let ctx = RepositoryContext::new("/repo");
        registry.bind_all(&ctx);
        assert_eq!(backend.fetch_count(), 0);

        let handles = registry.reload_all();
        let kinds: Vec<_> = handles.iter().map(ReloadHandle::kind).collect();
        assert_eq!(kinds, vec![RootKind::Tags, RootKind::Stashes]);
        assert_eq!(registry.get(RootKind::Tags).unwrap().generation(), 1);
        assert!(registry.reload(RootKind::Branches).is_none());
    }
}
