//! controller
//!
//! The top-level coordinator of the repository tree.
//!
//! # Design
//!
//! `RepoTreeController` owns the tree widget, the three region roots
//! (branches, tags, stashes), a registry with one synchronizer per root,
//! and the receiving end of the owning-thread queue. Everything that
//! mutates the tree runs here, on whichever thread owns the controller.
//!
//! Activation events are classified by walking the node up to its root and
//! reading the root's [`RootKind`] tag:
//!
//! | Node | Region | Result |
//! |------|--------|--------|
//! | has children | any | `Toggle` (the widget expands/collapses it) |
//! | leaf | branches | `Checkout`, forwarded to the dispatcher |
//! | leaf | anything else | `NoAction` |
//!
//! Root nodes never dispatch, even when empty.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use repotree::backend::mock::MockBackend;
//! use repotree::controller::{
//!     Activation, CheckoutIntent, ControllerOptions, RecordingDispatcher, RepoTreeController,
//! };
//! use repotree::core::context::RepositoryContext;
//! use repotree::core::types::RootKind;
//! use repotree::sync::LogReporter;
//! use repotree::tree::{TreeModel, TreeWidget};
//!
//! # tokio_test::block_on(async {
//! let backend = Arc::new(MockBackend::new().with_branches(&["main", "feature/x"]));
//! let dispatcher = RecordingDispatcher::new();
//! let mut controller = RepoTreeController::new(
//!     TreeModel::new(),
//!     backend,
//!     dispatcher.clone(),
//!     Arc::new(LogReporter),
//!     ControllerOptions::default(),
//! )
//! .unwrap();
//!
//! let handles = controller.bind(RepositoryContext::new("/repo"));
//! controller.settle_all(handles).await;
//!
//! let branches = controller.root(RootKind::Branches);
//! let leaf = controller.tree().find_descendant(branches, "feature/x").unwrap();
//! let activation = controller.on_node_activated(leaf).unwrap();
//!
//! assert_eq!(activation, Activation::Checkout(CheckoutIntent::new("feature/x")));
//! assert_eq!(dispatcher.intents().len(), 1);
//! # });
//! ```

mod dispatch;

pub use dispatch::{
    ActionDispatcher, CheckoutIntent, DispatchError, GitCheckoutDispatcher, RecordingDispatcher,
};

use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::backend::RepoBackend;
use crate::core::config::{Config, DEFAULT_FONT};
use crate::core::context::RepositoryContext;
use crate::core::types::RootKind;
use crate::sync::{
    tree_queue, BranchSet, ErrorReporter, ObjectSet, ObjectSetSynchronizer, RegistryError,
    ReloadHandle, ReloadOutcome, StashSet, TagSet, TreeInbox, TreeSetRegistry,
};
use crate::tree::{NodeId, NodeStyle, TreeError, TreeWidget};

/// Region of the tree a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Branches,
    Tags,
    Stashes,
    /// Not under any tagged root
    Unclassified,
}

impl From<RootKind> for Region {
    fn from(kind: RootKind) -> Self {
        match kind {
            RootKind::Branches => Region::Branches,
            RootKind::Tags => Region::Tags,
            RootKind::Stashes => Region::Stashes,
        }
    }
}

/// What an activation resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A branch leaf; the intent was dispatched successfully.
    Checkout(CheckoutIntent),
    /// A node with children; the widget toggles it.
    Toggle { region: Region },
    /// No domain action is defined here.
    NoAction { region: Region },
}

/// Errors from [`RepoTreeController::on_node_activated`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActivationError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Errors from building a controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("failed to register object set: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to style roots: {0}")]
    Tree(#[from] TreeError),
}

/// Construction-time settings.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Font applied to the roots and inherited by their children
    pub font: String,
    /// Group `a/b` branch names under folder nodes
    pub group_branches: bool,
    /// Drop superseded fetches early
    pub cancel_superseded: bool,
    /// Runtime the fetches run on. `None` uses the runtime current at
    /// construction, if there is one.
    pub runtime: Option<Handle>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            group_branches: true,
            cancel_superseded: true,
            runtime: None,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            font: config.font().to_string(),
            group_branches: config.group_branches(),
            cancel_superseded: config.cancel_superseded(),
            runtime: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Roots {
    branches: NodeId,
    tags: NodeId,
    stashes: NodeId,
}

impl Roots {
    fn get(&self, kind: RootKind) -> NodeId {
        match kind {
            RootKind::Branches => self.branches,
            RootKind::Tags => self.tags,
            RootKind::Stashes => self.stashes,
        }
    }
}

/// Coordinates the tree, its object sets and activation dispatch.
pub struct RepoTreeController<W: TreeWidget> {
    tree: W,
    inbox: TreeInbox,
    registry: TreeSetRegistry,
    roots: Roots,
    dispatcher: Box<dyn ActionDispatcher>,
    context: Option<RepositoryContext>,
}

impl<W: TreeWidget> RepoTreeController<W> {
    /// Create the roots in `tree`, register one set per root and style the
    /// roots.
    ///
    /// The calling thread becomes the tree's owner and does not need to be
    /// inside a runtime if `options.runtime` is set.
    pub fn new(
        mut tree: W,
        backend: Arc<dyn RepoBackend>,
        dispatcher: impl ActionDispatcher + 'static,
        reporter: Arc<dyn ErrorReporter>,
        options: ControllerOptions,
    ) -> Result<Self, ControllerError> {
        let (queue, inbox) = tree_queue();
        let roots = Roots {
            branches: tree.create_root(RootKind::Branches),
            tags: tree.create_root(RootKind::Tags),
            stashes: tree.create_root(RootKind::Stashes),
        };

        let runtime = options.runtime.clone().or_else(|| Handle::try_current().ok());
        if runtime.is_none() {
            log::debug!("no runtime yet; reloads use whichever is current when issued");
        }
        let runtime = runtime.as_ref();
        let cancel = options.cancel_superseded;

        let branches = ObjectSetSynchronizer::new(
            BranchSet::new(Arc::clone(&backend), options.group_branches),
            roots.branches,
            queue.clone(),
            Arc::clone(&reporter),
        );
        let tags = ObjectSetSynchronizer::new(
            TagSet::new(Arc::clone(&backend)),
            roots.tags,
            queue.clone(),
            Arc::clone(&reporter),
        );
        let stashes = ObjectSetSynchronizer::new(
            StashSet::new(Arc::clone(&backend)),
            roots.stashes,
            queue,
            reporter,
        );

        let mut registry = TreeSetRegistry::new();
        registry.register(configure(branches, cancel, runtime))?;
        registry.register(configure(tags, cancel, runtime))?;
        registry.register(configure(stashes, cancel, runtime))?;

        // Styled once; children inherit on append.
        let style = NodeStyle::with_font(options.font.as_str());
        for kind in RootKind::ALL {
            tree.apply_style(roots.get(kind), style.clone())?;
        }

        log::debug!(
            "controller ready ({} sets, backend {})",
            registry.len(),
            backend.name()
        );

        Ok(Self {
            tree,
            inbox,
            registry,
            roots,
            dispatcher: Box::new(dispatcher),
            context: None,
        })
    }

    // =========================================================================
    // Binding and reloads
    // =========================================================================

    /// Rebind every set to `ctx` and reload them all.
    pub fn bind(&mut self, ctx: RepositoryContext) -> Vec<ReloadHandle> {
        log::info!("binding repository {}", ctx.path().display());
        self.registry.bind_all(&ctx);
        self.context = Some(ctx);
        self.registry.reload_all()
    }

    /// Reload every set against the bound context.
    pub fn reload_all(&self) -> Vec<ReloadHandle> {
        self.registry.reload_all()
    }

    /// Reload one set.
    pub fn reload(&self, kind: RootKind) -> Option<ReloadHandle> {
        self.registry.reload(kind)
    }

    /// Apply every rebuild that is ready, without waiting. Returns how many
    /// ran.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.inbox.try_next() {
            let widget: &mut dyn TreeWidget = &mut self.tree;
            task(widget);
            ran += 1;
        }
        ran
    }

    /// Wait for `handle`, applying rebuilds as they arrive.
    pub async fn settle(&mut self, mut handle: ReloadHandle) -> ReloadOutcome {
        loop {
            tokio::select! {
                biased;
                outcome = &mut handle => return outcome,
                Some(task) = self.inbox.next() => {
                    let widget: &mut dyn TreeWidget = &mut self.tree;
                    task(widget);
                }
            }
        }
    }

    /// [`settle`](Self::settle) every handle, in order.
    pub async fn settle_all(&mut self, handles: Vec<ReloadHandle>) -> Vec<ReloadOutcome> {
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(self.settle(handle).await);
        }
        outcomes
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Region of `node`, found by walking to its root.
    pub fn classify(&self, node: NodeId) -> Region {
        self.tree
            .root_of(node)
            .and_then(|root| self.tree.node(root))
            .and_then(|root| root.root_kind())
            .map_or(Region::Unclassified, Region::from)
    }

    /// Handle an activation (double-click) on `node`.
    ///
    /// A handle to a node that no longer exists (an activation that raced
    /// a rebuild) is an unclassified no-op.
    ///
    /// # Errors
    ///
    /// `Dispatch` if the dispatcher failed the checkout; not retried.
    pub fn on_node_activated(&mut self, node: NodeId) -> Result<Activation, ActivationError> {
        let Some(data) = self.tree.node(node) else {
            log::debug!("activation of removed node {}: no action", node);
            return Ok(Activation::NoAction {
                region: Region::Unclassified,
            });
        };
        let region = self.classify(node);

        if data.has_children() {
            return Ok(Activation::Toggle { region });
        }
        if region != Region::Branches || data.parent().is_none() {
            log::debug!("activation of '{}' in {:?}: no action", data.label(), region);
            return Ok(Activation::NoAction { region });
        }

        let intent = CheckoutIntent::new(data.label());
        log::debug!("dispatching checkout of '{}'", intent.branch_label);
        self.dispatcher.checkout(&intent)?;
        Ok(Activation::Checkout(intent))
    }

    /// Handle a selection change. Nothing happens on selection; the region
    /// is returned for the host's benefit.
    pub fn on_node_selected(&self, node: NodeId) -> Region {
        self.classify(node)
    }

    /// Expand every node.
    pub fn expand_all(&mut self) {
        self.tree.expand_all();
    }

    /// Collapse every node.
    pub fn collapse_all(&mut self) {
        self.tree.collapse_all();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &W {
        &self.tree
    }

    /// The root of `kind`. Roots exist for the controller's whole life.
    pub fn root(&self, kind: RootKind) -> NodeId {
        self.roots.get(kind)
    }

    pub fn context(&self) -> Option<&RepositoryContext> {
        self.context.as_ref()
    }

    pub fn registry(&self) -> &TreeSetRegistry {
        &self.registry
    }
}

fn configure<S: ObjectSet>(
    sync: ObjectSetSynchronizer<S>,
    cancel: bool,
    runtime: Option<&Handle>,
) -> ObjectSetSynchronizer<S> {
    let sync = sync.with_cancel_superseded(cancel);
    match runtime {
        Some(handle) => sync.with_runtime(handle.clone()),
        None => sync,
    }
}
