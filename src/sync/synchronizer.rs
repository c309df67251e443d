//! sync::synchronizer
//!
//! Binds one object set to one root and keeps the subtree in step with
//! the backend.
//!
//! # Design
//!
//! Each synchronizer carries a generation counter. `reload_async` bumps it
//! and stamps the spawned fetch with the new value. The fetch runs on the
//! tokio runtime; its result is posted to the owning thread's queue, where
//! it is applied only if:
//!
//! - the set's generation is still the one the fetch was stamped with
//! - the set is still bound to the context the fetch was issued against
//!
//! Anything else is a stale result and leaves the tree untouched.
//!
//! Applying is atomic from the tree's point of view. The old children are
//! detached, the set rebuilds the root, and only then are the old subtrees
//! destroyed. If the rebuild fails the partial children are cleared and
//! the old ones reattached.
//!
//! With `cancel_superseded` on, an in-flight fetch also watches the
//! generation and is dropped as soon as a newer reload is issued. A fetch
//! that is ready when first polled still counts, so a failure it returns
//! is reported even if it was already superseded.
//!
//! Fetches are spawned on the runtime given to
//! [`ObjectSetSynchronizer::with_runtime`], falling back to the ambient
//! one. The owning thread itself never has to be inside a runtime.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};

use super::object_set::ObjectSet;
use super::queue::{TreeQueue, TreeTask};
use super::report::{ErrorReporter, ReloadFailure, SyncError};
use crate::backend::BackendError;
use crate::core::context::RepositoryContext;
use crate::core::types::RootKind;
use crate::tree::{NodeId, TreeError, TreeWidget};

/// How a reload finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The subtree was rebuilt from `items` fetched objects.
    Applied { generation: u64, items: usize },
    /// A newer reload (or a rebind) superseded this one; nothing changed.
    Stale { generation: u64 },
    /// The reload failed; the subtree is as it was before.
    Failed { generation: u64, error: SyncError },
}

impl ReloadOutcome {
    /// Generation the reload was issued with.
    pub fn generation(&self) -> u64 {
        match self {
            ReloadOutcome::Applied { generation, .. }
            | ReloadOutcome::Stale { generation }
            | ReloadOutcome::Failed { generation, .. } => *generation,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ReloadOutcome::Applied { .. })
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, ReloadOutcome::Stale { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ReloadOutcome::Failed { .. })
    }
}

/// Completion of one issued reload.
///
/// Resolves once the result has been applied, discarded or has failed.
/// Apply runs on the tree owner, so the owner must keep draining its inbox
/// for the handle to resolve. If the apply step is dropped unrun (the owner
/// went away), the handle resolves as stale.
#[derive(Debug)]
pub struct ReloadHandle {
    kind: RootKind,
    generation: u64,
    rx: oneshot::Receiver<ReloadOutcome>,
}

impl ReloadHandle {
    fn resolved(kind: RootKind, outcome: ReloadOutcome) -> Self {
        let (tx, rx) = oneshot::channel();
        let generation = outcome.generation();
        let _ = tx.send(outcome);
        Self {
            kind,
            generation,
            rx,
        }
    }

    pub fn kind(&self) -> RootKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The outcome, if the reload has already finished.
    pub fn try_outcome(&mut self) -> Option<ReloadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(ReloadOutcome::Stale {
                generation: self.generation,
            }),
        }
    }
}

impl Future for ReloadHandle {
    type Output = ReloadOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(ReloadOutcome::Stale {
                generation: this.generation,
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// State shared between a synchronizer and its in-flight fetches.
#[derive(Debug)]
struct SetState {
    generation: watch::Sender<u64>,
    /// Id of the bound context; 0 while unbound.
    context_id: AtomicU64,
}

impl SetState {
    fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            generation,
            context_id: AtomicU64::new(0),
        }
    }

    fn current(&self) -> u64 {
        *self.generation.borrow()
    }

    fn issue(&self) -> u64 {
        let mut issued = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            issued = *generation;
        });
        issued
    }

    fn context_id(&self) -> u64 {
        self.context_id.load(Ordering::Acquire)
    }
}

/// Keeps one root's subtree in step with one object set.
///
/// # Example
///
/// ```ignore
/// let (queue, mut inbox) = tree_queue();
/// let root = tree.create_root(RootKind::Stashes);
/// let mut stashes = ObjectSetSynchronizer::new(StashSet::new(backend), root, queue, reporter);
///
/// stashes.bind(RepositoryContext::new("/repo"));
/// let handle = stashes.reload_async();
/// // ... the tree owner drains `inbox` ...
/// assert!(handle.await.is_applied());
/// ```
pub struct ObjectSetSynchronizer<S: ObjectSet> {
    set: Arc<S>,
    root: NodeId,
    context: Option<RepositoryContext>,
    state: Arc<SetState>,
    queue: TreeQueue,
    reporter: Arc<dyn ErrorReporter>,
    cancel_superseded: bool,
    runtime: Option<Handle>,
}

impl<S: ObjectSet> ObjectSetSynchronizer<S> {
    /// Create an unbound synchronizer owning `root`.
    pub fn new(set: S, root: NodeId, queue: TreeQueue, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            set: Arc::new(set),
            root,
            context: None,
            state: Arc::new(SetState::new()),
            queue,
            reporter,
            cancel_superseded: false,
            runtime: None,
        }
    }

    /// Spawn fetches on `runtime` instead of the caller's ambient runtime.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Drop superseded fetches early instead of letting them run out.
    pub fn with_cancel_superseded(mut self, cancel: bool) -> Self {
        self.cancel_superseded = cancel;
        self
    }

    pub fn kind(&self) -> RootKind {
        self.set.kind()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The bound context, if any.
    pub fn context(&self) -> Option<&RepositoryContext> {
        self.context.as_ref()
    }

    /// Most recently issued generation; 0 before the first reload.
    pub fn generation(&self) -> u64 {
        self.state.current()
    }

    /// Store `ctx` for subsequent fetches. Does not fetch.
    ///
    /// Fetches already in flight against a previous context will be
    /// discarded when they complete.
    pub fn bind(&mut self, ctx: RepositoryContext) {
        log::debug!("{}: bound to {}", self.kind(), ctx.path().display());
        self.state.context_id.store(ctx.id(), Ordering::Release);
        self.context = Some(ctx);
    }

    /// Issue a reload.
    ///
    /// Resolves `Failed(Unbound)` before any [`bind`](Self::bind), and
    /// `Failed(NoRuntime)` if there is no runtime to fetch on.
    pub fn reload_async(&self) -> ReloadHandle {
        let kind = self.kind();
        let generation = self.state.issue();

        let Some(ctx) = self.context.clone() else {
            return self.resolve_failed(generation, SyncError::Unbound);
        };
        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            return self.resolve_failed(generation, SyncError::NoRuntime);
        };

        log::debug!("{}: reload issued (generation {})", kind, generation);

        let (tx, rx) = oneshot::channel();
        let fetch = PendingFetch {
            set: Arc::clone(&self.set),
            root: self.root,
            ctx,
            generation,
            state: Arc::clone(&self.state),
            queue: self.queue.clone(),
            reporter: Arc::clone(&self.reporter),
            cancel_superseded: self.cancel_superseded,
            done: tx,
        };
        runtime.spawn(fetch.run());

        ReloadHandle {
            kind,
            generation,
            rx,
        }
    }

    fn resolve_failed(&self, generation: u64, error: SyncError) -> ReloadHandle {
        let kind = self.kind();
        let failure = ReloadFailure {
            set: kind,
            generation,
            error,
        };
        self.reporter.report(&failure);
        ReloadHandle::resolved(
            kind,
            ReloadOutcome::Failed {
                generation,
                error: failure.error,
            },
        )
    }
}

// =============================================================================
// In-flight fetch
// =============================================================================

/// Everything a spawned fetch needs, moved off the owning thread.
struct PendingFetch<S: ObjectSet> {
    set: Arc<S>,
    root: NodeId,
    ctx: RepositoryContext,
    generation: u64,
    state: Arc<SetState>,
    queue: TreeQueue,
    reporter: Arc<dyn ErrorReporter>,
    cancel_superseded: bool,
    done: oneshot::Sender<ReloadOutcome>,
}

/// Resolves once the generation moves past `generation`.
async fn superseded(mut watcher: watch::Receiver<u64>, generation: u64) {
    // Err means the synchronizer is gone, which supersedes as well.
    let _ = watcher.wait_for(|current| *current != generation).await;
}

impl<S: ObjectSet> PendingFetch<S> {
    async fn run(self) {
        let kind = self.set.kind();
        let result = if self.cancel_superseded {
            let watcher = self.state.generation.subscribe();
            tokio::select! {
                biased;
                result = self.set.fetch(&self.ctx) => Some(result),
                _ = superseded(watcher, self.generation) => None,
            }
        } else {
            Some(self.set.fetch(&self.ctx).await)
        };

        let Some(result) = result else {
            log::debug!(
                "{}: fetch for generation {} cancelled",
                kind,
                self.generation
            );
            let _ = self.done.send(ReloadOutcome::Stale {
                generation: self.generation,
            });
            return;
        };

        let queue = self.queue.clone();
        let task: TreeTask = Box::new(move |tree: &mut dyn TreeWidget| {
            let outcome = self.apply(tree, result);
            let _ = self.done.send(outcome);
        });
        if !queue.post(task) {
            log::debug!("{}: tree owner gone, result dropped", kind);
        }
    }

    /// Runs on the tree owner.
    fn apply(
        &self,
        tree: &mut dyn TreeWidget,
        result: Result<Vec<S::Item>, BackendError>,
    ) -> ReloadOutcome {
        let kind = self.set.kind();
        let generation = self.generation;

        let items = match result {
            Ok(items) => items,
            Err(err) => return self.fail(SyncError::Fetch(err)),
        };

        let current = self.state.current();
        if current != generation || self.state.context_id() != self.ctx.id() {
            log::debug!(
                "{}: discarding stale result (generation {}, current {})",
                kind,
                generation,
                current
            );
            return ReloadOutcome::Stale { generation };
        }

        match rebuild(&*self.set, tree, self.root, &items) {
            Ok(()) => {
                log::debug!(
                    "{}: applied {} item(s) (generation {})",
                    kind,
                    items.len(),
                    generation
                );
                ReloadOutcome::Applied {
                    generation,
                    items: items.len(),
                }
            }
            Err(err) => self.fail(SyncError::Tree(err)),
        }
    }

    fn fail(&self, error: SyncError) -> ReloadOutcome {
        let failure = ReloadFailure {
            set: self.set.kind(),
            generation: self.generation,
            error,
        };
        self.reporter.report(&failure);
        ReloadOutcome::Failed {
            generation: failure.generation,
            error: failure.error,
        }
    }
}

/// Replace the children of `root` with `items`, all or nothing.
fn rebuild<S: ObjectSet>(
    set: &S,
    tree: &mut dyn TreeWidget,
    root: NodeId,
    items: &[S::Item],
) -> Result<(), TreeError> {
    let previous = tree.detach_children(root)?;

    match fill(set, tree, root, items) {
        Ok(()) => {
            tree.remove_subtrees(previous);
            Ok(())
        }
        Err(err) => {
            let restored = tree
                .clear_children(root)
                .and_then(|()| tree.reattach_children(root, previous));
            if let Err(restore_err) = restored {
                log::error!("{}: failed to restore children: {}", set.kind(), restore_err);
            }
            Err(err)
        }
    }
}

fn fill<S: ObjectSet>(
    set: &S,
    tree: &mut dyn TreeWidget,
    root: NodeId,
    items: &[S::Item],
) -> Result<(), TreeError> {
    set.reset(tree, root, items)?;
    for item in items {
        set.add_child(tree, root, item)?;
    }
    Ok(())
}
