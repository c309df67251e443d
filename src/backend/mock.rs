//! backend::mock
//!
//! Mock backend implementation for deterministic testing.
//!
//! # Design
//!
//! The mock backend stores branches, tags and stashes in memory and allows
//! configuring failure scenarios. It also lets a test *hold* the next fetch
//! of a given kind so it completes only when released, which is how
//! out-of-order completion is reproduced.
//!
//! Data is captured when a fetch starts, before it waits on a hold, so a
//! held fetch returns whatever the mock contained at that moment.
//!
//! # Example
//!
//! ```
//! use repotree::backend::mock::MockBackend;
//! use repotree::backend::RepoBackend;
//! use repotree::core::context::RepositoryContext;
//!
//! # tokio_test::block_on(async {
//! let backend = MockBackend::new().with_stashes(&["WIP on main", "experiment"]);
//! let ctx = RepositoryContext::new("/repo");
//!
//! let stashes = backend.stashes(&ctx).await.unwrap();
//! assert_eq!(stashes[1].message, "experiment");
//! assert_eq!(backend.fetch_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

use super::traits::{BackendError, RepoBackend};
use crate::core::context::RepositoryContext;
use crate::core::objects::{BranchInfo, StashInfo, TagInfo};
use crate::core::types::{BranchName, Oid, RootKind};

/// Mock backend for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockBackendInner>>,
}

#[derive(Debug, Default)]
struct MockBackendInner {
    branches: Vec<BranchInfo>,
    tags: Vec<TagInfo>,
    stashes: Vec<StashInfo>,
    /// Persistent failures, by object kind, until cleared.
    fail_on: HashMap<RootKind, BackendError>,
    /// Pending holds, consumed one per fetch.
    holds: HashMap<RootKind, VecDeque<PendingHold>>,
    /// Recorded fetches for verification.
    fetches: Vec<MockFetch>,
    /// Counter used to mint distinct fake object ids.
    next_oid: u64,
}

#[derive(Debug)]
struct PendingHold {
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Recorded fetch for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFetch {
    /// Which object kind was listed
    pub kind: RootKind,
    /// Id of the context the fetch was issued against
    pub context_id: u64,
}

/// A held fetch. The fetch that consumes it blocks until [`Hold::release`]
/// is called (or the hold is dropped).
#[derive(Debug)]
pub struct Hold {
    started: Option<oneshot::Receiver<()>>,
    release: oneshot::Sender<()>,
}

impl Hold {
    /// Wait until a fetch has picked this hold up and captured its data.
    pub async fn started(&mut self) {
        if let Some(started) = self.started.take() {
            let _ = started.await;
        }
    }

    /// Let the held fetch complete.
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

impl MockBackendInner {
    fn fake_oid(&mut self) -> Oid {
        self.next_oid += 1;
        Oid::new(format!("{:040x}", self.next_oid)).expect("zero-padded counter is a valid oid")
    }
}

impl MockBackend {
    /// Create a new empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Builder form of [`MockBackend::set_branches`].
    pub fn with_branches(self, names: &[&str]) -> Self {
        self.set_branches(names);
        self
    }

    /// Builder form of [`MockBackend::set_tags`].
    pub fn with_tags(self, names: &[&str]) -> Self {
        self.set_tags(names);
        self
    }

    /// Builder form of [`MockBackend::set_stashes`].
    pub fn with_stashes(self, messages: &[&str]) -> Self {
        self.set_stashes(messages);
        self
    }

    /// Replace the branch list with branches of the given names.
    ///
    /// The first name is treated as the checked-out branch. Names that are
    /// not valid branch names are skipped.
    pub fn set_branches(&self, names: &[&str]) {
        let mut inner = self.lock();
        let mut branches = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let Ok(name) = BranchName::new(*name) else {
                continue;
            };
            let mut info = BranchInfo::new(name, inner.fake_oid())
                .with_summary(format!("commit on {}", names[i]));
            if i == 0 {
                info = info.at_head();
            }
            branches.push(info);
        }
        inner.branches = branches;
    }

    /// Replace the branch list with fully specified records.
    pub fn set_branch_infos(&self, branches: Vec<BranchInfo>) {
        self.lock().branches = branches;
    }

    /// Replace the tag list with lightweight tags of the given names.
    pub fn set_tags(&self, names: &[&str]) {
        let mut inner = self.lock();
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let target = inner.fake_oid();
            tags.push(TagInfo {
                name: name.to_string(),
                target,
                message: None,
            });
        }
        inner.tags = tags;
    }

    /// Replace the stash list; index 0 is the first message.
    pub fn set_stashes(&self, messages: &[&str]) {
        let mut inner = self.lock();
        let mut stashes = Vec::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            let oid = inner.fake_oid();
            stashes.push(StashInfo {
                index,
                message: message.to_string(),
                oid,
                time: None,
            });
        }
        inner.stashes = stashes;
    }

    /// Make every fetch of `kind` fail with `error` until cleared.
    pub fn fail_on(&self, kind: RootKind, error: BackendError) {
        self.lock().fail_on.insert(kind, error);
    }

    /// Stop failing fetches of `kind`.
    pub fn clear_fail_on(&self, kind: RootKind) {
        self.lock().fail_on.remove(&kind);
    }

    /// Hold the next not-yet-started fetch of `kind`.
    ///
    /// Holds queue up: calling this twice holds the next two fetches.
    pub fn hold_next(&self, kind: RootKind) -> Hold {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.lock()
            .holds
            .entry(kind)
            .or_default()
            .push_back(PendingHold {
                started: started_tx,
                release: release_rx,
            });
        Hold {
            started: Some(started_rx),
            release: release_tx,
        }
    }

    /// Get all recorded fetches.
    pub fn fetches(&self) -> Vec<MockFetch> {
        self.lock().fetches.clone()
    }

    /// Number of fetches performed so far, of any kind.
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches.len()
    }

    /// Number of fetches of one kind performed so far.
    pub fn fetch_count_of(&self, kind: RootKind) -> usize {
        self.lock().fetches.iter().filter(|f| f.kind == kind).count()
    }

    /// Record the fetch, capture the answer and pick up a pending hold.
    fn begin<T>(
        &self,
        kind: RootKind,
        ctx: &RepositoryContext,
        snapshot: impl FnOnce(&MockBackendInner) -> Vec<T>,
    ) -> (Result<Vec<T>, BackendError>, Option<oneshot::Receiver<()>>) {
        let mut inner = self.lock();
        inner.fetches.push(MockFetch {
            kind,
            context_id: ctx.id(),
        });

        let answer = match inner.fail_on.get(&kind) {
            Some(err) => Err(err.clone()),
            None => Ok(snapshot(&*inner)),
        };

        let hold = inner
            .holds
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
            .map(|hold| {
                let _ = hold.started.send(());
                hold.release
            });

        (answer, hold)
    }

    async fn fetch<T>(
        &self,
        kind: RootKind,
        ctx: &RepositoryContext,
        snapshot: impl FnOnce(&MockBackendInner) -> Vec<T>,
    ) -> Result<Vec<T>, BackendError> {
        let (answer, hold) = self.begin(kind, ctx, snapshot);
        if let Some(release) = hold {
            // A dropped hold releases too.
            let _ = release.await;
        }
        answer
    }
}

#[async_trait]
impl RepoBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn branches(&self, ctx: &RepositoryContext) -> Result<Vec<BranchInfo>, BackendError> {
        self.fetch(RootKind::Branches, ctx, |inner| inner.branches.clone())
            .await
    }

    async fn tags(&self, ctx: &RepositoryContext) -> Result<Vec<TagInfo>, BackendError> {
        self.fetch(RootKind::Tags, ctx, |inner| inner.tags.clone())
            .await
    }

    async fn stashes(&self, ctx: &RepositoryContext) -> Result<Vec<StashInfo>, BackendError> {
        self.fetch(RootKind::Stashes, ctx, |inner| inner.stashes.clone())
            .await
    }
}
