//! Integration tests against real repositories.
//!
//! These tests create git repositories via tempfile and the git CLI, then
//! check the Git interface, the git backend and a controller wired to both.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use repotree::backend::{BackendError, GitBackend, RepoBackend};
use repotree::controller::{
    ActionDispatcher, Activation, CheckoutIntent, ControllerOptions, DispatchError,
    GitCheckoutDispatcher, RepoTreeController,
};
use repotree::core::context::RepositoryContext;
use repotree::core::types::{BranchName, RootKind};
use repotree::git::{Git, GitError};
use repotree::sync::RecordingReporter;
use repotree::tree::{Accent, TreeModel, TreeWidget};

/// Test fixture that creates a real git repository on `main`.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn create_branch(&self, name: &str) {
        run_git(self.path(), &["branch", name]);
    }

    /// Modify README.md and stash the change with `message`.
    fn stash(&self, content: &str, message: &str) {
        std::fs::write(self.path().join("README.md"), content).unwrap();
        run_git(self.path(), &["stash", "push", "-m", message]);
    }

    fn current_branch(&self) -> Option<String> {
        self.git()
            .current_branch()
            .unwrap()
            .map(|b| b.as_str().to_string())
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

// =============================================================================
// Git interface
// =============================================================================

#[test]
fn open_non_repository_fails() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(Git::open(dir.path()), Err(GitError::NotARepo { .. })));
}

#[test]
fn list_branches_marks_head() {
    let repo = TestRepo::new();
    repo.create_branch("feature/x");

    let branches = repo.git().list_branches().unwrap();
    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["feature/x", "main"]);

    let main = branches.iter().find(|b| b.name.as_str() == "main").unwrap();
    assert!(main.is_head);
    assert_eq!(main.summary, "Initial commit");
    assert!(!branches[0].is_head);
}

#[test]
fn list_tags_lightweight_and_annotated() {
    let repo = TestRepo::new();
    run_git(repo.path(), &["tag", "v0.1"]);
    run_git(repo.path(), &["tag", "-a", "v1.0", "-m", "Release 1.0"]);

    let tags = repo.git().list_tags().unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "v0.1");
    assert_eq!(tags[0].message, None);
    assert_eq!(tags[1].name, "v1.0");
    assert_eq!(tags[1].message.as_deref(), Some("Release 1.0"));
    // Both point at the initial commit
    assert_eq!(tags[0].target, tags[1].target);
}

#[test]
fn list_stashes_newest_first() {
    let repo = TestRepo::new();
    repo.stash("first change\n", "first");
    repo.stash("second change\n", "second");

    let stashes = repo.git().list_stashes().unwrap();
    assert_eq!(stashes.len(), 2);
    assert_eq!(stashes[0].index, 0);
    assert!(stashes[0].message.contains("second"));
    assert!(stashes[1].message.contains("first"));
    assert!(stashes[0].time.is_some());
}

#[test]
fn checkout_branch_moves_head() {
    let repo = TestRepo::new();
    repo.create_branch("feature/x");

    repo.git()
        .checkout_branch(&BranchName::new("feature/x").unwrap())
        .unwrap();
    assert_eq!(repo.current_branch().as_deref(), Some("feature/x"));
}

#[test]
fn checkout_missing_branch_fails() {
    let repo = TestRepo::new();
    let err = repo
        .git()
        .checkout_branch(&BranchName::new("nope").unwrap())
        .unwrap_err();
    assert!(matches!(err, GitError::RefNotFound { .. }));
}

// =============================================================================
// Git backend
// =============================================================================

#[tokio::test]
async fn backend_reads_all_kinds() {
    let repo = TestRepo::new();
    repo.create_branch("topic");
    run_git(repo.path(), &["tag", "v1"]);
    repo.stash("wip\n", "wip");

    let backend = GitBackend::new();
    let ctx = RepositoryContext::new(repo.path());

    assert_eq!(backend.branches(&ctx).await.unwrap().len(), 2);
    assert_eq!(backend.tags(&ctx).await.unwrap()[0].name, "v1");
    assert_eq!(backend.stashes(&ctx).await.unwrap().len(), 1);
}

#[tokio::test]
async fn backend_reports_missing_repository() {
    let dir = TempDir::new().unwrap();
    let ctx = RepositoryContext::new(dir.path());

    let err = GitBackend::new().tags(&ctx).await.unwrap_err();
    assert!(matches!(err, BackendError::NotARepo(_)));
}

// =============================================================================
// Controller over a real repository
// =============================================================================

fn controller(repo: &TestRepo, dry_run: bool) -> RepoTreeController<TreeModel> {
    RepoTreeController::new(
        TreeModel::new(),
        Arc::new(GitBackend::new()),
        GitCheckoutDispatcher::new(repo.path()).dry_run(dry_run),
        Arc::new(RecordingReporter::new()),
        ControllerOptions::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn controller_mirrors_repository() {
    let repo = TestRepo::new();
    repo.create_branch("feature/auth/login");
    run_git(repo.path(), &["tag", "v1.0"]);
    repo.stash("wip\n", "experiment");

    let mut controller = controller(&repo, true);
    let handles = controller.bind(RepositoryContext::new(repo.path()));
    let outcomes = controller.settle_all(handles).await;
    assert!(outcomes.iter().all(|o| o.is_applied()), "{outcomes:?}");

    let tree = controller.tree();
    let branches = controller.root(RootKind::Branches);
    assert_eq!(tree.labels(branches), vec!["feature", "main"]);
    let main = tree.find_child(branches, "main").unwrap();
    assert_eq!(tree.node(main).unwrap().accent(), Accent::Current);
    assert!(tree.find_descendant(branches, "feature/auth/login").is_some());

    assert_eq!(tree.labels(controller.root(RootKind::Tags)), vec!["v1.0"]);
    let stashes = tree.labels(controller.root(RootKind::Stashes));
    assert_eq!(stashes.len(), 1);
    assert!(stashes[0].contains("experiment"));
}

#[tokio::test]
async fn activating_branch_leaf_checks_it_out() {
    let repo = TestRepo::new();
    repo.create_branch("feature/x");

    let mut controller = controller(&repo, false);
    let handles = controller.bind(RepositoryContext::new(repo.path()));
    controller.settle_all(handles).await;

    let branches = controller.root(RootKind::Branches);
    let leaf = controller
        .tree()
        .find_descendant(branches, "feature/x")
        .unwrap();

    assert_eq!(
        controller.on_node_activated(leaf).unwrap(),
        Activation::Checkout(CheckoutIntent::new("feature/x"))
    );
    assert_eq!(repo.current_branch().as_deref(), Some("feature/x"));
}

#[test]
fn dispatcher_surfaces_checkout_failure() {
    let repo = TestRepo::new();
    let dispatcher = GitCheckoutDispatcher::new(repo.path());

    let err = dispatcher
        .checkout(&CheckoutIntent::new("missing"))
        .unwrap_err();
    assert!(matches!(err, DispatchError::Checkout(msg) if msg.contains("missing")));
}
