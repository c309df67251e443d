//! controller::dispatch
//!
//! The action dispatcher: performs the domain action behind a classified
//! activation. The controller only decides *that* a checkout was asked
//! for; what a checkout means (a dialog, a direct switch, a dry run) is
//! up to the dispatcher.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::core::types::BranchName;
use crate::git::Git;

/// A request to check out the branch behind an activated leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutIntent {
    /// Label of the activated node, which is the full branch name
    pub branch_label: String,
}

impl CheckoutIntent {
    pub fn new(branch_label: impl Into<String>) -> Self {
        Self {
            branch_label: branch_label.into(),
        }
    }
}

/// Errors raised while handling an intent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The label is not a valid branch name.
    #[error("'{0}' is not a branch")]
    InvalidBranch(String),

    /// The checkout itself failed.
    #[error("checkout failed: {0}")]
    Checkout(String),
}

/// Performs domain actions for classified activations.
pub trait ActionDispatcher {
    fn checkout(&self, intent: &CheckoutIntent) -> Result<(), DispatchError>;
}

/// Checks branches out in a local repository through the `git` doorway.
#[derive(Debug, Clone)]
pub struct GitCheckoutDispatcher {
    repo_path: PathBuf,
    dry_run: bool,
}

impl GitCheckoutDispatcher {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            dry_run: false,
        }
    }

    /// Validate intents but leave the repository alone.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl ActionDispatcher for GitCheckoutDispatcher {
    fn checkout(&self, intent: &CheckoutIntent) -> Result<(), DispatchError> {
        let branch = BranchName::new(intent.branch_label.as_str())
            .map_err(|_| DispatchError::InvalidBranch(intent.branch_label.clone()))?;

        if self.dry_run {
            log::info!("dry run: would check out {}", branch);
            return Ok(());
        }

        let git = Git::open(&self.repo_path).map_err(|e| DispatchError::Checkout(e.to_string()))?;
        git.checkout_branch(&branch)
            .map_err(|e| DispatchError::Checkout(e.to_string()))?;
        log::info!("checked out {}", branch);
        Ok(())
    }
}

/// Records intents instead of acting on them. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    intents: Vec<CheckoutIntent>,
    fail_next: Option<DispatchError>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every intent received, failed ones included.
    pub fn intents(&self) -> Vec<CheckoutIntent> {
        self.lock().intents.clone()
    }

    /// Make the next checkout fail with `error`.
    pub fn fail_next(&self, error: DispatchError) {
        self.lock().fail_next = Some(error);
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn checkout(&self, intent: &CheckoutIntent) -> Result<(), DispatchError> {
        let mut inner = self.lock();
        inner.intents.push(intent.clone());
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_dispatcher_fails_once() {
        let dispatcher = RecordingDispatcher::new();
        dispatcher.fail_next(DispatchError::Checkout("dirty tree".into()));

        let intent = CheckoutIntent::new("main");
        assert!(dispatcher.checkout(&intent).is_err());
        assert!(dispatcher.checkout(&intent).is_ok());
        assert_eq!(dispatcher.intents().len(), 2);
    }

    #[test]
    fn git_dispatcher_rejects_non_branch_labels() {
        let dispatcher = GitCheckoutDispatcher::new("/nonexistent").dry_run(true);
        assert_eq!(
            dispatcher.checkout(&CheckoutIntent::new("WIP on main")),
            Err(DispatchError::InvalidBranch("WIP on main".into()))
        );
    }

    #[test]
    fn dry_run_does_not_open_repository() {
        let dispatcher = GitCheckoutDispatcher::new("/nonexistent").dry_run(true);
        assert!(dispatcher.checkout(&CheckoutIntent::new("feature/x")).is_ok());
    }

    #[test]
    fn missing_repository_is_a_checkout_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let dispatcher = GitCheckoutDispatcher::new(dir.path());
        assert!(matches!(
            dispatcher.checkout(&CheckoutIntent::new("main")),
            Err(DispatchError::Checkout(_))
        ));
    }
}
