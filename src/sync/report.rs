//! sync::report
//!
//! Reload errors and the reporting channel they are surfaced through.
//!
//! Every failed reload attempt produces exactly one [`ReloadFailure`] on
//! the controller's [`ErrorReporter`], whether or not the attempt was
//! already superseded. Stale results are not failures and are never
//! reported here.

use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::backend::BackendError;
use crate::core::types::RootKind;
use crate::tree::TreeError;

/// Why a reload did not apply.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The backend fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] BackendError),

    /// The widget rejected the rebuild; the previous children were restored.
    #[error("rebuild rejected: {0}")]
    Tree(#[from] TreeError),

    /// Reload issued before any repository was bound.
    #[error("no repository bound")]
    Unbound,

    /// Reload issued with no tokio runtime to run the fetch on.
    #[error("no async runtime available")]
    NoRuntime,
}

/// One failed reload attempt of one object set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadFailure {
    pub set: RootKind,
    pub generation: u64,
    pub error: SyncError,
}

impl std::fmt::Display for ReloadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} reload (generation {}) failed: {}",
            self.set, self.generation, self.error
        )
    }
}

/// Where reload failures go.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, failure: &ReloadFailure);
}

/// Reports failures as `log` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, failure: &ReloadFailure) {
        log::warn!("{}", failure);
    }
}

/// Collects failures in memory. Clones share the collection.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    failures: Arc<Mutex<Vec<ReloadFailure>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every failure reported so far, in order.
    pub fn failures(&self) -> Vec<ReloadFailure> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Failures reported for one set.
    pub fn failures_of(&self, set: RootKind) -> Vec<ReloadFailure> {
        self.failures()
            .into_iter()
            .filter(|f| f.set == set)
            .collect()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, failure: &ReloadFailure) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(failure.clone());
    }
}
