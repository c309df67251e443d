//! backend
//!
//! Abstraction for the repository provider that supplies branch, tag and
//! stash data.
//!
//! # Architecture
//!
//! The `RepoBackend` trait is the only thing object sets know about where
//! their data comes from. The real implementation reads through the
//! [`crate::git`] doorway; tests use [`mock::MockBackend`].
//!
//! - Backend failures are contained to the object set that asked
//! - Backends never touch the tree
//!
//! # Modules
//!
//! - `traits`: Core `RepoBackend` trait and `BackendError`
//! - `git`: git2-backed implementation
//! - [`mock`]: Mock implementation for deterministic testing

mod git;
pub mod mock;
mod traits;

pub use git::GitBackend;
pub use traits::*;
