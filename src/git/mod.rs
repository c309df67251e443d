//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2`; the backend and the checkout dispatcher both go through [`Git`].
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Enumerating local branches, tags and stashes
//! - Checking out a local branch
//!
//! # Invariants
//!
//! - No other module calls git2 directly
//! - All operations return strong types (Oid, BranchName)

mod interface;

pub use interface::{Git, GitError};
