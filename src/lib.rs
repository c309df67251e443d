//! repotree - a repository's branches, tags and stashes as a navigation tree
//!
//! repotree mirrors the object sets of a Git repository into a hierarchical
//! tree, refreshes each set asynchronously without blocking the thread that
//! owns the tree, and turns activations (double-clicks) into domain actions
//! based on which region of the tree was activated.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (the `rtree` binary)
//! - [`controller`] - Roots, binding, activation classification and dispatch
//! - [`sync`] - Object sets, generation-stamped reloads, the set registry
//! - [`tree`] - Tree widget primitives and the in-memory widget
//! - [`backend`] - Where object data comes from (git2, or a mock)
//! - [`git`] - Single interface for all Git operations
//! - [`core`] - Domain types, object records, configuration
//! - [`ui`] - Terminal output
//!
//! # Correctness Invariants
//!
//! 1. A reload result is applied only if no newer reload of the same set
//!    was issued and the set is still bound to the same repository
//! 2. A rebuild either completes or leaves the previous children untouched
//! 3. A failing set never affects its siblings
//! 4. The tree is only mutated by the thread that owns it

pub mod backend;
pub mod cli;
pub mod controller;
pub mod core;
pub mod git;
pub mod sync;
pub mod tree;
pub mod ui;
