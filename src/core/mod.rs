//! core
//!
//! Core domain types, object records and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid, RootKind
//! - [`objects`] - Branch, tag and stash records produced by backends
//! - [`context`] - The handle identifying the open repository
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod context;
pub mod objects;
pub mod types;
