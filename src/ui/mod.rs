//! ui
//!
//! User-facing terminal output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware message helpers

pub mod output;
