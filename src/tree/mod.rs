//! tree
//!
//! Tree widget abstraction and the in-memory widget the binary uses.
//!
//! # Modules
//!
//! - `node`: Node handles, styles and node data
//! - `widget`: The `TreeWidget` primitives and `TreeError`
//! - `model`: `TreeModel`, an arena-backed widget
//! - [`render`]: Text and JSON renderings

mod model;
mod node;
pub mod render;
mod widget;

pub use model::TreeModel;
pub use node::{Accent, NodeId, NodeSpec, NodeStyle, TreeNode};
pub use widget::{TreeError, TreeWidget};
