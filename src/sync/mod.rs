//! sync
//!
//! Object-set-to-tree synchronization.
//!
//! # Architecture
//!
//! ```text
//! TreeSetRegistry
//!   └── ObjectSetSynchronizer<S: ObjectSet>   (one per root)
//!         ├── fetch on the tokio runtime
//!         └── apply via TreeQueue ──▶ TreeInbox (drained by the tree owner)
//! ```
//!
//! # Modules
//!
//! - `object_set`: The `ObjectSet` trait (fetch, reset, add-child)
//! - `sets`: Branch, tag and stash sets
//! - `synchronizer`: Generation-stamped reloads and atomic rebuilds
//! - `registry`: Ordered, root-exclusive collection of synchronizers
//! - `queue`: The owning-thread task queue
//! - `report`: `SyncError` and the `ErrorReporter` channel

mod object_set;
mod queue;
mod registry;
mod report;
mod sets;
mod synchronizer;

pub use object_set::ObjectSet;
pub use queue::{tree_queue, TreeInbox, TreeQueue, TreeTask};
pub use registry::{RefreshableSet, RegistryError, TreeSetRegistry};
pub use report::{ErrorReporter, LogReporter, RecordingReporter, ReloadFailure, SyncError};
pub use sets::{BranchSet, StashSet, TagSet};
pub use synchronizer::{ObjectSetSynchronizer, ReloadHandle, ReloadOutcome};
