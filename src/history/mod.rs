//! Git-like history over entity graphs
//!
//! Commits are immutable snapshots linked to parent commits; branches are
//! named pointers into the commit graph. The manager owns storage and
//! indices, the snapshot is the stored record, and the tracker turns a live
//! graph's event stream into commits.

pub mod manager;
pub mod snapshot;
pub mod tracker;

// Re-export main types
pub use manager::{HistoryError, HistoryManager, HistoryResult, DEFAULT_BRANCH};
pub use snapshot::GraphSnapshot;
pub use tracker::{ChangeTracker, DEFAULT_AUTO_COMMIT_THRESHOLD};
