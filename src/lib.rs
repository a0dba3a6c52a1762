//! Chronograph
//!
//! A versioned entity graph with event-driven change tracking and git-like
//! commit history.
//!
//! # Architecture
//!
//! Three layers, leaves first:
//!
//! - [`graph`]: the live data model: entities with opaque component
//!   payloads, typed directional edges, and mutation primitives that each
//!   emit exactly one synchronous [`GraphEvent`] to registered observers.
//! - [`diff`]: pure structural diffing between any two graph states, and
//!   report rendering (summaries, per-change details, Mermaid diagrams)
//!   over the computed change lists.
//! - [`history`]: immutable commit snapshots with parent links, branch
//!   pointers, per-root and per-lineage indices, ancestor resolution, and
//!   the [`ChangeTracker`] aggregator that turns an event stream into
//!   commits.
//!
//! The engine is single-threaded and cooperative: mutation and
//! notification are one atomic step, and nothing blocks.
//!
//! # Example
//!
//! ```rust
//! use chronograph::{ChangeReport, ChangeTracker, Entity, EntityGraph};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! // A graph seeded with its root entity
//! let mut graph = EntityGraph::for_root(Entity::new());
//! let root_id = graph.root_id;
//!
//! // Track it: registration performs the initial commit
//! let tracker = Rc::new(RefCell::new(ChangeTracker::new()));
//! tracker.borrow_mut().register(&graph);
//! graph.add_observer(tracker.clone());
//!
//! // Mutate and commit
//! let player = Entity::new();
//! graph.add_node(player);
//! graph.add_component(&root_id, "title", "overworld");
//! let commit = tracker.borrow_mut().commit_now(&root_id, "add player", "main");
//! assert!(commit.is_some());
//!
//! // Diff the whole history and render it
//! let changes = tracker.borrow().evolution(&root_id, None, None);
//! assert_eq!(changes.len(), 2);
//! let summary = ChangeReport::new(&changes).summary();
//! assert!(summary.contains("Total Changes: 2"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod diff;
pub mod graph;
pub mod history;

// Re-export main types for convenience
pub use graph::{
    CommitId, ComponentMap, ComponentValue, EdgeKey, EdgeType, Entity, EntityEdge, EntityGraph,
    EntityId, EventKind, GraphEvent, GraphObserver, LineageId, ObserverHandle,
};

pub use diff::{diff_graphs, ChangeAnalyzer, ChangeKind, ChangeReport, GraphChange};

pub use history::{
    ChangeTracker, GraphSnapshot, HistoryError, HistoryManager, HistoryResult,
    DEFAULT_AUTO_COMMIT_THRESHOLD, DEFAULT_BRANCH,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
