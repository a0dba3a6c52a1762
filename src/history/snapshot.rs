//! Immutable commit snapshots

use crate::graph::{CommitId, EntityGraph, GraphEvent};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// An immutable, timestamped copy of a graph's state, linked to its parent
/// commits.
///
/// Zero parents marks a root commit, one a linear commit, two or more a
/// merge commit (merge construction itself lives outside this engine).
/// `events` holds the mutation events accumulated since the previous commit
/// on this lineage, when a tracker recorded them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Unique id, generated at commit time
    pub commit_id: CommitId,

    /// Deep copy of the committed graph content
    pub graph: EntityGraph,

    pub parent_ids: Vec<CommitId>,

    /// Commit timestamp (Unix milliseconds)
    pub timestamp: i64,

    pub message: String,

    /// Events observed since the parent commit, attached by the tracker
    pub events: Vec<GraphEvent>,
}

impl GraphSnapshot {
    /// Capture the current state of a graph under a fresh commit id
    pub(crate) fn capture(
        graph: &EntityGraph,
        message: impl Into<String>,
        parent_ids: Vec<CommitId>,
    ) -> Self {
        GraphSnapshot {
            commit_id: CommitId::generate(),
            graph: graph.clone(),
            parent_ids,
            timestamp: Utc::now().timestamp_millis(),
            message: message.into(),
            events: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
