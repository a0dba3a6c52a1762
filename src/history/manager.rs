//! Git-like commit graph over entity graphs
//!
//! Stores immutable snapshots, tracks branch pointers and per-root/
//! per-lineage commit indices, and resolves ancestor relationships.

use super::snapshot::GraphSnapshot;
use crate::diff::{diff_graphs, GraphChange};
use crate::graph::{CommitId, EntityGraph, EntityId, GraphEvent, LineageId};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Branch new commits land on when the caller does not name one
pub const DEFAULT_BRANCH: &str = "main";

/// Structural failures of history operations.
///
/// Not-found lookups are `Option`/empty results, not errors; this enum
/// covers the cases a caller must actively recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("branch {0} already exists")]
    BranchExists(String),

    #[error("commit {0} not found")]
    UnknownCommit(CommitId),

    #[error("root {0} has no commits")]
    NoCommits(EntityId),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Commit storage plus the indices needed to answer branch, head, root,
/// lineage, and ancestry queries.
///
/// Invariants: every commit id referenced by an index exists in `commits`;
/// once a root has any commit, `heads` points at a member of that root's
/// commit set. The commit map is insertion-ordered, so a snapshot's
/// position doubles as its commit sequence.
#[derive(Debug, Default)]
pub struct HistoryManager {
    /// All snapshots, in commit order
    commits: IndexMap<CommitId, GraphSnapshot>,

    /// Branch name -> head commit
    branches: IndexMap<String, CommitId>,

    /// Root id -> commits holding a state of that root
    root_commits: FxHashMap<EntityId, IndexSet<CommitId>>,

    /// Root id -> latest commit
    heads: FxHashMap<EntityId, CommitId>,

    /// Lineage id -> commits holding a state of that lineage
    lineage_commits: FxHashMap<LineageId, IndexSet<CommitId>>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a snapshot of the graph.
    ///
    /// Always creates a new snapshot, even when the content is identical to
    /// its parent; history never dedups. Updates the branch pointer and the
    /// root, head, and lineage indices.
    pub fn commit(
        &mut self,
        graph: &EntityGraph,
        message: &str,
        parent_ids: Vec<CommitId>,
        branch: &str,
    ) -> CommitId {
        let snapshot = GraphSnapshot::capture(graph, message, parent_ids);
        let commit_id = snapshot.commit_id;

        self.branches.insert(branch.to_string(), commit_id);
        self.root_commits
            .entry(graph.root_id)
            .or_default()
            .insert(commit_id);
        self.heads.insert(graph.root_id, commit_id);
        self.lineage_commits
            .entry(graph.lineage_id)
            .or_default()
            .insert(commit_id);

        debug!(
            "commit {} on {} ({} nodes, {} edges): {}",
            commit_id.short(),
            branch,
            graph.node_count(),
            graph.edge_count(),
            message
        );

        self.commits.insert(commit_id, snapshot);
        commit_id
    }

    /// Append buffered events to an existing snapshot. Returns `false` for
    /// an unknown commit.
    pub fn attach_events(&mut self, commit_id: &CommitId, events: Vec<GraphEvent>) -> bool {
        match self.commits.get_mut(commit_id) {
            Some(snapshot) => {
                snapshot.events.extend(events);
                true
            }
            None => false,
        }
    }

    pub fn get_commit(&self, commit_id: &CommitId) -> Option<&GraphSnapshot> {
        self.commits.get(commit_id)
    }

    /// Graph state captured at the given commit
    pub fn graph_at(&self, commit_id: &CommitId) -> Option<&EntityGraph> {
        self.get_commit(commit_id).map(|snapshot| &snapshot.graph)
    }

    /// Create a branch pointing at an existing commit. Never overwrites an
    /// existing branch.
    pub fn create_branch(&mut self, name: &str, from_commit: &CommitId) -> HistoryResult<()> {
        if self.branches.contains_key(name) {
            return Err(HistoryError::BranchExists(name.to_string()));
        }
        if !self.commits.contains_key(from_commit) {
            return Err(HistoryError::UnknownCommit(*from_commit));
        }
        self.branches.insert(name.to_string(), *from_commit);
        info!("created branch {} at {}", name, from_commit.short());
        Ok(())
    }

    pub fn branch_head(&self, name: &str) -> Option<&CommitId> {
        self.branches.get(name)
    }

    pub fn branches(&self) -> Vec<&str> {
        self.branches.keys().map(String::as_str).collect()
    }

    /// Latest commit for a root
    pub fn head(&self, root_id: &EntityId) -> Option<&CommitId> {
        self.heads.get(root_id)
    }

    pub fn commits_for_root(&self, root_id: &EntityId) -> Vec<CommitId> {
        self.root_commits
            .get(root_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn commits_for_lineage(&self, lineage_id: &LineageId) -> Vec<CommitId> {
        self.lineage_commits
            .get(lineage_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Transitive closure over parent links. A commit is its own ancestor;
    /// an unknown commit has no ancestors.
    pub fn ancestors(&self, commit_id: &CommitId) -> FxHashSet<CommitId> {
        let mut ancestors = FxHashSet::default();
        let mut to_visit = vec![*commit_id];

        while let Some(current) = to_visit.pop() {
            if ancestors.contains(&current) {
                continue;
            }
            if let Some(snapshot) = self.commits.get(&current) {
                ancestors.insert(current);
                to_visit.extend(snapshot.parent_ids.iter().copied());
            }
        }

        ancestors
    }

    /// A common ancestor of the two commits, or `None` when their histories
    /// are disjoint.
    ///
    /// When several common ancestors exist, the most recently committed one
    /// wins (position in the commit map), which for histories built from
    /// linear commits and branch points is the nearest common ancestor.
    /// Deterministic: `common_ancestor(c, c)` is `c`.
    pub fn common_ancestor(&self, a: &CommitId, b: &CommitId) -> Option<CommitId> {
        let ancestors_a = self.ancestors(a);
        if ancestors_a.is_empty() {
            return None;
        }
        let ancestors_b = self.ancestors(b);

        ancestors_a
            .intersection(&ancestors_b)
            .max_by_key(|id| self.commits.get_index_of(*id))
            .copied()
    }

    /// All commits, optionally filtered to one root, newest first.
    ///
    /// Ordering is by timestamp descending; commits sharing a millisecond
    /// fall back to commit order, newest first.
    pub fn commit_log(
        &self,
        root_id: Option<&EntityId>,
        limit: Option<usize>,
    ) -> Vec<&GraphSnapshot> {
        let mut snapshots: Vec<&GraphSnapshot> = match root_id {
            Some(root) => self
                .root_commits
                .get(root)
                .map(|ids| ids.iter().filter_map(|id| self.commits.get(id)).collect())
                .unwrap_or_default(),
            None => self.commits.values().collect(),
        };

        snapshots.reverse();
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        if let Some(limit) = limit {
            snapshots.truncate(limit);
        }
        snapshots
    }

    /// Structural diff between two committed states. Unknown commits yield
    /// an empty list.
    pub fn diff(&self, from: &CommitId, to: &CommitId) -> Vec<GraphChange> {
        match (self.graph_at(from), self.graph_at(to)) {
            (Some(old), Some(new)) => diff_graphs(old, new),
            _ => {
                warn!(
                    "diff requested for unknown commit ({} or {})",
                    from.short(),
                    to.short()
                );
                Vec::new()
            }
        }
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
