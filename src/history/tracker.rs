//! Event aggregator driving commit creation
//!
//! `ChangeTracker` subscribes to graphs as a [`GraphObserver`], buffers
//! pending events per root, and commits through the [`HistoryManager`],
//! either manually via [`ChangeTracker::commit_now`] or automatically when
//! the buffered-event threshold is reached.
//!
//! The tracker never touches the live graph it observes. It keeps a mirror
//! per registered root (a clone taken at registration and kept in sync by
//! replaying every received event), and commits snapshot the mirror. Since
//! every graph mutation emits exactly one event, the mirror is always equal
//! to the live graph at commit time.

use super::manager::{HistoryError, HistoryManager, HistoryResult, DEFAULT_BRANCH};
use super::snapshot::GraphSnapshot;
use crate::diff::GraphChange;
use crate::graph::{CommitId, EntityGraph, EntityId, GraphEvent, GraphObserver};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

/// Buffered events that trigger an automatic commit, unless reconfigured
pub const DEFAULT_AUTO_COMMIT_THRESHOLD: usize = 10;

/// Observer that aggregates mutation events into git-like history.
///
/// Typical wiring:
///
/// ```rust
/// use chronograph::{ChangeTracker, Entity, EntityGraph};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let mut graph = EntityGraph::for_root(Entity::new());
/// let root_id = graph.root_id;
///
/// let tracker = Rc::new(RefCell::new(ChangeTracker::new()));
/// tracker.borrow_mut().register(&graph);
/// graph.add_observer(tracker.clone());
///
/// graph.add_node(Entity::new());
/// let commit = tracker.borrow_mut().commit_now(&root_id, "add node", "main");
/// assert!(commit.is_some());
/// ```
pub struct ChangeTracker {
    history: HistoryManager,
    auto_commit: bool,
    threshold: usize,

    /// Pending events per graph root, cleared on every commit
    pending: FxHashMap<EntityId, Vec<GraphEvent>>,

    /// Event-synced copy of each registered graph
    mirrors: FxHashMap<EntityId, EntityGraph>,
}

impl ChangeTracker {
    /// Tracker with manual commits only
    pub fn new() -> Self {
        ChangeTracker {
            history: HistoryManager::new(),
            auto_commit: false,
            threshold: DEFAULT_AUTO_COMMIT_THRESHOLD,
            pending: FxHashMap::default(),
            mirrors: FxHashMap::default(),
        }
    }

    /// Tracker that commits automatically once `threshold` events have
    /// accumulated for a root
    pub fn with_auto_commit(threshold: usize) -> Self {
        let mut tracker = ChangeTracker::new();
        tracker.auto_commit = true;
        tracker.threshold = threshold;
        tracker
    }

    pub fn set_auto_commit(&mut self, enabled: bool) {
        self.auto_commit = enabled;
    }

    pub fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    /// Start tracking a graph.
    ///
    /// Mirrors the graph's current content and, when the root has no
    /// commit yet, performs an initial commit so every tracked root has at
    /// least one commit before any diff is requested. Registration does not
    /// subscribe the tracker to the graph; the caller wires the observer
    /// handle separately.
    pub fn register(&mut self, graph: &EntityGraph) {
        let root_id = graph.root_id;
        self.mirrors.insert(root_id, graph.clone());
        info!(
            "tracking root {} ({} nodes, {} edges)",
            root_id.short(),
            graph.node_count(),
            graph.edge_count()
        );

        if self.history.commits_for_root(&root_id).is_empty() {
            let _ = self.commit_now(&root_id, "Initial commit", DEFAULT_BRANCH);
        }
    }

    pub fn is_tracking(&self, root_id: &EntityId) -> bool {
        self.mirrors.contains_key(root_id)
    }

    /// Commit the current state of a tracked root. Returns `None` for a
    /// root that was never registered.
    ///
    /// The parent is the root's current head (zero or one), so commits from
    /// this path always extend history linearly. Buffered events are
    /// attached to the new snapshot and the buffer is cleared.
    pub fn commit_now(
        &mut self,
        root_id: &EntityId,
        message: &str,
        branch: &str,
    ) -> Option<CommitId> {
        let mirror = self.mirrors.get(root_id)?;
        let parent_ids: Vec<CommitId> = self.history.head(root_id).copied().into_iter().collect();

        let commit_id = self.history.commit(mirror, message, parent_ids, branch);

        let events = self.pending.remove(root_id).unwrap_or_default();
        if !events.is_empty() {
            debug!(
                "attaching {} buffered events to commit {}",
                events.len(),
                commit_id.short()
            );
        }
        self.history.attach_events(&commit_id, events);

        Some(commit_id)
    }

    /// Changes between two points of a root's history.
    ///
    /// Omitted endpoints default to the earliest and latest commit for the
    /// root. Returns an empty list when fewer than two commits exist.
    pub fn evolution(
        &self,
        root_id: &EntityId,
        from: Option<&CommitId>,
        to: Option<&CommitId>,
    ) -> Vec<GraphChange> {
        if self.history.commits_for_root(root_id).len() < 2 {
            return Vec::new();
        }

        let from = match from {
            Some(commit_id) => Some(*commit_id),
            None => self
                .history
                .commit_log(Some(root_id), None)
                .last()
                .map(|snapshot| snapshot.commit_id),
        };
        let to = match to {
            Some(commit_id) => Some(*commit_id),
            None => self.history.head(root_id).copied(),
        };

        match (from, to) {
            (Some(from), Some(to)) => self.history.diff(&from, &to),
            _ => Vec::new(),
        }
    }

    /// Branch off the current head of a tracked root
    pub fn create_branch_from_head(
        &mut self,
        root_id: &EntityId,
        name: &str,
    ) -> HistoryResult<()> {
        let head = self
            .history
            .head(root_id)
            .copied()
            .ok_or(HistoryError::NoCommits(*root_id))?;
        self.history.create_branch(name, &head)
    }

    /// Full commit history for a root, newest first
    pub fn history_for_root(&self, root_id: &EntityId) -> Vec<&GraphSnapshot> {
        self.history.commit_log(Some(root_id), None)
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryManager {
        &mut self.history
    }

    /// The tracker's event-synced copy of a registered graph
    pub fn tracked_graph(&self, root_id: &EntityId) -> Option<&EntityGraph> {
        self.mirrors.get(root_id)
    }

    /// Events buffered for a root since its last commit
    pub fn pending_count(&self, root_id: &EntityId) -> usize {
        self.pending.get(root_id).map(Vec::len).unwrap_or(0)
    }
}

impl GraphObserver for ChangeTracker {
    fn notify(&mut self, event: &GraphEvent) {
        if let Some(mirror) = self.mirrors.get_mut(&event.root_id) {
            mirror.apply(event);
        }

        let buffer = self.pending.entry(event.root_id).or_default();
        buffer.push(event.clone());
        let buffered = buffer.len();

        if self.auto_commit && buffered >= self.threshold {
            debug!(
                "auto-commit threshold reached for root {} ({} events)",
                event.root_id.short(),
                buffered
            );
            let _ = self.commit_now(
                &event.root_id,
                &format!("Auto-commit: {} changes", buffered),
                DEFAULT_BRANCH,
            );
        }
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}
