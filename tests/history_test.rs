//! Integration tests for the commit graph
//!
//! Exercises commits, branch management, ancestor resolution, and
//! cross-commit diffs through the public API.

use chronograph::{
    ChangeKind, CommitId, ComponentValue, EdgeType, Entity, EntityEdge, EntityGraph, EntityId,
    HistoryError, HistoryManager, LineageId, DEFAULT_BRANCH,
};
use std::collections::HashMap;

fn empty_graph() -> EntityGraph {
    EntityGraph::new(EntityId::generate(), LineageId::generate())
}

#[test]
fn test_two_commit_scenario() {
    let mut history = HistoryManager::new();
    let mut graph = empty_graph();

    // commit 1: a single player entity
    let player = Entity::new();
    let player_id = player.id;
    graph.add_node(player);
    let commit1 = history.commit(&graph, "player joins", Vec::new(), DEFAULT_BRANCH);

    // commit 2: health component, a weapon, and an ownership edge
    let mut health = HashMap::new();
    health.insert("hp".to_string(), ComponentValue::Integer(100));
    graph.add_component(&player_id, "health", ComponentValue::Map(health));

    let weapon = Entity::new();
    let weapon_id = weapon.id;
    graph.add_node(weapon);
    graph.add_edge(EntityEdge::new(
        player_id,
        weapon_id,
        EdgeType::Composition,
        "equipment",
    ));
    let commit2 = history.commit(&graph, "equip weapon", vec![commit1], DEFAULT_BRANCH);

    // exactly three changes: node, then edge, then component phase
    let changes = history.diff(&commit1, &commit2);
    assert_eq!(changes.len(), 3);

    match &changes[0].kind {
        ChangeKind::NodeAdded { entity_id, .. } => assert_eq!(*entity_id, weapon_id),
        other => panic!("expected node_added, got {}", other.name()),
    }
    match &changes[1].kind {
        ChangeKind::EdgeAdded { edge, .. } => {
            assert_eq!(edge.key(), (player_id, weapon_id));
            assert_eq!(edge.edge_type, EdgeType::Composition);
        }
        other => panic!("expected edge_added, got {}", other.name()),
    }
    match &changes[2].kind {
        ChangeKind::ComponentAdded { entity_id, name, .. } => {
            assert_eq!(*entity_id, player_id);
            assert_eq!(name, "health");
        }
        other => panic!("expected component_added, got {}", other.name()),
    }

    // newest first
    let log = history.commit_log(Some(&graph.root_id), None);
    let ids: Vec<CommitId> = log.iter().map(|s| s.commit_id).collect();
    assert_eq!(ids, vec![commit2, commit1]);
}

#[test]
fn test_commit_log_counts_every_commit() {
    let mut history = HistoryManager::new();
    let graph = empty_graph();

    let mut previous: Option<CommitId> = None;
    let mut committed = Vec::new();
    for i in 0..5 {
        let parents = previous.into_iter().collect();
        let commit_id = history.commit(&graph, &format!("commit {}", i), parents, DEFAULT_BRANCH);
        committed.push(commit_id);
        previous = Some(commit_id);
    }

    let log = history.commit_log(None, None);
    assert_eq!(log.len(), 5);
    let logged: Vec<CommitId> = log.iter().map(|s| s.commit_id).collect();
    committed.reverse();
    assert_eq!(logged, committed);
}

#[test]
fn test_graph_at_returns_committed_state() {
    let mut history = HistoryManager::new();
    let mut graph = empty_graph();

    let entity = Entity::new();
    let id = entity.id;
    graph.add_node(entity);
    let commit_id = history.commit(&graph, "one node", Vec::new(), DEFAULT_BRANCH);

    // mutations after the commit do not leak into the snapshot
    graph.add_component(&id, "late", 1i64);
    graph.add_node(Entity::new());

    let committed = history.graph_at(&commit_id).unwrap();
    assert_eq!(committed.node_count(), 1);
    assert_eq!(committed.node(&id).unwrap().component_count(), 0);

    assert!(history.graph_at(&CommitId::generate()).is_none());
}

#[test]
fn test_branching_and_common_ancestor() {
    let mut history = HistoryManager::new();
    let mut graph = empty_graph();

    let a = history.commit(&graph, "a", Vec::new(), DEFAULT_BRANCH);
    assert!(history.create_branch("dev", &a).is_ok());

    graph.add_node(Entity::new());
    let b = history.commit(&graph, "b", vec![a], "dev");

    assert_eq!(history.common_ancestor(&a, &b), Some(a));
    assert_eq!(history.common_ancestor(&b, &a), Some(a));
    assert_eq!(history.common_ancestor(&b, &b), Some(b));

    let mut branches = history.branches();
    branches.sort_unstable();
    assert_eq!(branches, vec!["dev", "main"]);
}

#[test]
fn test_create_branch_failures() {
    let mut history = HistoryManager::new();
    let graph = empty_graph();
    let a = history.commit(&graph, "a", Vec::new(), DEFAULT_BRANCH);

    assert_eq!(
        history.create_branch(DEFAULT_BRANCH, &a),
        Err(HistoryError::BranchExists(DEFAULT_BRANCH.to_string()))
    );

    let unknown = CommitId::generate();
    assert_eq!(
        history.create_branch("feature", &unknown),
        Err(HistoryError::UnknownCommit(unknown))
    );
    assert!(history.branch_head("feature").is_none());
}

#[test]
fn test_diff_with_unknown_commit_is_empty() {
    let mut history = HistoryManager::new();
    let graph = empty_graph();
    let known = history.commit(&graph, "known", Vec::new(), DEFAULT_BRANCH);

    assert!(history.diff(&known, &CommitId::generate()).is_empty());
    assert!(history.diff(&CommitId::generate(), &known).is_empty());
}

#[test]
fn test_histories_of_two_roots_stay_separate() {
    let mut history = HistoryManager::new();
    let first = empty_graph();
    let second = empty_graph();

    let c1 = history.commit(&first, "first root", Vec::new(), DEFAULT_BRANCH);
    let c2 = history.commit(&second, "second root", Vec::new(), "second");

    assert_eq!(history.commits_for_root(&first.root_id), vec![c1]);
    assert_eq!(history.commits_for_root(&second.root_id), vec![c2]);
    assert_eq!(history.head(&first.root_id), Some(&c1));
    assert_eq!(history.head(&second.root_id), Some(&c2));

    // disjoint histories share no ancestor
    assert_eq!(history.common_ancestor(&c1, &c2), None);
}

#[test]
fn test_lineage_index_tracks_commits() {
    let mut history = HistoryManager::new();
    let graph = empty_graph();

    let c1 = history.commit(&graph, "one", Vec::new(), DEFAULT_BRANCH);
    let c2 = history.commit(&graph, "two", vec![c1], DEFAULT_BRANCH);

    let commits = history.commits_for_lineage(&graph.lineage_id);
    assert_eq!(commits, vec![c1, c2]);
    assert!(history
        .commits_for_lineage(&LineageId::generate())
        .is_empty());
}
