//! Integration tests for structural diffing and report rendering

use chronograph::{
    diff_graphs, ChangeKind, ChangeReport, ComponentValue, EdgeType, Entity, EntityEdge,
    EntityGraph, EntityId, LineageId,
};
use std::collections::BTreeSet;

fn empty_graph() -> EntityGraph {
    EntityGraph::new(EntityId::generate(), LineageId::generate())
}

#[test]
fn test_deep_copy_diffs_empty() {
    let mut graph = empty_graph();
    let a = Entity::new();
    let b = Entity::new();
    let (a_id, b_id) = (a.id, b.id);
    graph.add_node(a);
    graph.add_node(b);
    graph.add_component(&a_id, "health", 100i64);
    graph.add_edge(EntityEdge::new(a_id, b_id, EdgeType::Composition, "parts").at_index(0));

    let copy = graph.clone();
    assert!(diff_graphs(&graph, &copy).is_empty());
    assert!(diff_graphs(&copy, &graph).is_empty());
}

#[test]
fn test_node_changes_are_the_symmetric_difference() {
    let shared: Vec<Entity> = (0..3).map(|_| Entity::new()).collect();
    let mut left = empty_graph();
    let mut right = empty_graph();
    for entity in &shared {
        left.add_node(entity.clone());
        right.add_node(entity.clone());
    }

    let only_left: Vec<Entity> = (0..2).map(|_| Entity::new()).collect();
    for entity in &only_left {
        left.add_node(entity.clone());
    }
    let only_right = Entity::new();
    right.add_node(only_right.clone());

    let changes = diff_graphs(&left, &right);

    let added: BTreeSet<EntityId> = changes
        .iter()
        .filter_map(|c| match &c.kind {
            ChangeKind::NodeAdded { entity_id, .. } => Some(*entity_id),
            _ => None,
        })
        .collect();
    let removed: BTreeSet<EntityId> = changes
        .iter()
        .filter_map(|c| match &c.kind {
            ChangeKind::NodeRemoved { entity_id, .. } => Some(*entity_id),
            _ => None,
        })
        .collect();

    let expected_added: BTreeSet<EntityId> = [only_right.id].into_iter().collect();
    let expected_removed: BTreeSet<EntityId> = only_left.iter().map(|e| e.id).collect();
    assert_eq!(added, expected_added);
    assert_eq!(removed, expected_removed);
    assert_eq!(changes.len(), 3);
}

#[test]
fn test_empty_graph_yields_only_additions() {
    let before = empty_graph();
    let mut after = before.clone();
    let a = Entity::new();
    let b = Entity::new();
    let (a_id, b_id) = (a.id, b.id);
    after.add_node(a);
    after.add_node(b);
    after.add_edge(EntityEdge::new(a_id, b_id, EdgeType::Association, "peer"));

    let changes = diff_graphs(&before, &after);
    assert_eq!(changes.len(), 3);
    assert!(changes
        .iter()
        .all(|c| matches!(c.kind.name(), "node_added" | "edge_added")));
}

#[test]
fn test_diff_is_deterministic() {
    let mut left = empty_graph();
    let mut right = empty_graph();
    for _ in 0..20 {
        left.add_node(Entity::new());
        right.add_node(Entity::new());
    }

    let first = diff_graphs(&left, &right);
    let second = diff_graphs(&left, &right);
    assert_eq!(first, second);
    assert_eq!(first.len(), 40);

    // sorted within each phase
    let added: Vec<EntityId> = first
        .iter()
        .filter_map(|c| match &c.kind {
            ChangeKind::NodeAdded { entity_id, .. } => Some(*entity_id),
            _ => None,
        })
        .collect();
    let mut sorted = added.clone();
    sorted.sort_unstable();
    assert_eq!(added, sorted);
}

#[test]
fn test_component_value_modification_detected() {
    let mut before = empty_graph();
    let entity = Entity::new();
    let id = entity.id;
    before.add_node(entity);
    before.add_component(
        &id,
        "position",
        vec![ComponentValue::Float(0.0), ComponentValue::Float(1.0)],
    );

    let mut after = before.clone();
    after.update_component(
        &id,
        "position",
        vec![ComponentValue::Float(0.0), ComponentValue::Float(2.5)],
    );

    let changes = diff_graphs(&before, &after);
    assert_eq!(changes.len(), 1);
    match &changes[0].kind {
        ChangeKind::ComponentModified {
            entity_id,
            name,
            old_value,
            new_value,
        } => {
            assert_eq!(*entity_id, id);
            assert_eq!(name, "position");
            assert_ne!(old_value, new_value);
        }
        other => panic!("expected component_modified, got {}", other.name()),
    }
}

#[test]
fn test_edge_metadata_modification_details() {
    let a = EntityId::generate();
    let b = EntityId::generate();
    let mut before = empty_graph();
    before.add_edge(EntityEdge::new(a, b, EdgeType::ListItem, "items").at_index(0));

    let mut after = before.clone();
    after.update_edge(EntityEdge::new(a, b, EdgeType::ListItem, "items").at_index(4));

    let changes = diff_graphs(&before, &after);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind.name(), "edge_modified");
    let detail = &changes[0].details["container_index"];
    assert_eq!(detail["old"], 0);
    assert_eq!(detail["new"], 4);
    assert_eq!(changes[0].details.len(), 1);
}

#[test]
fn test_report_over_full_diff() {
    let mut before = empty_graph();
    let keeper = Entity::new();
    let keeper_id = keeper.id;
    before.add_node(keeper);
    before.add_component(&keeper_id, "health", 100i64);

    let mut after = before.clone();
    after.update_component(&keeper_id, "health", 10i64);
    let fresh = Entity::new();
    let fresh_id = fresh.id;
    after.add_node(fresh);
    after.add_edge(EntityEdge::new(keeper_id, fresh_id, EdgeType::Composition, "spawn"));

    let changes = diff_graphs(&before, &after);
    let report = ChangeReport::new(&changes);

    let summary = report.summary();
    assert!(summary.contains("node_added: 1"));
    assert!(summary.contains("edge_added: 1"));
    assert!(summary.contains("component_modified: 1"));
    assert!(summary.contains("Total Changes: 3"));

    let detailed = report.detailed_report();
    assert!(detailed.contains("=== COMPONENT_MODIFIED ==="));
    assert!(detailed.contains(&format!("Entity: {}...", keeper_id.short())));

    let diagram = report.mermaid_diff(&before, &after);
    assert!(diagram.contains(":::addedNode"));
    assert!(diagram.contains(":::modifiedNode"));
    assert!(diagram.contains("-.->|+spawn|"));
}
