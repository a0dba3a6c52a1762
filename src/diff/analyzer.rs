//! Structural diff between two graph snapshots
//!
//! Pure computation: the analyzer never mutates its inputs, never fails,
//! and is deterministic: candidate id sets are walked in sorted order.

use super::types::{ChangeKind, GraphChange};
use crate::graph::{EdgeKey, EntityGraph, EntityId};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

/// Computes the structural differences between an old and a new graph
/// state, however those states were obtained.
///
/// Result order is node changes, then edge changes, then component
/// changes; within each phase, ids are visited in sorted order. Node
/// identity is by id only: two different ids are never structurally
/// compared, even when they share a lineage. Diffing a graph against
/// itself yields an empty list.
pub struct ChangeAnalyzer<'a> {
    old: &'a EntityGraph,
    new: &'a EntityGraph,
}

impl<'a> ChangeAnalyzer<'a> {
    pub fn new(old: &'a EntityGraph, new: &'a EntityGraph) -> Self {
        ChangeAnalyzer { old, new }
    }

    /// Run the full three-phase analysis
    pub fn analyze(&self) -> Vec<GraphChange> {
        let mut changes = Vec::new();
        self.node_changes(&mut changes);
        self.edge_changes(&mut changes);
        self.component_changes(&mut changes);
        changes
    }

    fn node_changes(&self, out: &mut Vec<GraphChange>) {
        let old_ids: BTreeSet<EntityId> = self.old.node_ids().copied().collect();
        let new_ids: BTreeSet<EntityId> = self.new.node_ids().copied().collect();

        for id in new_ids.difference(&old_ids) {
            if let Some(entity) = self.new.node(id) {
                let mut details = BTreeMap::new();
                details.insert("components".to_string(), json!(entity.component_names()));
                out.push(GraphChange::with_details(
                    ChangeKind::NodeAdded {
                        entity_id: *id,
                        entity: entity.clone(),
                    },
                    details,
                ));
            }
        }

        for id in old_ids.difference(&new_ids) {
            if let Some(entity) = self.old.node(id) {
                let mut details = BTreeMap::new();
                details.insert("components".to_string(), json!(entity.component_names()));
                out.push(GraphChange::with_details(
                    ChangeKind::NodeRemoved {
                        entity_id: *id,
                        entity: entity.clone(),
                    },
                    details,
                ));
            }
        }
    }

    fn edge_changes(&self, out: &mut Vec<GraphChange>) {
        let old_keys: BTreeSet<EdgeKey> = self.old.edge_keys().copied().collect();
        let new_keys: BTreeSet<EdgeKey> = self.new.edge_keys().copied().collect();

        for key in new_keys.difference(&old_keys) {
            if let Some(edge) = self.new.edge(&key.0, &key.1) {
                out.push(GraphChange::with_details(
                    ChangeKind::EdgeAdded {
                        edge_key: *key,
                        edge: edge.clone(),
                    },
                    Self::edge_details(edge),
                ));
            }
        }

        for key in old_keys.difference(&new_keys) {
            if let Some(edge) = self.old.edge(&key.0, &key.1) {
                out.push(GraphChange::with_details(
                    ChangeKind::EdgeRemoved {
                        edge_key: *key,
                        edge: edge.clone(),
                    },
                    Self::edge_details(edge),
                ));
            }
        }

        for key in old_keys.intersection(&new_keys) {
            let (old_edge, new_edge) = match (
                self.old.edge(&key.0, &key.1),
                self.new.edge(&key.0, &key.1),
            ) {
                (Some(old_edge), Some(new_edge)) => (old_edge, new_edge),
                _ => continue,
            };
            if old_edge.differs_from(new_edge) {
                out.push(GraphChange::with_details(
                    ChangeKind::EdgeModified {
                        edge_key: *key,
                        old_edge: old_edge.clone(),
                        new_edge: new_edge.clone(),
                    },
                    old_edge.field_differences(new_edge),
                ));
            }
        }
    }

    /// Component comparison runs only over ids present in both snapshots
    fn component_changes(&self, out: &mut Vec<GraphChange>) {
        let old_ids: BTreeSet<EntityId> = self.old.node_ids().copied().collect();
        let new_ids: BTreeSet<EntityId> = self.new.node_ids().copied().collect();

        for id in old_ids.intersection(&new_ids) {
            let (old_entity, new_entity) = match (self.old.node(id), self.new.node(id)) {
                (Some(old_entity), Some(new_entity)) => (old_entity, new_entity),
                _ => continue,
            };

            let old_names: BTreeSet<&str> = old_entity.component_names().into_iter().collect();
            let new_names: BTreeSet<&str> = new_entity.component_names().into_iter().collect();

            for name in new_names.difference(&old_names) {
                if let Some(value) = new_entity.component(name) {
                    let mut details = BTreeMap::new();
                    details.insert("value_type".to_string(), json!(value.type_name()));
                    out.push(GraphChange::with_details(
                        ChangeKind::ComponentAdded {
                            entity_id: *id,
                            name: name.to_string(),
                            value: value.clone(),
                        },
                        details,
                    ));
                }
            }

            for name in old_names.difference(&new_names) {
                if let Some(value) = old_entity.component(name) {
                    let mut details = BTreeMap::new();
                    details.insert("value_type".to_string(), json!(value.type_name()));
                    out.push(GraphChange::with_details(
                        ChangeKind::ComponentRemoved {
                            entity_id: *id,
                            name: name.to_string(),
                            value: value.clone(),
                        },
                        details,
                    ));
                }
            }

            for name in old_names.intersection(&new_names) {
                let (old_value, new_value) =
                    match (old_entity.component(name), new_entity.component(name)) {
                        (Some(old_value), Some(new_value)) => (old_value, new_value),
                        _ => continue,
                    };
                if old_value != new_value {
                    let mut details = BTreeMap::new();
                    details.insert("old_type".to_string(), json!(old_value.type_name()));
                    details.insert("new_type".to_string(), json!(new_value.type_name()));
                    out.push(GraphChange::with_details(
                        ChangeKind::ComponentModified {
                            entity_id: *id,
                            name: name.to_string(),
                            old_value: old_value.clone(),
                            new_value: new_value.clone(),
                        },
                        details,
                    ));
                }
            }
        }
    }

    fn edge_details(edge: &crate::graph::EntityEdge) -> BTreeMap<String, serde_json::Value> {
        let mut details = BTreeMap::new();
        details.insert("source_id".to_string(), json!(edge.source_id.to_string()));
        details.insert("target_id".to_string(), json!(edge.target_id.to_string()));
        details.insert("edge_type".to_string(), json!(edge.edge_type.as_str()));
        details.insert("field_name".to_string(), json!(edge.field_name));
        details
    }
}

/// Diff two graph states in one call
pub fn diff_graphs(old: &EntityGraph, new: &EntityGraph) -> Vec<GraphChange> {
    ChangeAnalyzer::new(old, new).analyze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeType, Entity, EntityEdge, LineageId};

    fn empty_graph() -> EntityGraph {
        EntityGraph::new(EntityId::generate(), LineageId::generate())
    }

    #[test]
    fn test_self_diff_is_empty() {
        let mut graph = empty_graph();
        let entity = Entity::new();
        let id = entity.id;
        graph.add_node(entity);
        graph.add_component(&id, "health", 100i64);

        assert!(diff_graphs(&graph, &graph).is_empty());
        assert!(diff_graphs(&graph, &graph.clone()).is_empty());
    }

    #[test]
    fn test_phase_order() {
        let old = empty_graph();
        let mut new = old.clone();
        let a = Entity::new();
        let b = Entity::new();
        let (a_id, b_id) = (a.id, b.id);
        new.add_node(a);
        new.add_node(b);
        new.add_edge(EntityEdge::new(a_id, b_id, EdgeType::Composition, "parts"));

        let changes = diff_graphs(&old, &new);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].kind.name(), "node_added");
        assert_eq!(changes[1].kind.name(), "node_added");
        assert_eq!(changes[2].kind.name(), "edge_added");
    }

    #[test]
    fn test_component_diff_restricted_to_shared_nodes() {
        let mut old = empty_graph();
        let survivor = Entity::new();
        let doomed = Entity::new();
        let survivor_id = survivor.id;
        let doomed_id = doomed.id;
        old.add_node(survivor);
        old.add_node(doomed);
        old.add_component(&survivor_id, "health", 100i64);
        old.add_component(&doomed_id, "health", 5i64);

        let mut new = old.clone();
        new.remove_node(&doomed_id);
        new.update_component(&survivor_id, "health", 42i64);

        let changes = diff_graphs(&old, &new);
        // one removal, one modification; the doomed node's components are
        // not reported separately
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind.name(), "node_removed");
        assert_eq!(changes[1].kind.name(), "component_modified");
        assert_eq!(changes[1].kind.entity_id(), Some(survivor_id));
    }

    #[test]
    fn test_equal_component_values_produce_no_change() {
        use crate::graph::ComponentValue;

        let mut old = empty_graph();
        let entity = Entity::new();
        let id = entity.id;
        old.add_node(entity);
        old.add_component(
            &id,
            "tags",
            vec![ComponentValue::Integer(1), ComponentValue::Integer(2)],
        );

        let new = old.clone();
        assert!(diff_graphs(&old, &new).is_empty());
    }

    #[test]
    fn test_edge_modified_details() {
        let mut old = empty_graph();
        let a = EntityId::generate();
        let b = EntityId::generate();
        old.add_edge(EntityEdge::new(a, b, EdgeType::Aggregation, "members"));

        let mut new = old.clone();
        new.update_edge(EntityEdge::new(a, b, EdgeType::Composition, "members").at_index(2));

        let changes = diff_graphs(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind.name(), "edge_modified");
        assert!(changes[0].details.contains_key("edge_type"));
        assert!(changes[0].details.contains_key("container_index"));
        assert!(!changes[0].details.contains_key("field_name"));
    }

    #[test]
    fn test_deterministic_output() {
        let mut old = empty_graph();
        let mut new = old.clone();
        for _ in 0..16 {
            new.add_node(Entity::new());
        }
        old.add_node(Entity::new());

        let first = diff_graphs(&old, &new);
        let second = diff_graphs(&old, &new);
        assert_eq!(first, second);
        assert_eq!(first.len(), 17);
    }
}
