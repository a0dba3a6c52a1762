//! Mutation events emitted by the graph
//!
//! Every successful graph mutation produces exactly one event, delivered
//! synchronously to all registered observers before the mutating call
//! returns. Events carry enough payload to replay the mutation onto another
//! graph ([`crate::graph::EntityGraph::apply`]), which is how the change
//! tracker keeps its mirrors in sync.

use super::component::ComponentValue;
use super::edge::EntityEdge;
use super::entity::Entity;
use super::types::EntityId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One atomic mutation, as seen by observers.
///
/// `root_id` and `timestamp` are set by the emitting graph, not by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    /// Root identity of the graph that emitted the event
    pub root_id: EntityId,

    /// Emission timestamp (Unix milliseconds)
    pub timestamp: i64,

    pub kind: EventKind,
}

impl GraphEvent {
    pub(crate) fn new(root_id: EntityId, kind: EventKind) -> Self {
        GraphEvent {
            root_id,
            timestamp: Utc::now().timestamp_millis(),
            kind,
        }
    }
}

/// The nine mutation kinds.
///
/// Downstream tooling matches on these variants; [`EventKind::name`] gives
/// the stable snake_case tag for contexts that key on strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NodeAdded {
        entity: Entity,
    },
    NodeRemoved {
        entity: Entity,
    },
    NodeModified {
        entity_id: EntityId,
        old: Entity,
        new: Entity,
    },
    EdgeAdded {
        edge: EntityEdge,
    },
    EdgeRemoved {
        edge: EntityEdge,
    },
    EdgeModified {
        old_edge: EntityEdge,
        new_edge: EntityEdge,
    },
    ComponentAdded {
        entity_id: EntityId,
        name: String,
        value: ComponentValue,
    },
    ComponentRemoved {
        entity_id: EntityId,
        name: String,
        value: ComponentValue,
    },
    ComponentModified {
        entity_id: EntityId,
        name: String,
        old_value: ComponentValue,
        new_value: ComponentValue,
    },
}

impl EventKind {
    /// Stable snake_case tag for this kind
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::NodeAdded { .. } => "node_added",
            EventKind::NodeRemoved { .. } => "node_removed",
            EventKind::NodeModified { .. } => "node_modified",
            EventKind::EdgeAdded { .. } => "edge_added",
            EventKind::EdgeRemoved { .. } => "edge_removed",
            EventKind::EdgeModified { .. } => "edge_modified",
            EventKind::ComponentAdded { .. } => "component_added",
            EventKind::ComponentRemoved { .. } => "component_removed",
            EventKind::ComponentModified { .. } => "component_modified",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_root_and_timestamp() {
        let root_id = EntityId::generate();
        let event = GraphEvent::new(
            root_id,
            EventKind::NodeAdded {
                entity: Entity::new(),
            },
        );
        assert_eq!(event.root_id, root_id);
        assert!(event.timestamp > 0);
    }

    #[test]
    fn test_kind_tags() {
        let entity = Entity::new();
        let kind = EventKind::NodeAdded {
            entity: entity.clone(),
        };
        assert_eq!(kind.name(), "node_added");

        let kind = EventKind::ComponentModified {
            entity_id: entity.id,
            name: "health".to_string(),
            old_value: 1i64.into(),
            new_value: 2i64.into(),
        };
        assert_eq!(kind.name(), "component_modified");
    }
}
