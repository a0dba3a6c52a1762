//! Change records produced by structural diffing

use crate::graph::{ComponentValue, EdgeKey, Entity, EntityEdge, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The nine structural difference kinds, mirroring the mutation event
/// kinds. Each variant carries the identities involved and the old/new
/// payloads that apply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    NodeAdded {
        entity_id: EntityId,
        entity: Entity,
    },
    NodeRemoved {
        entity_id: EntityId,
        entity: Entity,
    },
    NodeModified {
        entity_id: EntityId,
        old: Entity,
        new: Entity,
    },
    EdgeAdded {
        edge_key: EdgeKey,
        edge: EntityEdge,
    },
    EdgeRemoved {
        edge_key: EdgeKey,
        edge: EntityEdge,
    },
    EdgeModified {
        edge_key: EdgeKey,
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

impl ChangeKind {
    /// Stable snake_case tag for this kind
    pub fn name(&self) -> &'static str {
        match self {
            ChangeKind::NodeAdded { .. } => "node_added",
            ChangeKind::NodeRemoved { .. } => "node_removed",
            ChangeKind::NodeModified { .. } => "node_modified",
            ChangeKind::EdgeAdded { .. } => "edge_added",
            ChangeKind::EdgeRemoved { .. } => "edge_removed",
            ChangeKind::EdgeModified { .. } => "edge_modified",
            ChangeKind::ComponentAdded { .. } => "component_added",
            ChangeKind::ComponentRemoved { .. } => "component_removed",
            ChangeKind::ComponentModified { .. } => "component_modified",
        }
    }

    /// Entity the change targets, for the kinds that target one
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            ChangeKind::NodeAdded { entity_id, .. }
            | ChangeKind::NodeRemoved { entity_id, .. }
            | ChangeKind::NodeModified { entity_id, .. }
            | ChangeKind::ComponentAdded { entity_id, .. }
            | ChangeKind::ComponentRemoved { entity_id, .. }
            | ChangeKind::ComponentModified { entity_id, .. } => Some(*entity_id),
            _ => None,
        }
    }

    /// Edge key the change targets, for the edge kinds
    pub fn edge_key(&self) -> Option<EdgeKey> {
        match self {
            ChangeKind::EdgeAdded { edge_key, .. }
            | ChangeKind::EdgeRemoved { edge_key, .. }
            | ChangeKind::EdgeModified { edge_key, .. } => Some(*edge_key),
            _ => None,
        }
    }
}

/// One structural difference between two graph snapshots.
///
/// `details` is a free-form key/value map used by report rendering; the
/// typed payload lives on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphChange {
    pub kind: ChangeKind,
    pub details: BTreeMap<String, serde_json::Value>,
}

impl GraphChange {
    pub fn new(kind: ChangeKind) -> Self {
        GraphChange {
            kind,
            details: BTreeMap::new(),
        }
    }

    pub fn with_details(kind: ChangeKind, details: BTreeMap<String, serde_json::Value>) -> Self {
        GraphChange { kind, details }
    }
}
