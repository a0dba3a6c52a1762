//! Typed, directional relationships between entities

use super::types::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// Key of an edge within a graph. At most one edge exists per ordered
/// `(source, target)` pair at a time.
pub type EdgeKey = (EntityId, EntityId);

/// Relationship kind between two entities.
///
/// The ownership semantics implied by `Composition` (exclusive) and
/// `Aggregation` (shared) are recorded for downstream consumers, not
/// enforced by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Association,
    Aggregation,
    Composition,
    /// Item in an ordered collection
    ListItem,
    /// Value in a key-value mapping
    DictValue,
    /// Member of an unordered collection
    SetMember,
    /// Item in a fixed-size tuple
    TupleItem,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Association => "association",
            EdgeType::Aggregation => "aggregation",
            EdgeType::Composition => "composition",
            EdgeType::ListItem => "list_item",
            EdgeType::DictValue => "dict_value",
            EdgeType::SetMember => "set_member",
            EdgeType::TupleItem => "tuple_item",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directed, typed edge between two entities.
///
/// `field_name` is the logical relation name on the source entity;
/// `container_index` and `container_key` disambiguate the position when the
/// relation lives inside an ordered or keyed collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEdge {
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub edge_type: EdgeType,

    /// Logical relation name on the source entity
    pub field_name: String,

    /// Position within an ordered collection, when applicable
    pub container_index: Option<usize>,

    /// Key within a keyed collection, when applicable
    pub container_key: Option<String>,
}

impl EntityEdge {
    pub fn new(
        source_id: EntityId,
        target_id: EntityId,
        edge_type: EdgeType,
        field_name: impl Into<String>,
    ) -> Self {
        EntityEdge {
            source_id,
            target_id,
            edge_type,
            field_name: field_name.into(),
            container_index: None,
            container_key: None,
        }
    }

    /// Position this edge inside an ordered collection
    pub fn at_index(mut self, index: usize) -> Self {
        self.container_index = Some(index);
        self
    }

    /// Position this edge inside a keyed collection
    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        self.container_key = Some(key.into());
        self
    }

    pub fn key(&self) -> EdgeKey {
        (self.source_id, self.target_id)
    }

    /// True when any compared metadata field (`edge_type`, `field_name`,
    /// `container_index`, `container_key`) differs between the two edges
    pub fn differs_from(&self, other: &EntityEdge) -> bool {
        self.edge_type != other.edge_type
            || self.field_name != other.field_name
            || self.container_index != other.container_index
            || self.container_key != other.container_key
    }

    /// Per-field `{old, new}` map covering exactly the fields that differ
    pub fn field_differences(&self, newer: &EntityEdge) -> BTreeMap<String, serde_json::Value> {
        let mut differences = BTreeMap::new();

        if self.edge_type != newer.edge_type {
            differences.insert(
                "edge_type".to_string(),
                json!({ "old": self.edge_type.as_str(), "new": newer.edge_type.as_str() }),
            );
        }
        if self.field_name != newer.field_name {
            differences.insert(
                "field_name".to_string(),
                json!({ "old": self.field_name, "new": newer.field_name }),
            );
        }
        if self.container_index != newer.container_index {
            differences.insert(
                "container_index".to_string(),
                json!({ "old": self.container_index, "new": newer.container_index }),
            );
        }
        if self.container_key != newer.container_key {
            differences.insert(
                "container_key".to_string(),
                json!({ "old": self.container_key, "new": newer.container_key }),
            );
        }

        differences
    }
}
