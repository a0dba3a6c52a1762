//! Entity records: identity, versioning, and component storage

use super::component::{ComponentMap, ComponentValue};
use super::types::{EntityId, LineageId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A uniquely identified record holding named component payloads.
///
/// Identity is two-level: `id` names this version of the record and is
/// unique within any single graph, while `lineage_id` stays stable across
/// re-versioning. Re-versioning is an operation on the record itself
/// ([`Entity::bump_version`]), not on graph state.
///
/// An entity holds no reference back to a graph. Tracked component mutation
/// goes through the owning graph, addressed by id; the accessors here are
/// plain record operations and never notify anyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Identity of this version, unique within a graph
    pub id: EntityId,

    /// Stable identity across versions of the same logical entity
    pub lineage_id: LineageId,

    /// Root of the owning graph; set when the entity is attached
    pub root_id: Option<EntityId>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Predecessor version, when this record has been re-versioned
    pub previous_id: Option<EntityId>,

    /// Named component payloads, opaque to the history engine
    pub components: ComponentMap,
}

impl Entity {
    /// Create a detached entity with a fresh id and lineage
    pub fn new() -> Self {
        Entity {
            id: EntityId::generate(),
            lineage_id: LineageId::generate(),
            root_id: None,
            created_at: Utc::now().timestamp_millis(),
            previous_id: None,
            components: ComponentMap::new(),
        }
    }

    /// Create a detached entity pre-populated with components
    pub fn with_components(components: ComponentMap) -> Self {
        let mut entity = Entity::new();
        entity.components = components;
        entity
    }

    /// Re-version this record: the current id moves to `previous_id`, a
    /// fresh id is assigned, and the lineage is preserved. Returns the new
    /// id.
    pub fn bump_version(&mut self) -> EntityId {
        self.previous_id = Some(self.id);
        self.id = EntityId::generate();
        self.created_at = Utc::now().timestamp_millis();
        self.id
    }

    /// Set a component on the detached record. Does not notify: use the
    /// graph's component operations for tracked mutation.
    pub fn set_component(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ComponentValue>,
    ) -> Option<ComponentValue> {
        self.components.insert(name.into(), value.into())
    }

    pub fn component(&self, name: &str) -> Option<&ComponentValue> {
        self.components.get(name)
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Component names in sorted order, for deterministic reporting
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
