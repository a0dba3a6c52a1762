//! The live entity graph: mutation primitives with synchronous notification
//!
//! The graph owns every entity in its node map (arena model). Component
//! mutation is addressed to the graph by entity id, so every tracked change
//! flows through a graph method and can be observed; an `Entity` value
//! manipulated outside a graph is plain data and notifies nobody.

use super::component::ComponentValue;
use super::edge::{EdgeKey, EdgeType, EntityEdge};
use super::entity::Entity;
use super::event::{EventKind, GraphEvent};
use super::observer::ObserverHandle;
use super::types::{EntityId, LineageId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// The live, mutable collection of entities and edges sharing one root
/// identity.
///
/// Contract: every successful mutation emits exactly one [`GraphEvent`] to
/// every registered observer before the mutating call returns. Duplicate
/// insertions (node id or edge key already present) are silent no-ops with
/// no event; removals of absent items return `None` and emit nothing.
///
/// Node and edge maps are insertion-ordered, so iteration, logs, and
/// reports are reproducible run to run.
#[derive(Serialize, Deserialize)]
pub struct EntityGraph {
    /// Root identity shared by everything in this graph
    pub root_id: EntityId,

    /// Lineage of the root entity
    pub lineage_id: LineageId,

    nodes: IndexMap<EntityId, Entity>,
    edges: IndexMap<EdgeKey, EntityEdge>,

    /// Live wiring, not state: dropped by `Clone` and skipped by serde
    #[serde(skip)]
    observers: Vec<ObserverHandle>,
}

impl EntityGraph {
    /// Create an empty graph with explicit identities
    pub fn new(root_id: EntityId, lineage_id: LineageId) -> Self {
        EntityGraph {
            root_id,
            lineage_id,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            observers: Vec::new(),
        }
    }

    /// Create a graph rooted at the given entity, with the entity already
    /// attached as its first node
    pub fn for_root(root: Entity) -> Self {
        let mut graph = EntityGraph::new(root.id, root.lineage_id);
        graph.add_node(root);
        graph
    }

    // ---- observers ----

    /// Register an observer. Registering the same handle twice is a no-op.
    pub fn add_observer(&mut self, observer: ObserverHandle) {
        if !self.observers.iter().any(|o| Rc::ptr_eq(o, &observer)) {
            self.observers.push(observer);
        }
    }

    /// Deregister an observer by handle identity
    pub fn remove_observer(&mut self, observer: &ObserverHandle) {
        self.observers.retain(|o| !Rc::ptr_eq(o, observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn emit(&self, kind: EventKind) {
        let event = GraphEvent::new(self.root_id, kind);
        for observer in &self.observers {
            observer.borrow_mut().notify(&event);
        }
    }

    // ---- node mutation ----

    /// Attach an entity to this graph. The entity's `root_id` is set to the
    /// graph root. A duplicate id is a silent no-op.
    pub fn add_node(&mut self, mut entity: Entity) {
        if self.nodes.contains_key(&entity.id) {
            debug!("node {} already present, ignoring add", entity.id);
            return;
        }
        entity.root_id = Some(self.root_id);
        self.nodes.insert(entity.id, entity.clone());
        self.emit(EventKind::NodeAdded { entity });
    }

    /// Detach and return an entity. Incident edges are not cascaded.
    pub fn remove_node(&mut self, id: &EntityId) -> Option<Entity> {
        let entity = self.nodes.shift_remove(id)?;
        self.emit(EventKind::NodeRemoved {
            entity: entity.clone(),
        });
        Some(entity)
    }

    /// Swap the stored record for an existing id wholesale, emitting
    /// `NodeModified`. Returns `false` for an unknown id.
    pub fn replace_node(&mut self, mut entity: Entity) -> bool {
        let entity_id = entity.id;
        entity.root_id = Some(self.root_id);
        let old = match self.nodes.get_mut(&entity_id) {
            Some(existing) => std::mem::replace(existing, entity.clone()),
            None => return false,
        };
        self.emit(EventKind::NodeModified {
            entity_id,
            old,
            new: entity,
        });
        true
    }

    // ---- edge mutation ----

    /// Insert an edge. A duplicate `(source, target)` key is a silent
    /// no-op; the stored edge is kept. Endpoints are not required to exist
    /// in the node map.
    pub fn add_edge(&mut self, edge: EntityEdge) {
        let key = edge.key();
        if self.edges.contains_key(&key) {
            debug!("edge {} -> {} already present, ignoring add", key.0, key.1);
            return;
        }
        self.edges.insert(key, edge.clone());
        self.emit(EventKind::EdgeAdded { edge });
    }

    /// Remove and return the edge for the given ordered pair
    pub fn remove_edge(&mut self, source: &EntityId, target: &EntityId) -> Option<EntityEdge> {
        let edge = self.edges.shift_remove(&(*source, *target))?;
        self.emit(EventKind::EdgeRemoved { edge: edge.clone() });
        Some(edge)
    }

    /// Upsert an edge: an absent key behaves like [`EntityGraph::add_edge`];
    /// a present key with differing metadata is replaced with an
    /// `EdgeModified` event; a present, identical edge is a no-op.
    pub fn update_edge(&mut self, edge: EntityEdge) {
        let key = edge.key();
        if let Some(existing) = self.edges.get_mut(&key) {
            if existing.differs_from(&edge) {
                let old_edge = std::mem::replace(existing, edge.clone());
                self.emit(EventKind::EdgeModified {
                    old_edge,
                    new_edge: edge,
                });
            }
        } else {
            self.add_edge(edge);
        }
    }

    // ---- component mutation (arena-addressed) ----

    /// Add a component to an entity. A duplicate name is a silent no-op
    /// that keeps the existing value. Returns `false` when the entity is
    /// not in this graph.
    pub fn add_component(
        &mut self,
        id: &EntityId,
        name: impl Into<String>,
        value: impl Into<ComponentValue>,
    ) -> bool {
        let name = name.into();
        let value = value.into();
        match self.nodes.get_mut(id) {
            Some(entity) => {
                if entity.has_component(&name) {
                    debug!("component {} already present on {}, ignoring add", name, id);
                    return true;
                }
                entity.components.insert(name.clone(), value.clone());
            }
            None => {
                debug!("component write addressed to unknown entity {}", id);
                return false;
            }
        }
        self.emit(EventKind::ComponentAdded {
            entity_id: *id,
            name,
            value,
        });
        true
    }

    /// Remove and return a component value. Absent entity or name returns
    /// `None` and emits nothing.
    pub fn remove_component(&mut self, id: &EntityId, name: &str) -> Option<ComponentValue> {
        let value = self.nodes.get_mut(id)?.components.remove(name)?;
        self.emit(EventKind::ComponentRemoved {
            entity_id: *id,
            name: name.to_string(),
            value: value.clone(),
        });
        Some(value)
    }

    /// Write a component: creates it (`ComponentAdded`) when absent, else
    /// replaces it and reports the modification. Returns `false` when the
    /// entity is not in this graph.
    pub fn update_component(
        &mut self,
        id: &EntityId,
        name: impl Into<String>,
        value: impl Into<ComponentValue>,
    ) -> bool {
        let name = name.into();
        let value = value.into();
        let previous = match self.nodes.get_mut(id) {
            Some(entity) => entity.components.insert(name.clone(), value.clone()),
            None => {
                debug!("component write addressed to unknown entity {}", id);
                return false;
            }
        };
        match previous {
            Some(old_value) => self.emit(EventKind::ComponentModified {
                entity_id: *id,
                name,
                old_value,
                new_value: value,
            }),
            None => self.emit(EventKind::ComponentAdded {
                entity_id: *id,
                name,
                value,
            }),
        }
        true
    }

    // ---- event replay ----

    /// Replay a recorded event onto this graph.
    ///
    /// Each kind maps onto the corresponding mutation primitive, so
    /// replaying re-emits events to this graph's own observers. The change
    /// tracker replays onto observer-free mirror graphs.
    pub fn apply(&mut self, event: &GraphEvent) {
        match &event.kind {
            EventKind::NodeAdded { entity } => self.add_node(entity.clone()),
            EventKind::NodeRemoved { entity } => {
                self.remove_node(&entity.id);
            }
            EventKind::NodeModified { new, .. } => {
                self.replace_node(new.clone());
            }
            EventKind::EdgeAdded { edge } => self.add_edge(edge.clone()),
            EventKind::EdgeRemoved { edge } => {
                self.remove_edge(&edge.source_id, &edge.target_id);
            }
            EventKind::EdgeModified { new_edge, .. } => self.update_edge(new_edge.clone()),
            EventKind::ComponentAdded { entity_id, name, value } => {
                self.add_component(entity_id, name.clone(), value.clone());
            }
            EventKind::ComponentRemoved { entity_id, name, .. } => {
                self.remove_component(entity_id, name);
            }
            EventKind::ComponentModified {
                entity_id,
                name,
                new_value,
                ..
            } => {
                self.update_component(entity_id, name.clone(), new_value.clone());
            }
        }
    }

    // ---- queries ----

    pub fn node(&self, id: &EntityId) -> Option<&Entity> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &EntityId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.nodes.keys()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.values()
    }

    pub fn edge(&self, source: &EntityId, target: &EntityId) -> Option<&EntityEdge> {
        self.edges.get(&(*source, *target))
    }

    pub fn contains_edge(&self, source: &EntityId, target: &EntityId) -> bool {
        self.edges.contains_key(&(*source, *target))
    }

    pub fn edge_keys(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EntityEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Ids of all entities carrying the named component
    pub fn entities_with_component(&self, name: &str) -> Vec<EntityId> {
        self.nodes
            .iter()
            .filter(|(_, entity)| entity.has_component(name))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Ids of entities the source is connected to by the given edge type
    pub fn related_entities(&self, source: &EntityId, edge_type: EdgeType) -> Vec<EntityId> {
        self.edges
            .iter()
            .filter(|((src, _), edge)| src == source && edge.edge_type == edge_type)
            .map(|((_, target), _)| *target)
            .collect()
    }
}

impl Clone for EntityGraph {
    /// Deep copy of graph content. Observer registrations are live wiring,
    /// not state, and are not carried into the copy.
    fn clone(&self) -> Self {
        EntityGraph {
            root_id: self.root_id,
            lineage_id: self.lineage_id,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityGraph")
            .field("root_id", &self.root_id)
            .field("lineage_id", &self.lineage_id)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
