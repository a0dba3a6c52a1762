//! Identifier newtypes shared across the crate

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one version of an entity.
///
/// An `EntityId` names exactly one entity record within a graph. The root
/// entity's id doubles as the graph's root identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        EntityId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex characters, for compact report output
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        EntityId(id)
    }
}

/// Identifier stable across successive re-versionings of the same logical
/// entity. Two entity records with different [`EntityId`]s but the same
/// `LineageId` are versions of one thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct LineageId(Uuid);

impl LineageId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        LineageId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LineageId {
    fn from(id: Uuid) -> Self {
        LineageId(id)
    }
}

/// Unique identifier for a commit in the history graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct CommitId(Uuid);

impl CommitId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        CommitId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex characters, for compact log output
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CommitId {
    fn from(id: Uuid) -> Self {
        CommitId(id)
    }
}
