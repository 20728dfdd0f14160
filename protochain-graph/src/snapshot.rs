//! Serializable views of a graph.

use crate::{Entity, GraphResult};
use protochain_types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entity with its own properties rendered as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            parent: entity.parent(),
            properties: entity
                .properties()
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        }
    }
}

/// A point-in-time copy of some or all entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub entities: Vec<EntitySnapshot>,
}

impl GraphSnapshot {
    pub fn find(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Entities without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities.iter().filter(|e| e.parent.is_none())
    }

    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
