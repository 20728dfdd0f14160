//! The prototype graph.
//!
//! Entities live in one table keyed by [`EntityId`]; each holds at most one
//! parent id. Lookups walk parent links from the requesting entity toward the
//! root and stop at the first entity that owns the name.
//!
//! `set_parent` refuses any link that would close a cycle, so every walk ends
//! at a root without tracking visited entities. `remove_entity` refuses to
//! drop an entity that is still somebody's parent, so every parent id stored
//! in the table resolves.

use crate::snapshot::{EntitySnapshot, GraphSnapshot};
use crate::{Entity, GraphError, GraphResult, Method, Properties, Receiver, Value};
use protochain_types::EntityId;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Table of entities and their delegation links.
#[derive(Debug, Default)]
pub struct PrototypeGraph {
    entities: HashMap<EntityId, Entity>,
}

/// Walks an entity and its ancestors, nearest first.
struct ChainWalk<'a> {
    entities: &'a HashMap<EntityId, Entity>,
    next: Option<EntityId>,
}

impl<'a> Iterator for ChainWalk<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.entities.get(&self.next?)?;
        self.next = entity.parent();
        Some(entity)
    }
}

impl PrototypeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Entities ─────────────────────────────────────────────────

    /// Adds a root entity holding `properties`.
    pub fn create_entity(&mut self, properties: Properties) -> EntityId {
        let id = EntityId::new();
        debug!(entity = %id.short(), props = properties.len(), "created entity");
        self.entities.insert(id, Entity::new(id, None, properties));
        id
    }

    /// Adds an entity that delegates to `parent` from the start.
    ///
    /// A fresh entity has no descendants, so this can never form a cycle.
    pub fn create_with_parent(
        &mut self,
        parent: EntityId,
        properties: Properties,
    ) -> GraphResult<EntityId> {
        self.require(parent)?;
        let id = EntityId::new();
        debug!(entity = %id.short(), parent = %parent.short(), "created entity");
        self.entities.insert(id, Entity::new(id, Some(parent), properties));
        Ok(id)
    }

    /// Removes an entity that nothing delegates to and returns it.
    ///
    /// Fails with [`GraphError::EntityInUse`] while any entity still has `id`
    /// as its parent; the graph is left untouched.
    pub fn remove_entity(&mut self, id: EntityId) -> GraphResult<Entity> {
        self.require(id)?;
        let dependents = self.children_of(id)?.len();
        if dependents > 0 {
            return Err(GraphError::EntityInUse { id, dependents });
        }
        debug!(entity = %id.short(), "removed entity");
        self.entities.remove(&id).ok_or(GraphError::UnknownEntity(id))
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entity ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn entity(&self, id: EntityId) -> GraphResult<&Entity> {
        self.entities.get(&id).ok_or(GraphError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> GraphResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(GraphError::UnknownEntity(id))
    }

    fn require(&self, id: EntityId) -> GraphResult<()> {
        self.entity(id).map(|_| ())
    }

    // ── Delegation links ─────────────────────────────────────────

    pub fn parent_of(&self, id: EntityId) -> GraphResult<Option<EntityId>> {
        Ok(self.entity(id)?.parent())
    }

    /// Relinks `child` to delegate to `parent`, or makes it a root with `None`.
    ///
    /// Fails with [`GraphError::Cycle`] when `parent` is `child` or already
    /// delegates to `child` through any number of links. All checks run
    /// before the link is written, so a failed call changes nothing.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> GraphResult<()> {
        self.require(child)?;
        if let Some(parent) = parent {
            self.require(parent)?;
            if self.walk(parent).any(|e| e.id() == child) {
                warn!(
                    child = %child.short(),
                    parent = %parent.short(),
                    "rejected cyclic delegation"
                );
                return Err(GraphError::Cycle { child, parent });
            }
        }

        let entity = self.entity_mut(child)?;
        let previous = entity.parent();
        entity.set_parent(parent);
        debug!(
            child = %child.short(),
            from = ?previous.map(|p| p.short()),
            to = ?parent.map(|p| p.short()),
            "relinked parent"
        );
        Ok(())
    }

    /// Entities whose parent is `id`, sorted.
    pub fn children_of(&self, id: EntityId) -> GraphResult<Vec<EntityId>> {
        self.require(id)?;
        let mut children: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.parent() == Some(id))
            .map(Entity::id)
            .collect();
        children.sort();
        Ok(children)
    }

    /// The delegation chain from `id` (inclusive) up to its root.
    ///
    /// Each call reads the current links; the last element has no parent.
    pub fn chain(&self, id: EntityId) -> GraphResult<Vec<EntityId>> {
        self.require(id)?;
        Ok(self.walk(id).map(Entity::id).collect())
    }

    fn walk(&self, start: EntityId) -> ChainWalk<'_> {
        ChainWalk {
            entities: &self.entities,
            next: Some(start),
        }
    }

    // ── Properties ───────────────────────────────────────────────

    /// Writes an own property on `id`, shadowing any inherited value.
    pub fn set_own_property(
        &mut self,
        id: EntityId,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> GraphResult<()> {
        let name = name.into();
        trace!(entity = %id.short(), %name, "set own property");
        self.entity_mut(id)?
            .properties_mut()
            .insert(name, value.into());
        Ok(())
    }

    /// Removes an own property. Inherited values of the same name become
    /// visible again. Returns whether the property was present.
    pub fn delete_own_property(&mut self, id: EntityId, name: &str) -> GraphResult<bool> {
        Ok(self.entity_mut(id)?.properties_mut().remove(name).is_some())
    }

    pub fn has_own_property(&self, id: EntityId, name: &str) -> GraphResult<bool> {
        Ok(self.entity(id)?.has_own(name))
    }

    /// Own property names of `id`, sorted.
    pub fn own_keys(&self, id: EntityId) -> GraphResult<Vec<String>> {
        Ok(self.entity(id)?.own_keys().map(str::to_string).collect())
    }

    /// Every name readable through `id`, each listed once.
    ///
    /// Names are ordered nearest entity first, sorted within each entity.
    pub fn keys(&self, id: EntityId) -> GraphResult<Vec<String>> {
        self.require(id)?;
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for entity in self.walk(id) {
            for key in entity.own_keys() {
                if seen.insert(key) {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    /// Resolves `name` from `id` and reports which entity owns it.
    pub fn lookup(&self, id: EntityId, name: &str) -> GraphResult<Option<(EntityId, &Value)>> {
        self.require(id)?;
        let found = self
            .walk(id)
            .find_map(|e| e.get_own(name).map(|v| (e.id(), v)));
        match &found {
            Some((owner, _)) => {
                trace!(entity = %id.short(), %name, owner = %owner.short(), "resolved")
            }
            None => trace!(entity = %id.short(), %name, "not found on chain"),
        }
        Ok(found)
    }

    /// Resolves `name` from `id`: own properties first, then each ancestor in
    /// turn. `Ok(None)` means no entity on the chain has it.
    pub fn get(&self, id: EntityId, name: &str) -> GraphResult<Option<&Value>> {
        Ok(self.lookup(id, name)?.map(|(_, value)| value))
    }

    // ── Invocation ───────────────────────────────────────────────

    /// Resolves `name` from `id` and calls it with `id` as the receiver.
    pub fn invoke(&mut self, id: EntityId, name: &str, args: &[Value]) -> GraphResult<Value> {
        self.invoke_with_receiver(id, name, id, args)
    }

    /// Resolves `name` starting at `holder` and calls it with `receiver`
    /// bound, whether or not `receiver` delegates to `holder`.
    ///
    /// The method observes and mutates the receiver's own properties, never
    /// those of the entity it was found on.
    pub fn invoke_with_receiver(
        &mut self,
        holder: EntityId,
        name: &str,
        receiver: EntityId,
        args: &[Value],
    ) -> GraphResult<Value> {
        self.require(receiver)?;
        let (owner, method) = self.resolve_method(holder, name)?;
        debug!(
            method = %name,
            receiver = %receiver.short(),
            owner = %owner.short(),
            args = args.len(),
            "invoking"
        );
        let mut this = Receiver::new(self, receiver, method.name());
        method.call(&mut this, args)
    }

    fn resolve_method(&self, holder: EntityId, name: &str) -> GraphResult<(EntityId, Method)> {
        let (owner, value) = self
            .lookup(holder, name)?
            .ok_or_else(|| GraphError::PropertyNotFound(name.to_string()))?;
        let method = value
            .as_method()
            .ok_or_else(|| GraphError::NotCallable(name.to_string()))?;
        Ok((owner, method.clone()))
    }

    // ── Snapshots ────────────────────────────────────────────────

    /// Serializable view of every entity, sorted by id.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            entities: self
                .ids()
                .into_iter()
                .filter_map(|id| self.entities.get(&id))
                .map(EntitySnapshot::from)
                .collect(),
        }
    }

    /// Serializable view of `id` and its ancestors, nearest first.
    pub fn snapshot_of(&self, id: EntityId) -> GraphResult<GraphSnapshot> {
        self.require(id)?;
        Ok(GraphSnapshot {
            entities: self.walk(id).map(EntitySnapshot::from).collect(),
        })
    }
}
