use crate::{Properties, Value};
use protochain_types::EntityId;

/// A node in a prototype graph.
///
/// The entity owns its property mapping. Its parent is held only as an id;
/// the graph validates every relink, so the link can never be edited here.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    parent: Option<EntityId>,
    properties: Properties,
}

impl Entity {
    pub(crate) fn new(id: EntityId, parent: Option<EntityId>, properties: Properties) -> Self {
        Self {
            id,
            parent,
            properties,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity this one delegates to, if any.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Own properties only; nothing inherited.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    #[must_use]
    pub fn get_own(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn has_own(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Own property names in sorted order.
    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}
