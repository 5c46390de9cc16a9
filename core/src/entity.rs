//! Entity structures for Graft.
//!
//! Entities are the records of a snapshot; links connect two entities
//! through a declared relation.

use crate::{Attributes, EntityId, RelationId, TypeId, Value};

/// An entity instance.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// Type of this entity (reference to registry).
    pub type_id: TypeId,
    /// Version number, bumped on every attribute change.
    pub version: u64,
    /// Attribute values.
    pub attributes: Attributes,
}

impl Entity {
    /// Create a new entity with the given properties.
    pub fn new(id: EntityId, type_id: TypeId, attributes: Attributes) -> Self {
        Self {
            id,
            type_id,
            version: 1,
            attributes,
        }
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute value.
    pub fn set_attr(&mut self, name: String, value: Value) {
        self.attributes.insert(name, value);
        self.version += 1;
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        let result = self.attributes.remove(name);
        if result.is_some() {
            self.version += 1;
        }
        result
    }
}

/// A directed link from one entity to another through a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    /// Relation this link belongs to.
    pub relation: RelationId,
    /// Owning side.
    pub source: EntityId,
    /// Linked entity.
    pub target: EntityId,
}

impl Link {
    pub fn new(relation: RelationId, source: EntityId, target: EntityId) -> Self {
        Self {
            relation,
            source,
            target,
        }
    }

    /// The same link seen from the other side, through `inverse`.
    pub fn reversed(&self, inverse: RelationId) -> Self {
        Self {
            relation: inverse,
            source: self.target,
            target: self.source,
        }
    }
}
