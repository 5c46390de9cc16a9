//! In-memory entity snapshot.

use crate::index::{AttributeIndex, LinkIndex, TypeIndex};
use graft_core::{
    Attributes, Entity, EntityId, GraphError, GraphResult, Link, RelationId, TypeId, Value,
};
use graft_registry::{Registry, RelationDef};
use std::collections::HashMap;

/// The in-memory snapshot.
#[derive(Debug)]
pub struct Graph {
    /// Entity storage
    entities: HashMap<EntityId, Entity>,
    /// Next entity id
    next_entity_id: u64,
    /// Type index
    type_index: TypeIndex,
    /// Attribute index
    attr_index: AttributeIndex,
    /// Link index (both directions)
    link_index: LinkIndex,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_entity_id: 1,
            type_index: TypeIndex::new(),
            attr_index: AttributeIndex::new(),
            link_index: LinkIndex::new(),
        }
    }

    // ==================== Entity Operations ====================

    /// Create a new entity with the given type and attributes.
    pub fn create_entity(&mut self, type_id: TypeId, attributes: Attributes) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        let entity = Entity::new(id, type_id, attributes);

        self.type_index.insert(type_id, id);
        for (attr_name, value) in &entity.attributes {
            self.attr_index.insert(type_id, attr_name, value, id);
        }

        self.entities.insert(id, entity);
        id
    }

    /// Get an entity by ID.
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Attribute of an entity; a missing attribute reads as Null.
    pub fn attr(&self, id: EntityId, attr_name: &str) -> GraphResult<&Value> {
        const NULL: &Value = &Value::Null;
        let entity = self
            .entities
            .get(&id)
            .ok_or(GraphError::EntityNotFound(id))?;
        Ok(entity.get_attr(attr_name).unwrap_or(NULL))
    }

    /// Set an attribute on an entity.
    pub fn set_attr(&mut self, id: EntityId, attr_name: &str, value: Value) -> GraphResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(GraphError::EntityNotFound(id))?;
        let type_id = entity.type_id;

        if let Some(old_value) = entity.attributes.get(attr_name) {
            self.attr_index.remove(type_id, attr_name, old_value, id);
        }
        self.attr_index.insert(type_id, attr_name, &value, id);

        entity.set_attr(attr_name.to_string(), value);
        Ok(())
    }

    // ==================== Link Operations ====================

    /// Link `source` to `target` through `relation`, recording the inverse
    /// link when the relation has one.
    ///
    /// A single-valued side drops its previous link first.
    pub fn link(
        &mut self,
        registry: &Registry,
        relation: RelationId,
        source: EntityId,
        target: EntityId,
    ) -> GraphResult<Link> {
        let def = registry
            .get_relation(relation)
            .ok_or(GraphError::RelationNotFound(relation))?;
        self.check_type(source, def.source)?;
        self.check_type(target, def.target)?;

        let inverse = match def.inverse {
            Some(inverse_id) => Some(
                registry
                    .get_relation(inverse_id)
                    .ok_or(GraphError::RelationNotFound(inverse_id))?,
            ),
            None => None,
        };

        if !def.multiple {
            self.clear_side(def, inverse, source, target);
        }
        if let Some(inverse) = inverse {
            if !inverse.multiple {
                self.clear_side(inverse, Some(def), target, source);
            }
        }

        let link = Link::new(relation, source, target);
        self.link_index.insert(source, relation, target);
        if let Some(inverse) = inverse {
            self.link_index.insert(target, inverse.id, source);
        }

        tracing::trace!(%source, %target, relation = %def.name, "linked");
        Ok(link)
    }

    /// Remove the link between `source` and `target` (and its inverse).
    /// Returns false if they were not linked.
    pub fn unlink(
        &mut self,
        registry: &Registry,
        relation: RelationId,
        source: EntityId,
        target: EntityId,
    ) -> GraphResult<bool> {
        let def = registry
            .get_relation(relation)
            .ok_or(GraphError::RelationNotFound(relation))?;
        let removed = self.link_index.remove(source, relation, target);
        if let Some(inverse_id) = def.inverse {
            self.link_index.remove(target, inverse_id, source);
        }
        Ok(removed)
    }

    /// Entities linked from `entity` through `relation`, in creation order.
    pub fn linked(&self, entity: EntityId, relation: RelationId) -> impl Iterator<Item = EntityId> + '_ {
        self.link_index.get(entity, relation)
    }

    /// Whether `source` is linked to `target` through `relation`.
    pub fn is_linked(&self, source: EntityId, relation: RelationId, target: EntityId) -> bool {
        self.link_index.contains(source, relation, target)
    }

    /// Drop every existing link of `entity` through `def` except the one
    /// to `keep`.
    fn clear_side(
        &mut self,
        def: &RelationDef,
        inverse: Option<&RelationDef>,
        entity: EntityId,
        keep: EntityId,
    ) {
        let stale: Vec<EntityId> = self
            .link_index
            .get(entity, def.id)
            .filter(|other| *other != keep)
            .collect();
        for other in stale {
            self.link_index.remove(entity, def.id, other);
            if let Some(inverse) = inverse {
                self.link_index.remove(other, inverse.id, entity);
            }
        }
    }

    fn check_type(&self, id: EntityId, expected: TypeId) -> GraphResult<()> {
        let entity = self
            .entities
            .get(&id)
            .ok_or(GraphError::EntityNotFound(id))?;
        if entity.type_id != expected {
            return Err(GraphError::TypeMismatch {
                entity: id,
                expected,
                actual: entity.type_id,
            });
        }
        Ok(())
    }

    // ==================== Query Operations ====================

    /// Entities of a type, in creation order.
    pub fn entities_of_type(&self, type_id: TypeId) -> impl Iterator<Item = EntityId> + '_ {
        self.type_index.get(type_id)
    }

    /// Entities of a type whose attribute equals `value`, if the value kind
    /// is indexed. Results are in creation order.
    pub fn entities_by_attr(
        &self,
        type_id: TypeId,
        attr_name: &str,
        value: &Value,
    ) -> Option<impl Iterator<Item = EntityId> + '_> {
        self.attr_index.find_exact(type_id, attr_name, value)
    }

    // ==================== Statistics ====================

    /// Get the number of entities in the snapshot.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get the number of entities of one type.
    pub fn type_count(&self, type_id: TypeId) -> usize {
        self.type_index.count(type_id)
    }

    /// Get the number of directed links, inverses included.
    pub fn link_count(&self) -> usize {
        self.link_index.len()
    }
}
