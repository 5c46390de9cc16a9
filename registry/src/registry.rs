//! The Registry - immutable schema lookup.

use crate::{AttrDef, EntityTypeDef, QueryDef, RelationDef};
use graft_core::{FieldPath, RelationId, TypeId};
use std::collections::HashMap;

/// The Registry provides runtime lookup of schema definitions.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct Registry {
    /// Entity type definitions by ID.
    types: HashMap<TypeId, EntityTypeDef>,
    /// Entity type ID lookup by name.
    type_names: HashMap<String, TypeId>,

    /// Relation definitions by ID.
    relations: HashMap<RelationId, RelationDef>,

    /// Predefined queries by name.
    queries: HashMap<String, QueryDef>,
}

/// Outcome of walking a field path from an entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum PathWalk<'a> {
    /// Every hop resolved and the terminal attribute exists.
    Resolved {
        relations: Vec<RelationId>,
        owner: TypeId,
        attr: &'a AttrDef,
    },
    /// Hop at `index` is not a relation of `on_type`.
    UnknownRelation { index: usize, on_type: TypeId },
    /// Hops resolved but the terminal attribute does not exist on `owner`.
    UnknownAttribute { owner: TypeId },
}

impl Registry {
    /// Assemble a registry (use RegistryBuilder for construction).
    pub(crate) fn new(
        types: HashMap<TypeId, EntityTypeDef>,
        type_names: HashMap<String, TypeId>,
        relations: HashMap<RelationId, RelationDef>,
        queries: HashMap<String, QueryDef>,
    ) -> Self {
        Self {
            types,
            type_names,
            relations,
            queries,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&EntityTypeDef> {
        self.type_names.get(name).and_then(|id| self.types.get(id))
    }

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&EntityTypeDef> {
        self.types.get(&id)
    }

    /// Get a type ID by name.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Name of a type, or "unknown".
    pub fn type_name(&self, id: TypeId) -> &str {
        self.types
            .get(&id)
            .map(|t| t.name.as_str())
            .unwrap_or("unknown")
    }

    /// Get all type definitions, in ID order.
    pub fn all_types(&self) -> Vec<&EntityTypeDef> {
        let mut types: Vec<_> = self.types.values().collect();
        types.sort_by_key(|t| t.id);
        types
    }

    /// Get the number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Get an attribute definition from a type.
    pub fn get_attr(&self, type_id: TypeId, attr_name: &str) -> Option<&AttrDef> {
        self.types.get(&type_id).and_then(|t| t.get_attr(attr_name))
    }

    // ==================== Relation Lookups ====================

    /// Get a relation definition by ID.
    pub fn get_relation(&self, id: RelationId) -> Option<&RelationDef> {
        self.relations.get(&id)
    }

    /// Get a relation of a type by name.
    pub fn get_relation_by_name(&self, type_id: TypeId, name: &str) -> Option<&RelationDef> {
        self.types
            .get(&type_id)
            .and_then(|t| t.relations.get(name))
            .and_then(|id| self.relations.get(id))
    }

    /// Get all relations owned by a type, in ID order.
    pub fn relations_of(&self, type_id: TypeId) -> Vec<&RelationDef> {
        let mut relations: Vec<_> = self
            .types
            .get(&type_id)
            .into_iter()
            .flat_map(|t| t.relations.values())
            .filter_map(|id| self.relations.get(id))
            .collect();
        relations.sort_by_key(|r| r.id);
        relations
    }

    /// Get the number of relations (inverses count separately).
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Walk a field path starting at `type_id`.
    pub fn walk_path(&self, type_id: TypeId, path: &FieldPath) -> PathWalk<'_> {
        let mut current = type_id;
        let mut relations = Vec::with_capacity(path.hops().len());

        for (index, hop) in path.hops().iter().enumerate() {
            match self.get_relation_by_name(current, hop) {
                Some(relation) => {
                    relations.push(relation.id);
                    current = relation.target;
                }
                None => {
                    return PathWalk::UnknownRelation {
                        index,
                        on_type: current,
                    }
                }
            }
        }

        match self.get_attr(current, path.terminal()) {
            Some(attr) => PathWalk::Resolved {
                relations,
                owner: current,
                attr,
            },
            None => PathWalk::UnknownAttribute { owner: current },
        }
    }

    // ==================== Query Lookups ====================

    /// Get a predefined query by name.
    pub fn get_query(&self, name: &str) -> Option<&QueryDef> {
        self.queries.get(name)
    }

    /// Get all predefined queries, sorted by name.
    pub fn all_queries(&self) -> Vec<&QueryDef> {
        let mut queries: Vec<_> = self.queries.values().collect();
        queries.sort_by(|a, b| a.name.cmp(&b.name));
        queries
    }

    /// Get the number of predefined queries.
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }
}
