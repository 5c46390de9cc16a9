//! RegistryBuilder for constructing an immutable Registry.

use crate::{
    AttrDef, EntityTypeDef, ParamDef, PathWalk, QueryCondition, QueryDef, Registry, RelationDef,
};
use graft_core::{CompareOp, FieldPath, RelationId, TypeId};
use regex_lite::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate attribute {attr} on type {type_name}")]
    DuplicateAttribute { type_name: String, attr: String },

    #[error("Duplicate relation {relation} on type {type_name}")]
    DuplicateRelation { type_name: String, relation: String },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unknown attribute type '{type_name}' for attribute {attr}")]
    UnknownAttrType { attr: String, type_name: String },

    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("Relation {relation} on type {type_name} cannot serve as an inverse")]
    InverseConflict { type_name: String, relation: String },

    #[error("Duplicate query name: {0}")]
    DuplicateQueryName(String),

    #[error("Query {query}: unknown field path '{path}'")]
    UnknownQueryField { query: String, path: String },

    #[error("Query {query}: {message}")]
    InvalidQuery { query: String, message: String },

    #[error("Invalid schema document: {0}")]
    InvalidSchema(String),
}

impl RegistryError {
    pub fn invalid_query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query: query.into(),
            message: message.into(),
        }
    }

    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema(message.into())
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

/// Check that a schema name is a plain identifier.
fn check_identifier(name: &str) -> Result<(), RegistryError> {
    if identifier_pattern().is_match(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidIdentifier(name.to_string()))
    }
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Next relation ID to allocate.
    next_relation_id: u32,

    /// Types being built.
    types: HashMap<TypeId, EntityTypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,

    /// Relations being built.
    relations: HashMap<RelationId, RelationDef>,

    /// Queries being built; field paths are checked in `build`.
    queries: HashMap<String, QueryDef>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        let name = name.into();
        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;

        TypeBuilder {
            builder: self,
            id,
            name,
            attributes: Vec::new(),
        }
    }

    /// Add a relation from `source` to `target`, named `name` on the source.
    pub fn add_relation(
        &mut self,
        source: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> RelationBuilder<'_> {
        RelationBuilder {
            builder: self,
            source: source.into(),
            name: name.into(),
            target: target.into(),
            multiple: true,
            inverse: None,
            inverse_multiple: true,
        }
    }

    /// Add a predefined query selecting entities of `entity_type`.
    pub fn add_query(
        &mut self,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> QueryBuilder<'_> {
        QueryBuilder {
            builder: self,
            name: name.into(),
            entity_type: entity_type.into(),
            conditions: Vec::new(),
            params: Vec::new(),
        }
    }

    fn alloc_relation_id(&mut self) -> RelationId {
        let id = RelationId::new(self.next_relation_id);
        self.next_relation_id += 1;
        id
    }

    fn type_name(&self, id: TypeId) -> String {
        self.types
            .get(&id)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let registry = Registry::new(self.types, self.type_names, self.relations, self.queries);

        // Query paths can only be checked once every relation is known
        for query in registry.all_queries() {
            for condition in &query.conditions {
                if !matches!(
                    registry.walk_path(query.entity_type, &condition.path),
                    PathWalk::Resolved { .. }
                ) {
                    return Err(RegistryError::UnknownQueryField {
                        query: query.name.clone(),
                        path: condition.path.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            types = registry.type_count(),
            relations = registry.relation_count(),
            queries = registry.query_count(),
            "registry built"
        );
        Ok(registry)
    }
}

/// Builder for an entity type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    id: TypeId,
    name: String,
    attributes: Vec<AttrDef>,
}

impl<'a> TypeBuilder<'a> {
    /// Add an attribute.
    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<TypeId, RegistryError> {
        check_identifier(&self.name)?;

        // Check for duplicate name
        if self.builder.type_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateTypeName(self.name));
        }

        let mut type_def = EntityTypeDef::new(self.id, self.name.clone());
        for attr in self.attributes {
            check_identifier(&attr.name)?;
            if type_def.has_attr(&attr.name) {
                return Err(RegistryError::DuplicateAttribute {
                    type_name: self.name,
                    attr: attr.name,
                });
            }
            type_def.attributes.insert(attr.name.clone(), attr);
        }

        self.builder.type_names.insert(self.name, self.id);
        self.builder.types.insert(self.id, type_def);

        Ok(self.id)
    }
}

/// Builder for a relation (and, optionally, its inverse).
pub struct RelationBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    source: String,
    name: String,
    target: String,
    multiple: bool,
    inverse: Option<String>,
    inverse_multiple: bool,
}

impl<'a> RelationBuilder<'a> {
    /// Make the relation one-to-one.
    pub fn one(mut self) -> Self {
        self.multiple = false;
        self
    }

    /// Set whether the relation is one-to-many.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Name the inverse relation on the target type.
    pub fn inverse(mut self, name: impl Into<String>) -> Self {
        self.inverse = Some(name.into());
        self
    }

    /// Make the inverse relation one-to-one.
    pub fn inverse_one(mut self) -> Self {
        self.inverse_multiple = false;
        self
    }

    /// Finish building this relation.
    pub fn done(self) -> Result<RelationId, RegistryError> {
        check_identifier(&self.name)?;
        let source = self
            .builder
            .type_names
            .get(&self.source)
            .copied()
            .ok_or_else(|| RegistryError::UnknownType(self.source.clone()))?;
        let target = self
            .builder
            .type_names
            .get(&self.target)
            .copied()
            .ok_or_else(|| RegistryError::UnknownType(self.target.clone()))?;

        let source_def = &self.builder.types[&source];
        if source_def.has_relation(&self.name) || source_def.has_attr(&self.name) {
            return Err(RegistryError::DuplicateRelation {
                type_name: self.source,
                relation: self.name,
            });
        }

        let id = self.builder.alloc_relation_id();
        let mut relation = RelationDef {
            id,
            name: self.name.clone(),
            source,
            target,
            multiple: self.multiple,
            inverse: None,
        };

        if let Some(inverse_name) = self.inverse {
            check_identifier(&inverse_name)?;
            let target_def = &self.builder.types[&target];

            let existing = target_def.relations.get(&inverse_name).copied();
            let inverse_id = match existing {
                Some(existing_id) => {
                    // Pair with a relation declared earlier from the other side
                    let other = &self.builder.relations[&existing_id];
                    if other.target != source || other.inverse.is_some() {
                        return Err(RegistryError::InverseConflict {
                            type_name: self.builder.type_name(target),
                            relation: inverse_name,
                        });
                    }
                    existing_id
                }
                None if target_def.has_attr(&inverse_name) => {
                    return Err(RegistryError::DuplicateRelation {
                        type_name: self.target,
                        relation: inverse_name,
                    });
                }
                None if source == target && inverse_name == self.name => {
                    // Symmetric self-relation
                    id
                }
                None => {
                    let inverse_id = self.builder.alloc_relation_id();
                    self.builder.relations.insert(
                        inverse_id,
                        RelationDef {
                            id: inverse_id,
                            name: inverse_name.clone(),
                            source: target,
                            target: source,
                            multiple: self.inverse_multiple,
                            inverse: None,
                        },
                    );
                    if let Some(target_def) = self.builder.types.get_mut(&target) {
                        target_def.relations.insert(inverse_name, inverse_id);
                    }
                    inverse_id
                }
            };

            relation.inverse = Some(inverse_id);
            if let Some(other) = self.builder.relations.get_mut(&inverse_id) {
                other.inverse = Some(id);
            }
        }

        if let Some(source_def) = self.builder.types.get_mut(&source) {
            source_def.relations.insert(self.name, id);
        }
        self.builder.relations.insert(id, relation);

        Ok(id)
    }
}

/// Builder for a predefined query.
pub struct QueryBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    name: String,
    entity_type: String,
    conditions: Vec<(String, CompareOp, String)>,
    params: Vec<ParamDef>,
}

impl<'a> QueryBuilder<'a> {
    /// Add a condition whose operand is supplied by parameter `param`.
    pub fn condition(
        mut self,
        path: impl Into<String>,
        op: CompareOp,
        param: impl Into<String>,
    ) -> Self {
        self.conditions.push((path.into(), op, param.into()));
        self
    }

    /// Declare a parameter explicitly (to make it optional or give a default).
    /// Parameters used by conditions are otherwise declared as required.
    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    /// Finish building this query.
    pub fn done(self) -> Result<(), RegistryError> {
        check_identifier(&self.name)?;
        if self.builder.queries.contains_key(&self.name) {
            return Err(RegistryError::DuplicateQueryName(self.name));
        }
        let entity_type = self
            .builder
            .type_names
            .get(&self.entity_type)
            .copied()
            .ok_or_else(|| RegistryError::UnknownType(self.entity_type.clone()))?;
        if self.conditions.is_empty() {
            return Err(RegistryError::invalid_query(&self.name, "no conditions"));
        }

        let mut params = self.params;
        for param in &params {
            check_identifier(&param.name)?;
            if !self.conditions.iter().any(|(_, _, p)| *p == param.name) {
                return Err(RegistryError::invalid_query(
                    &self.name,
                    format!("parameter {} is not used by any condition", param.name),
                ));
            }
        }

        let mut conditions = Vec::with_capacity(self.conditions.len());
        for (path, op, param) in self.conditions {
            check_identifier(&param)?;
            let path = FieldPath::parse(&path)
                .map_err(|e| RegistryError::invalid_query(&self.name, e.to_string()))?;
            if !params.iter().any(|p| p.name == param) {
                params.push(ParamDef::required(param.clone()));
            }
            conditions.push(QueryCondition { path, op, param });
        }

        let query = QueryDef {
            name: self.name.clone(),
            entity_type,
            params,
            conditions,
        };
        self.builder.queries.insert(self.name, query);
        Ok(())
    }
}
