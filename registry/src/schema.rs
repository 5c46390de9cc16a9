//! Schema documents.
//!
//! The schema a server is bootstrapped with, as a JSON document:
//! entity types with their fields and relations, and predefined queries
//! grouped by the entity type they select.

use crate::{AttrDef, AttrType, ParamDef, Registry, RegistryBuilder, RegistryError};
use graft_core::{keywords, CompareOp, Value};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A whole schema document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(default)]
    pub entities: BTreeMap<String, EntitySchema>,
    /// Entity type name -> query name -> query.
    #[serde(default)]
    pub queries: BTreeMap<String, BTreeMap<String, QuerySchema>>,
}

/// One entity type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySchema {
    /// Field name -> scalar type name.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationSchema>,
}

/// One relation of an entity type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationSchema {
    /// Target entity type.
    #[serde(rename = "type")]
    pub target: String,
    #[serde(default = "yes")]
    pub multiple: bool,
    #[serde(default)]
    pub inverse: Option<String>,
}

/// One predefined query.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySchema {
    /// Flat `[field, op, param, ...]` triples.
    #[serde(rename = "-match")]
    pub conditions: Vec<serde_json::Value>,
    /// Parameters that need more than the required default.
    #[serde(default)]
    pub params: BTreeMap<String, ParamSchema>,
}

/// Explicit parameter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamSchema {
    #[serde(default = "yes")]
    pub required: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn yes() -> bool {
    true
}

impl SchemaDocument {
    /// Parse a JSON schema document.
    pub fn parse(source: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(source).map_err(|e| RegistryError::invalid_schema(e.to_string()))
    }

    /// Build a registry from this document.
    ///
    /// Types are declared first, then relations, then queries, so that
    /// declaration order inside the document does not matter.
    pub fn into_registry(self) -> Result<Registry, RegistryError> {
        let mut builder = RegistryBuilder::new();

        for (name, entity) in &self.entities {
            let mut type_builder = builder.add_type(name);
            for (field, type_name) in &entity.fields {
                let attr_type =
                    AttrType::parse(type_name).ok_or_else(|| RegistryError::UnknownAttrType {
                        attr: field.clone(),
                        type_name: type_name.clone(),
                    })?;
                type_builder = type_builder.attr(AttrDef::new(field, attr_type));
            }
            type_builder.done()?;
        }

        for (name, entity) in &self.entities {
            for (relation_name, relation) in &entity.relations {
                // The other side may already have declared this pair
                if already_declared_as_inverse(&self, name, relation_name) {
                    continue;
                }
                let mut relation_builder = builder
                    .add_relation(name, relation_name, &relation.target)
                    .multiple(relation.multiple);
                if let Some(inverse) = &relation.inverse {
                    relation_builder = relation_builder.inverse(inverse);
                    if let Some(inverse_schema) = self
                        .entities
                        .get(&relation.target)
                        .and_then(|e| e.relations.get(inverse))
                    {
                        if !inverse_schema.multiple {
                            relation_builder = relation_builder.inverse_one();
                        }
                    }
                }
                relation_builder.done()?;
            }
        }

        for (entity, queries) in &self.queries {
            for (query_name, query) in queries {
                add_query(&mut builder, entity, query_name, query)?;
            }
        }

        builder.build()
    }
}

/// True when `relation` on `entity` is the inverse named by a relation that
/// sorts earlier, which will create (or has created) it.
fn already_declared_as_inverse(doc: &SchemaDocument, entity: &str, relation: &str) -> bool {
    let Some(own) = doc.entities.get(entity).and_then(|e| e.relations.get(relation)) else {
        return false;
    };
    let Some(other) = doc.entities.get(&own.target) else {
        return false;
    };
    other.relations.iter().any(|(other_name, other_rel)| {
        other_rel.target == entity
            && other_rel.inverse.as_deref() == Some(relation)
            && (own.target.as_str(), other_name.as_str()) < (entity, relation)
    })
}

fn add_query(
    builder: &mut RegistryBuilder,
    entity: &str,
    name: &str,
    query: &QuerySchema,
) -> Result<(), RegistryError> {
    let conditions = &query.conditions;
    if conditions.is_empty() || conditions.len() % 3 != 0 {
        return Err(RegistryError::invalid_query(
            name,
            format!("{} expects [field, op, param] triples", keywords::MATCH),
        ));
    }

    let mut query_builder = builder.add_query(name, entity);
    for chunk in conditions.chunks(3) {
        let (Some(field), Some(op), Some(param)) =
            (chunk[0].as_str(), chunk[1].as_str(), chunk[2].as_str())
        else {
            return Err(RegistryError::invalid_query(
                name,
                "condition elements must be strings",
            ));
        };
        let op = CompareOp::parse(op).ok_or_else(|| {
            RegistryError::invalid_query(name, format!("unknown comparison operator {}", op))
        })?;
        query_builder = query_builder.condition(field, op, param);
    }

    for (param_name, param) in &query.params {
        let default = match &param.default {
            Some(json) => Some(Value::from_json(json).ok_or_else(|| {
                RegistryError::invalid_query(name, format!("default of {} must be a scalar", param_name))
            })?),
            None => None,
        };
        let def = if param.required && default.is_none() {
            ParamDef::required(param_name)
        } else {
            ParamDef::optional(param_name, default)
        };
        query_builder = query_builder.param(def);
    }

    query_builder.done()
}

impl Registry {
    /// Build a registry from a JSON schema document.
    pub fn from_schema_str(source: &str) -> Result<Registry, RegistryError> {
        SchemaDocument::parse(source)?.into_registry()
    }
}
