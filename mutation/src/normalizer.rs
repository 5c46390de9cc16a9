//! The relation-mutation normalizer.
//!
//! Reads a raw request document and makes every operator explicit:
//! a relation field without `-link`/`-unlink`/`-replace` gets `-replace`,
//! a payload without `-create`/`-update` gets `-create`. Normalizing a
//! canonical document returns it unchanged.

use crate::document::{EntityDocument, Member, Payload, RelationField};
use crate::error::{NormalizeError, NormalizeResult};
use crate::path::DocPath;
use crate::{EntityKind, RelationOp};
use graft_core::{json_kind, keywords, MatchPredicate, TypeId, Value};
use graft_registry::{PathWalk, Registry};
use serde_json::{Map, Value as Json};
use std::fmt;

/// The operation a document is submitted for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Get,
    Update,
    /// A predefined query, by name.
    Query(String),
}

impl Action {
    /// `create`, `get` and `update` are verbs; anything else names a query.
    pub fn parse(s: &str) -> Self {
        match s {
            "create" => Action::Create,
            "get" => Action::Get,
            "update" => Action::Update,
            name => Action::Query(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Create => "create",
            Action::Get => "get",
            Action::Update => "update",
            Action::Query(name) => name,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct Schema<'r> {
    registry: &'r Registry,
    root: TypeId,
}

/// How a member name is to be read.
enum Slot {
    Field,
    /// Relation to the given type (unknown without a schema).
    Relation(Option<TypeId>),
}

/// Normalizes request documents, optionally checking them against a schema.
#[derive(Debug, Clone, Default)]
pub struct Normalizer<'r> {
    schema: Option<Schema<'r>>,
}

impl Normalizer<'static> {
    /// A schema-less normalizer: relation fields are recognised by shape.
    pub fn new() -> Self {
        Self { schema: None }
    }
}

impl<'r> Normalizer<'r> {
    /// A normalizer for documents about `entity_type`.
    pub fn with_schema(registry: &'r Registry, entity_type: &str) -> NormalizeResult<Self> {
        let root = registry
            .get_type_id(entity_type)
            .ok_or_else(|| NormalizeError::unknown_entity_type(entity_type))?;
        Ok(Self {
            schema: Some(Schema { registry, root }),
        })
    }

    /// Normalize a nested entity document without action-level checks.
    pub fn normalize(&self, doc: &Json) -> NormalizeResult<Json> {
        Ok(self.parse(doc)?.to_json())
    }

    /// Normalize a request body for `action`.
    pub fn normalize_for(&self, action: &Action, doc: &Json) -> NormalizeResult<Json> {
        Ok(self.parse_for(action, doc)?.to_json())
    }

    /// Read a nested entity document without action-level checks.
    pub fn parse(&self, doc: &Json) -> NormalizeResult<EntityDocument> {
        let root = self.schema.map(|s| s.root);
        self.parse_entity(doc, root, &DocPath::root(), false)
    }

    /// Read a request body for `action`.
    ///
    /// `create` bodies must not carry a top-level `-match`; `get`, `update`
    /// and query bodies must, and query bodies must use the named form.
    /// Relation fields of `get` bodies are projections and stay verbatim.
    pub fn parse_for(&self, action: &Action, doc: &Json) -> NormalizeResult<EntityDocument> {
        let root = self.schema.map(|s| s.root);
        let path = DocPath::root();
        let projection = *action == Action::Get;
        let parsed = self.parse_entity(doc, root, &path, projection)?;

        match (action, parsed.predicate()) {
            (Action::Create, Some(_)) => {
                return Err(NormalizeError::unexpected_match_predicate(
                    path.field(keywords::MATCH),
                ))
            }
            (Action::Create, None) => {}
            (_, None) => return Err(NormalizeError::missing_match_predicate(&path)),
            (Action::Query(_), Some(predicate)) if !predicate.is_named() => {
                return Err(NormalizeError::predicate_form_mismatch(
                    path.field(keywords::MATCH),
                    "named parameter",
                ))
            }
            (_, Some(_)) => {}
        }

        tracing::debug!(action = %action, members = parsed.members().count(), "document normalized");
        Ok(parsed)
    }

    fn parse_entity(
        &self,
        json: &Json,
        entity_type: Option<TypeId>,
        path: &DocPath,
        projection: bool,
    ) -> NormalizeResult<EntityDocument> {
        let Json::Object(map) = json else {
            return Err(NormalizeError::invalid_payload(path, json_kind(json)));
        };

        let mut doc = EntityDocument::new();
        for (key, value) in map {
            if key == keywords::MATCH {
                let predicate_path = path.field(key);
                let predicate = MatchPredicate::from_json(value)
                    .map_err(|e| NormalizeError::invalid_match_predicate(&predicate_path, e))?;
                if let Some(type_id) = entity_type {
                    self.check_predicate(type_id, &predicate, &predicate_path)?;
                }
                doc.set_predicate(predicate);
                continue;
            }
            if keywords::is_operator_key(key) {
                return Err(misplaced_operator(path, key));
            }

            let member_path = path.field(key);
            let member = match self.slot(entity_type, key, value, &member_path)? {
                Slot::Field => Member::Field(value.clone()),
                Slot::Relation(_) if projection => {
                    if !(value.is_object() || value.is_array()) {
                        return Err(NormalizeError::invalid_payload(&member_path, json_kind(value)));
                    }
                    Member::Include(value.clone())
                }
                Slot::Relation(target) => {
                    Member::Relation(self.parse_relation(value, target, &member_path)?)
                }
            };
            doc.insert(key.clone(), member);
        }
        Ok(doc)
    }

    /// Decide whether `key` is a scalar field or a relation.
    fn slot(
        &self,
        entity_type: Option<TypeId>,
        key: &str,
        value: &Json,
        path: &DocPath,
    ) -> NormalizeResult<Slot> {
        let (Some(schema), Some(type_id)) = (self.schema, entity_type) else {
            return Ok(if is_relation_shaped(value) {
                Slot::Relation(None)
            } else {
                Slot::Field
            });
        };

        let registry = schema.registry;
        if let Some(relation) = registry.get_relation_by_name(type_id, key) {
            return Ok(Slot::Relation(Some(relation.target)));
        }
        let Some(attr) = registry.get_attr(type_id, key) else {
            return Err(NormalizeError::unknown_field(
                path,
                registry.type_name(type_id),
                key,
            ));
        };
        match Value::from_json(value) {
            Some(scalar) if attr.attr_type.accepts(&scalar) => Ok(Slot::Field),
            Some(scalar) => Err(NormalizeError::invalid_field_value(
                path,
                key,
                attr.attr_type.as_str(),
                scalar.type_name(),
            )),
            None => Err(NormalizeError::invalid_field_value(
                path,
                key,
                attr.attr_type.as_str(),
                json_kind(value),
            )),
        }
    }

    fn parse_relation(
        &self,
        value: &Json,
        target: Option<TypeId>,
        path: &DocPath,
    ) -> NormalizeResult<RelationField> {
        let (op, inner) = match value {
            Json::Object(map) => match single_operator(map, path)? {
                Some((key, inner)) => match RelationOp::from_key(key) {
                    Some(op) => (op, inner),
                    // Entity-kind wrapper with the relation operator omitted
                    None if keywords::is_entity_kind_operator(key) => (RelationOp::default(), value),
                    None => return Err(NormalizeError::invalid_relation_operator(path, key)),
                },
                None => (RelationOp::default(), value),
            },
            Json::Array(_) => (RelationOp::default(), value),
            other => return Err(NormalizeError::invalid_payload(path, json_kind(other))),
        };

        let (kind, payload) = match inner {
            Json::Object(map) => match single_operator(map, path)? {
                Some((key, payload)) => match EntityKind::from_key(key) {
                    Some(kind) => (kind, payload),
                    None => return Err(NormalizeError::invalid_entity_kind_operator(path, key)),
                },
                None => (EntityKind::default(), inner),
            },
            Json::Array(_) => (EntityKind::default(), inner),
            other => return Err(NormalizeError::invalid_payload(path, json_kind(other))),
        };

        let payload = self.parse_payload(payload, kind, target, path)?;
        if kind == EntityKind::Update {
            check_reachable(&payload, path)?;
        }
        Ok(RelationField { op, kind, payload })
    }

    fn parse_payload(
        &self,
        json: &Json,
        kind: EntityKind,
        target: Option<TypeId>,
        path: &DocPath,
    ) -> NormalizeResult<Payload> {
        match json {
            Json::Object(_) => Ok(Payload::One(self.parse_nested(json, kind, target, path)?)),
            Json::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.parse_nested(item, kind, target, &path.index(index)))
                .collect::<NormalizeResult<Vec<_>>>()
                .map(Payload::Many),
            other => Err(NormalizeError::invalid_payload(path, json_kind(other))),
        }
    }

    fn parse_nested(
        &self,
        json: &Json,
        kind: EntityKind,
        target: Option<TypeId>,
        path: &DocPath,
    ) -> NormalizeResult<EntityDocument> {
        let doc = self.parse_entity(json, target, path, false)?;
        if kind == EntityKind::Create && doc.predicate().is_some() {
            return Err(NormalizeError::unexpected_match_predicate(
                path.field(keywords::MATCH),
            ));
        }
        Ok(doc)
    }

    /// Every condition path must resolve from `type_id`.
    fn check_predicate(
        &self,
        type_id: TypeId,
        predicate: &MatchPredicate,
        path: &DocPath,
    ) -> NormalizeResult<()> {
        let Some(schema) = self.schema else {
            return Ok(());
        };
        for condition in predicate.conditions() {
            let walk = schema.registry.walk_path(type_id, &condition.path);
            if !matches!(walk, PathWalk::Resolved { .. }) {
                return Err(NormalizeError::unknown_field(
                    path,
                    schema.registry.type_name(type_id),
                    condition.path.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Without a schema, a relation is an object or an array holding at least
/// one object. The empty array counts: it is the empty entity set.
fn is_relation_shaped(value: &Json) -> bool {
    match value {
        Json::Object(_) => true,
        Json::Array(items) => items.is_empty() || items.iter().any(Json::is_object),
        _ => false,
    }
}

/// The operator key of an operator-wrapped mapping, if it is one.
///
/// `-match` belongs to the entity document and is not counted. An operator
/// key must be the only key of its mapping.
fn single_operator<'a>(
    map: &'a Map<String, Json>,
    path: &DocPath,
) -> NormalizeResult<Option<(&'a String, &'a Json)>> {
    let mut operators = map
        .iter()
        .filter(|(key, _)| keywords::is_operator_key(key) && *key != keywords::MATCH);
    let Some(first) = operators.next() else {
        return Ok(None);
    };
    if map.len() > 1 {
        return Err(NormalizeError::ambiguous_operator_key(path, map.keys()));
    }
    Ok(Some(first))
}

/// Error for an operator key found among an entity's fields.
fn misplaced_operator(path: &DocPath, key: &str) -> NormalizeError {
    if keywords::is_relation_operator(key) {
        NormalizeError::invalid_relation_operator(path, key)
    } else if keywords::is_entity_kind_operator(key) {
        NormalizeError::invalid_entity_kind_operator(path, key)
    } else {
        NormalizeError::unknown_operator(path, key)
    }
}

/// An `-update` payload must select its targets: each document needs a
/// predicate of its own or one nested in its relations.
fn check_reachable(payload: &Payload, path: &DocPath) -> NormalizeResult<()> {
    match payload {
        Payload::One(doc) if doc.reaches_predicate() => Ok(()),
        Payload::One(_) => Err(NormalizeError::missing_match_predicate(path)),
        Payload::Many(docs) if docs.is_empty() => Err(NormalizeError::missing_match_predicate(path)),
        Payload::Many(docs) => match docs.iter().position(|doc| !doc.reaches_predicate()) {
            Some(index) => Err(NormalizeError::missing_match_predicate(path.index(index))),
            None => Ok(()),
        },
    }
}
