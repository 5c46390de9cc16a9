//! Typed entity documents.
//!
//! An [`EntityDocument`] is the normalized form of a request body: scalar
//! fields kept verbatim, relation fields with explicit operators, and an
//! optional match predicate. [`EntityDocument::to_json`] emits the
//! canonical wire form, `{relationOp: {entityKindOp: payload}}` for every
//! relation field.

use crate::{EntityKind, RelationOp};
use graft_core::{keywords, MatchPredicate};
use serde_json::{Map, Value as Json};

/// One named member of an entity document.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Scalar field (or list literal), verbatim.
    Field(Json),
    /// Relation field in explicit form.
    Relation(RelationField),
    /// Relation named in a `get` document: a projection of linked
    /// entities to include in the result, verbatim.
    Include(Json),
}

/// A nested entity document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDocument {
    predicate: Option<MatchPredicate>,
    members: Vec<(String, Member)>,
}

impl EntityDocument {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Builder ====================

    /// Set a scalar field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.insert(name.into(), Member::Field(value.into()));
        self
    }

    /// Set a relation field.
    pub fn relation(mut self, name: impl Into<String>, relation: RelationField) -> Self {
        self.insert(name.into(), Member::Relation(relation));
        self
    }

    /// Include a related entity set in a `get` result.
    pub fn include(mut self, name: impl Into<String>) -> Self {
        self.insert(name.into(), Member::Include(Json::Object(Map::new())));
        self
    }

    /// Set the match predicate.
    pub fn matching(mut self, predicate: MatchPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Insert or replace a member, keeping the position of an existing one.
    pub fn insert(&mut self, name: String, member: Member) {
        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = member,
            None => self.members.push((name, member)),
        }
    }

    pub(crate) fn set_predicate(&mut self, predicate: MatchPredicate) {
        self.predicate = Some(predicate);
    }

    // ==================== Accessors ====================

    pub fn predicate(&self) -> Option<&MatchPredicate> {
        self.predicate.as_ref()
    }

    /// Members in document order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, member)| member)
    }

    pub fn get_field(&self, name: &str) -> Option<&Json> {
        match self.get(name)? {
            Member::Field(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_relation(&self, name: &str) -> Option<&RelationField> {
        match self.get(name)? {
            Member::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    /// Relation fields in document order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &RelationField)> {
        self.members.iter().filter_map(|(name, member)| match member {
            Member::Relation(relation) => Some((name.as_str(), relation)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_none() && self.members.is_empty()
    }

    /// True if this document, or any document nested in its relation
    /// payloads, carries a match predicate.
    pub fn reaches_predicate(&self) -> bool {
        self.predicate.is_some()
            || self
                .relations()
                .any(|(_, relation)| relation.payload.documents().any(Self::reaches_predicate))
    }

    /// Canonical JSON. The match predicate, if any, comes first.
    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        if let Some(predicate) = &self.predicate {
            map.insert(keywords::MATCH.to_string(), predicate.to_json());
        }
        for (name, member) in &self.members {
            let value = match member {
                Member::Field(value) | Member::Include(value) => value.clone(),
                Member::Relation(relation) => relation.to_json(),
            };
            map.insert(name.clone(), value);
        }
        Json::Object(map)
    }
}

/// A relation field: what to do with which entities.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationField {
    pub op: RelationOp,
    pub kind: EntityKind,
    pub payload: Payload,
}

impl RelationField {
    pub fn new(op: RelationOp, kind: EntityKind, payload: impl Into<Payload>) -> Self {
        Self {
            op,
            kind,
            payload: payload.into(),
        }
    }

    /// `-link`, with an empty `-create` payload until one is set.
    pub fn link() -> Self {
        Self::new(RelationOp::Link, EntityKind::Create, Payload::Many(Vec::new()))
    }

    pub fn unlink() -> Self {
        Self::new(RelationOp::Unlink, EntityKind::Create, Payload::Many(Vec::new()))
    }

    pub fn replace() -> Self {
        Self::new(RelationOp::Replace, EntityKind::Create, Payload::Many(Vec::new()))
    }

    /// New entities.
    pub fn create(mut self, payload: impl Into<Payload>) -> Self {
        self.kind = EntityKind::Create;
        self.payload = payload.into();
        self
    }

    /// Existing entities; each document needs a reachable match predicate.
    pub fn update(mut self, payload: impl Into<Payload>) -> Self {
        self.kind = EntityKind::Update;
        self.payload = payload.into();
        self
    }

    pub fn to_json(&self) -> Json {
        let mut inner = Map::new();
        inner.insert(self.kind.key().to_string(), self.payload.to_json());
        let mut outer = Map::new();
        outer.insert(self.op.key().to_string(), Json::Object(inner));
        Json::Object(outer)
    }
}

/// Relation payload, keeping the caller's arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(EntityDocument),
    Many(Vec<EntityDocument>),
}

impl Payload {
    pub fn documents(&self) -> impl Iterator<Item = &EntityDocument> {
        let docs: &[EntityDocument] = match self {
            Payload::One(doc) => std::slice::from_ref(doc),
            Payload::Many(docs) => docs,
        };
        docs.iter()
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::One(_) => 1,
            Payload::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> Json {
        match self {
            Payload::One(doc) => doc.to_json(),
            Payload::Many(docs) => Json::Array(docs.iter().map(EntityDocument::to_json).collect()),
        }
    }
}

impl From<EntityDocument> for Payload {
    fn from(doc: EntityDocument) -> Self {
        Payload::One(doc)
    }
}

impl From<Vec<EntityDocument>> for Payload {
    fn from(docs: Vec<EntityDocument>) -> Self {
        Payload::Many(docs)
    }
}
