//! Indexes for snapshot lookups.
//!
//! Entity ids are allocated in increasing order, so every `BTreeSet<EntityId>`
//! below iterates in creation order.

use graft_core::{EntityId, RelationId, TypeId, Value};
use std::collections::{BTreeSet, HashMap};

/// Type index: TypeId -> Set<EntityId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<TypeId, BTreeSet<EntityId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, entity_id: EntityId) {
        self.index.entry(type_id).or_default().insert(entity_id);
    }

    pub fn get(&self, type_id: TypeId) -> impl Iterator<Item = EntityId> + '_ {
        self.index
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn count(&self, type_id: TypeId) -> usize {
        self.index.get(&type_id).map_or(0, BTreeSet::len)
    }
}

/// Key for attribute index: (TypeId, attribute name, value)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrKey {
    pub type_id: TypeId,
    pub attr_name: String,
    pub value: AttrValue,
}

/// Indexable subset of values.
///
/// Numbers are left out: `=` compares Int and Float by value, which a hash
/// key cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Bool(bool),
    String(String),
}

impl AttrValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::String(s) => Some(AttrValue::String(s.clone())),
            _ => None,
        }
    }
}

/// Attribute index: (TypeId, attr_name, value) -> Set<EntityId>
#[derive(Debug, Default)]
pub struct AttributeIndex {
    exact: HashMap<AttrKey, BTreeSet<EntityId>>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, attr_name: &str, value: &Value, entity_id: EntityId) {
        if let Some(value) = AttrValue::from_value(value) {
            let key = AttrKey {
                type_id,
                attr_name: attr_name.to_string(),
                value,
            };
            self.exact.entry(key).or_default().insert(entity_id);
        }
    }

    pub fn remove(&mut self, type_id: TypeId, attr_name: &str, value: &Value, entity_id: EntityId) {
        if let Some(value) = AttrValue::from_value(value) {
            let key = AttrKey {
                type_id,
                attr_name: attr_name.to_string(),
                value,
            };
            if let Some(set) = self.exact.get_mut(&key) {
                set.remove(&entity_id);
                if set.is_empty() {
                    self.exact.remove(&key);
                }
            }
        }
    }

    /// Entities whose attribute equals `value`, or `None` when the value
    /// kind is not indexed and the caller has to scan.
    pub fn find_exact(
        &self,
        type_id: TypeId,
        attr_name: &str,
        value: &Value,
    ) -> Option<impl Iterator<Item = EntityId> + '_> {
        let value = AttrValue::from_value(value)?;
        let key = AttrKey {
            type_id,
            attr_name: attr_name.to_string(),
            value,
        };
        Some(
            self.exact
                .get(&key)
                .into_iter()
                .flat_map(|set| set.iter().copied()),
        )
    }
}

/// Link index: (EntityId, RelationId) -> Set<EntityId>
///
/// Inverse links are stored under the inverse relation id, so lookups
/// never need to know which side declared the relation.
#[derive(Debug, Default)]
pub struct LinkIndex {
    targets: HashMap<(EntityId, RelationId), BTreeSet<EntityId>>,
    count: usize,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the link was already present.
    pub fn insert(&mut self, source: EntityId, relation: RelationId, target: EntityId) -> bool {
        let inserted = self
            .targets
            .entry((source, relation))
            .or_default()
            .insert(target);
        if inserted {
            self.count += 1;
        }
        inserted
    }

    /// Returns false if there was no such link.
    pub fn remove(&mut self, source: EntityId, relation: RelationId, target: EntityId) -> bool {
        let key = (source, relation);
        let Some(set) = self.targets.get_mut(&key) else {
            return false;
        };
        let removed = set.remove(&target);
        if set.is_empty() {
            self.targets.remove(&key);
        }
        if removed {
            self.count -= 1;
        }
        removed
    }

    pub fn get(&self, source: EntityId, relation: RelationId) -> impl Iterator<Item = EntityId> + '_ {
        self.targets
            .get(&(source, relation))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn contains(&self, source: EntityId, relation: RelationId, target: EntityId) -> bool {
        self.targets
            .get(&(source, relation))
            .is_some_and(|set| set.contains(&target))
    }

    /// Number of directed links, inverses included.
    pub fn len(&self) -> usize {
        self.count
    }
}
