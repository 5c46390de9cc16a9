//! Fixture loading.
//!
//! A fixture is a directory under `fixtures/` holding:
//!
//! - `schema.json`: the schema document
//! - `seed.json` (optional): entities and links of the snapshot
//! - `documents/*.json`: request documents and expected outputs
//!
//! Seed entities carry a label so that tests can name them:
//!
//! ```json
//! {
//!   "entities": [{ "label": "steve", "type": "Customer", "attrs": { "firstName": "Steve" } }],
//!   "links": [["steve", "addresses", "kent"]]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use graft_core::{Attributes, EntityId, Value};
use graft_graph::Graph;
use graft_registry::Registry;
use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::error::{FixtureError, FixtureResult};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Seed {
    #[serde(default)]
    entities: Vec<SeedEntity>,
    /// `[source label, relation name, target label]`
    #[serde(default)]
    links: Vec<(String, String, String)>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedEntity {
    label: String,
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default)]
    attrs: Map<String, Json>,
}

/// A loaded fixture: registry, populated snapshot and entity labels.
#[derive(Debug)]
pub struct Fixture {
    dir: PathBuf,
    registry: Registry,
    graph: Graph,
    ids: HashMap<String, EntityId>,
    labels: BTreeMap<EntityId, String>,
}

impl Fixture {
    /// The `fixtures/` directory of this crate.
    pub fn root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Load a fixture directory by name.
    pub fn load(name: &str) -> FixtureResult<Self> {
        let dir = Self::root().join(name);

        let schema_path = dir.join("schema.json");
        let schema = read(&schema_path)?;
        let registry = Registry::from_schema_str(&schema)
            .map_err(|e| FixtureError::schema(&schema_path, e))?;

        let seed_path = dir.join("seed.json");
        let seed = if seed_path.exists() {
            let source = read(&seed_path)?;
            serde_json::from_str(&source).map_err(|e| FixtureError::json(&seed_path, e))?
        } else {
            Seed::default()
        };

        let mut fixture = Self {
            dir,
            registry,
            graph: Graph::new(),
            ids: HashMap::new(),
            labels: BTreeMap::new(),
        };
        fixture.populate(seed)?;
        Ok(fixture)
    }

    /// Build a fixture from in-memory sources; documents cannot be read.
    pub fn from_sources(schema: &str, seed: Option<&str>) -> FixtureResult<Self> {
        let registry =
            Registry::from_schema_str(schema).map_err(|e| FixtureError::schema("<inline>", e))?;
        let seed = match seed {
            Some(source) => {
                serde_json::from_str(source).map_err(|e| FixtureError::json("<inline>", e))?
            }
            None => Seed::default(),
        };
        let mut fixture = Self {
            dir: PathBuf::new(),
            registry,
            graph: Graph::new(),
            ids: HashMap::new(),
            labels: BTreeMap::new(),
        };
        fixture.populate(seed)?;
        Ok(fixture)
    }

    fn populate(&mut self, seed: Seed) -> FixtureResult<()> {
        for entity in seed.entities {
            let type_id = self.registry.get_type_id(&entity.entity_type).ok_or_else(|| {
                FixtureError::seed(format!(
                    "entity '{}' has unknown type {}",
                    entity.label, entity.entity_type
                ))
            })?;
            let mut attrs = Attributes::new();
            for (name, json) in &entity.attrs {
                if self.registry.get_attr(type_id, name).is_none() {
                    return Err(FixtureError::seed(format!(
                        "entity '{}': {} has no attribute {}",
                        entity.label, entity.entity_type, name
                    )));
                }
                let value = Value::from_json(json).ok_or_else(|| {
                    FixtureError::seed(format!("entity '{}': {} is not a scalar", entity.label, name))
                })?;
                attrs.insert(name.clone(), value);
            }
            if self.ids.contains_key(&entity.label) {
                return Err(FixtureError::seed(format!("duplicate label '{}'", entity.label)));
            }
            let id = self.graph.create_entity(type_id, attrs);
            self.labels.insert(id, entity.label.clone());
            self.ids.insert(entity.label, id);
        }

        for (source, relation, target) in seed.links {
            let source_id = self.require(&source)?;
            let target_id = self.require(&target)?;
            let source_type = self
                .graph
                .get_entity(source_id)
                .map(|e| e.type_id)
                .ok_or_else(|| FixtureError::seed(format!("entity '{}' vanished", source)))?;
            let relation_id = self
                .registry
                .get_relation_by_name(source_type, &relation)
                .map(|r| r.id)
                .ok_or_else(|| {
                    FixtureError::seed(format!(
                        "{} has no relation {}",
                        self.registry.type_name(source_type),
                        relation
                    ))
                })?;
            self.graph.link(&self.registry, relation_id, source_id, target_id)?;
        }
        Ok(())
    }

    fn require(&self, label: &str) -> FixtureResult<EntityId> {
        self.id(label)
            .ok_or_else(|| FixtureError::seed(format!("unknown label '{}'", label)))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Entity id for a seed label.
    pub fn id(&self, label: &str) -> Option<EntityId> {
        self.ids.get(label).copied()
    }

    /// Seed label of an entity.
    pub fn label(&self, id: EntityId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Labels for a list of ids, `#<id>` for unlabeled entities.
    pub fn labels_of(&self, ids: &[EntityId]) -> Vec<String> {
        ids.iter()
            .map(|id| match self.label(*id) {
                Some(label) => label.to_string(),
                None => format!("#{}", id),
            })
            .collect()
    }

    /// Read `documents/<name>.json`.
    pub fn document(&self, name: &str) -> FixtureResult<Json> {
        let path = self.dir.join("documents").join(format!("{}.json", name));
        let source = read(&path)?;
        serde_json::from_str(&source).map_err(|e| FixtureError::json(&path, e))
    }
}

fn read(path: &Path) -> FixtureResult<String> {
    std::fs::read_to_string(path).map_err(|e| FixtureError::file_read(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "entities": {
            "Customer": {
                "fields": { "firstName": "string" },
                "relations": { "addresses": { "type": "Address", "inverse": "customers" } }
            },
            "Address": { "fields": { "street": "string" } }
        }
    }"#;

    #[test]
    fn test_inline_seed() {
        let seed = r#"{
            "entities": [
                { "label": "steve", "type": "Customer", "attrs": { "firstName": "Steve" } },
                { "label": "kent", "type": "Address", "attrs": { "street": "kent st" } }
            ],
            "links": [["steve", "addresses", "kent"]]
        }"#;

        let fixture = Fixture::from_sources(SCHEMA, Some(seed)).unwrap();

        let steve = fixture.id("steve").unwrap();
        let kent = fixture.id("kent").unwrap();
        assert_eq!(fixture.graph().entity_count(), 2);
        // addresses and its inverse
        assert_eq!(fixture.graph().link_count(), 2);
        assert_eq!(fixture.labels_of(&[kent, steve]), vec!["kent", "steve"]);
    }

    #[test]
    fn test_seed_unknown_relation() {
        let seed = r#"{
            "entities": [
                { "label": "steve", "type": "Customer" },
                { "label": "kent", "type": "Address" }
            ],
            "links": [["steve", "orders", "kent"]]
        }"#;

        let result = Fixture::from_sources(SCHEMA, Some(seed));

        assert!(matches!(result, Err(FixtureError::Seed { .. })));
    }

    #[test]
    fn test_seed_unknown_attribute() {
        let seed = r#"{ "entities": [{ "label": "x", "type": "Customer", "attrs": { "age": 3 } }] }"#;

        let result = Fixture::from_sources(SCHEMA, Some(seed));

        assert!(matches!(result, Err(FixtureError::Seed { .. })));
    }
}
