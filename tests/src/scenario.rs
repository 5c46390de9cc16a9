//! Scenario definition and runner.
//!
//! A scenario names a fixture and a list of steps. Each step reads one
//! document from the fixture's `documents/` directory, runs it through the
//! normalizer or the resolver, and checks the outcome.

use graft_core::MatchPredicate;
use graft_mutation::{Action, Normalizer};
use graft_pattern::Resolver;
use serde_json::Value as Json;

use crate::assertion::{Assertion, Outcome};
use crate::error::{FixtureError, FixtureResult};
use crate::fixture::Fixture;

/// What a step does with its document.
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// Normalize for `action`; against the schema when `entity` is given.
    Normalize {
        action: Option<Action>,
        entity: Option<String>,
    },
    /// Resolve the document's `-match` against entities of a type.
    Resolve { entity: String },
    /// Call a predefined query with the document's `-match`.
    Query { name: String },
}

/// A single step.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub document: String,
    pub kind: StepKind,
    pub assertion: Assertion,
}

/// A named sequence of steps over one fixture.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    fixture: Option<String>,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixture: None,
            steps: Vec::new(),
        }
    }

    /// Use the fixture directory `fixtures/<name>`.
    pub fn fixture(mut self, name: impl Into<String>) -> Self {
        self.fixture = Some(name.into());
        self
    }

    /// Normalize a document without a schema or action checks.
    pub fn normalize<F>(self, document: &str, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.step(document, StepKind::Normalize { action: None, entity: None }, f)
    }

    /// Normalize a request body for an action, without a schema.
    pub fn request<F>(self, document: &str, action: Action, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let kind = StepKind::Normalize {
            action: Some(action),
            entity: None,
        };
        self.step(document, kind, f)
    }

    /// Normalize a request body for an action against the fixture schema.
    pub fn checked_request<F>(self, document: &str, entity: &str, action: Action, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let kind = StepKind::Normalize {
            action: Some(action),
            entity: Some(entity.to_string()),
        };
        self.step(document, kind, f)
    }

    pub fn resolve<F>(self, document: &str, entity: &str, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let kind = StepKind::Resolve {
            entity: entity.to_string(),
        };
        self.step(document, kind, f)
    }

    pub fn query<F>(self, document: &str, name: &str, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let kind = StepKind::Query {
            name: name.to_string(),
        };
        self.step(document, kind, f)
    }

    fn step<F>(mut self, document: &str, kind: StepKind, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let name = format!("{}#{}", document, self.steps.len() + 1);
        self.steps.push(Step {
            name,
            document: document.to_string(),
            kind,
            assertion: f(Assertion::new()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Load the fixture and run every step in order.
    pub fn run(&self) -> FixtureResult<()> {
        let fixture_name = self.fixture.as_deref().ok_or_else(|| FixtureError::NoFixture {
            scenario: self.name.clone(),
        })?;
        let fixture = Fixture::load(fixture_name)?;

        for step in &self.steps {
            let document = fixture.document(&step.document)?;
            let result = run_step(&fixture, &step.kind, &document);
            step.assertion.verify(&step.name, &result, &fixture)?;
        }
        Ok(())
    }
}

fn run_step(fixture: &Fixture, kind: &StepKind, document: &Json) -> Result<Outcome, String> {
    match kind {
        StepKind::Normalize { action, entity } => {
            let normalizer = match entity {
                Some(entity) => Normalizer::with_schema(fixture.registry(), entity)
                    .map_err(|e| e.to_string())?,
                None => Normalizer::new(),
            };
            let output = match action {
                Some(action) => normalizer.normalize_for(action, document),
                None => normalizer.normalize(document),
            }
            .map_err(|e| e.to_string())?;
            let again = match action {
                Some(action) => normalizer.normalize_for(action, &output),
                None => normalizer.normalize(&output),
            }
            .map_err(|e| e.to_string());
            Ok(Outcome::Normalized {
                input: document.clone(),
                output,
                again,
            })
        }
        StepKind::Resolve { entity } => {
            let predicate = predicate_of(document)?;
            let ids = Resolver::new(fixture.registry(), fixture.graph())
                .resolve(entity, &predicate)
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Selected(fixture.labels_of(&ids)))
        }
        StepKind::Query { name } => {
            let predicate = predicate_of(document)?;
            let ids = Resolver::new(fixture.registry(), fixture.graph())
                .resolve_query(name, &predicate)
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Selected(fixture.labels_of(&ids)))
        }
    }
}

fn predicate_of(document: &Json) -> Result<MatchPredicate, String> {
    let json = document
        .get(graft_core::keywords::MATCH)
        .ok_or_else(|| "document has no -match".to_string())?;
    MatchPredicate::from_json(json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_builder() {
        let scenario = Scenario::new("builder")
            .fixture("shop")
            .normalize("address_implicit", |a| a.idempotent())
            .resolve("match_widget", "Product", |a| a.count(2));

        assert_eq!(scenario.name(), "builder");
        assert_eq!(scenario.steps().len(), 2);
        assert_eq!(scenario.steps()[1].name, "match_widget#2");
        assert_eq!(
            scenario.steps()[1].kind,
            StepKind::Resolve {
                entity: "Product".into()
            }
        );
    }

    #[test]
    fn test_scenario_without_fixture() {
        let result = Scenario::new("lonely").run();

        assert!(matches!(result, Err(FixtureError::NoFixture { .. })));
    }
}
