//! Match predicate resolution.

use crate::{Bindings, Plan, PlannedCondition, ResolveError, ResolveResult};
use graft_core::{CompareOp, EntityId, MatchPredicate, Value};
use graft_graph::Graph;
use graft_registry::Registry;
use serde_json::{Map, Value as Json};
use std::collections::HashSet;

/// Resolves match predicates against a snapshot.
///
/// Borrows both immutably; the same predicate over an unchanged snapshot
/// always selects the same entities, in creation order.
pub struct Resolver<'r, 'g> {
    registry: &'r Registry,
    graph: &'g Graph,
}

impl<'r, 'g> Resolver<'r, 'g> {
    /// Create a new resolver.
    pub fn new(registry: &'r Registry, graph: &'g Graph) -> Self {
        Self { registry, graph }
    }

    /// Resolve an ad-hoc predicate against entities of `entity_type`.
    pub fn resolve(&self, entity_type: &str, predicate: &MatchPredicate) -> ResolveResult<Vec<EntityId>> {
        let type_id = self
            .registry
            .get_type_id(entity_type)
            .ok_or_else(|| ResolveError::unknown_entity_type(entity_type))?;
        let MatchPredicate::Conditions(conditions) = predicate else {
            return Err(ResolveError::predicate_form_mismatch("condition"));
        };
        let plan = Plan::for_conditions(self.registry, type_id, conditions)?;
        self.execute(&plan)
    }

    /// Resolve a predefined query called with a named-form predicate.
    pub fn resolve_query(&self, name: &str, predicate: &MatchPredicate) -> ResolveResult<Vec<EntityId>> {
        let MatchPredicate::Named(params) = predicate else {
            return Err(ResolveError::predicate_form_mismatch("named parameter"));
        };
        self.resolve_query_params(name, params)
    }

    /// Resolve a predefined query with the caller's parameter mapping.
    pub fn resolve_query_params(&self, name: &str, params: &Map<String, Json>) -> ResolveResult<Vec<EntityId>> {
        let query = self
            .registry
            .get_query(name)
            .ok_or_else(|| ResolveError::unknown_query(name))?;
        let bindings = Bindings::bind(query, params)?;
        let plan = Plan::for_query(self.registry, query, &bindings)?;
        self.execute(&plan)
    }

    /// Run a validated plan.
    pub fn execute(&self, plan: &Plan) -> ResolveResult<Vec<EntityId>> {
        let mut matched = Vec::new();
        for id in self.candidates(plan) {
            if self.matches_all(id, &plan.conditions)? {
                matched.push(id);
            }
        }
        tracing::debug!(
            entity_type = %self.registry.type_name(plan.entity_type),
            conditions = plan.conditions.len(),
            matched = matched.len(),
            "predicate resolved"
        );
        Ok(matched)
    }

    /// Entities worth testing, in creation order. A direct string or
    /// boolean equality narrows the scan through the attribute index.
    fn candidates(&self, plan: &Plan) -> Vec<EntityId> {
        let indexed = plan
            .conditions
            .iter()
            .filter(|c| c.is_direct() && c.op == CompareOp::Eq)
            .find_map(|c| self.graph.entities_by_attr(plan.entity_type, &c.attr, &c.value));
        match indexed {
            Some(ids) => ids.collect(),
            None => self.graph.entities_of_type(plan.entity_type).collect(),
        }
    }

    fn matches_all(&self, id: EntityId, conditions: &[PlannedCondition]) -> ResolveResult<bool> {
        for condition in conditions {
            if !self.holds(id, condition)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A condition holds when some entity reached through its hops has a
    /// satisfying attribute.
    fn holds(&self, id: EntityId, condition: &PlannedCondition) -> ResolveResult<bool> {
        let mut frontier = vec![id];
        for relation in &condition.hops {
            let mut seen = HashSet::new();
            frontier = frontier
                .iter()
                .flat_map(|entity| self.graph.linked(*entity, *relation))
                .filter(|next| seen.insert(*next))
                .collect();
            if frontier.is_empty() {
                return Ok(false);
            }
        }
        for entity in frontier {
            let actual: &Value = self.graph.attr(entity, &condition.attr)?;
            if condition.op.eval(actual, &condition.value) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
