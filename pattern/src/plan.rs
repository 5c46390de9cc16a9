//! Validated predicates.
//!
//! A plan is a predicate whose paths have been resolved against the
//! registry: relation names became relation ids and the terminal attribute
//! is known to exist. Building a plan touches no entity.

use crate::{Bindings, ResolveError, ResolveResult};
use graft_core::{CompareOp, Condition, FieldPath, RelationId, TypeId, Value};
use graft_registry::{PathWalk, QueryDef, Registry};

/// One condition with its relation hops resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCondition {
    /// Relations to follow from the candidate entity, outermost first.
    pub hops: Vec<RelationId>,
    pub attr: String,
    pub op: CompareOp,
    pub value: Value,
}

impl PlannedCondition {
    pub fn is_direct(&self) -> bool {
        self.hops.is_empty()
    }
}

/// A conjunction of planned conditions over one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub entity_type: TypeId,
    pub conditions: Vec<PlannedCondition>,
}

impl Plan {
    /// Plan ad-hoc conditions.
    pub fn for_conditions(
        registry: &Registry,
        entity_type: TypeId,
        conditions: &[Condition],
    ) -> ResolveResult<Self> {
        let conditions = conditions
            .iter()
            .map(|c| plan_condition(registry, entity_type, &c.path, c.op, c.value.clone()))
            .collect::<ResolveResult<Vec<_>>>()?;
        Ok(Self {
            entity_type,
            conditions,
        })
    }

    /// Plan a predefined query with bound parameters. Conditions whose
    /// parameter is unbound are dropped.
    pub fn for_query(registry: &Registry, query: &QueryDef, bindings: &Bindings) -> ResolveResult<Self> {
        let mut conditions = Vec::with_capacity(query.conditions.len());
        for condition in &query.conditions {
            let Some(value) = bindings.get(&condition.param) else {
                continue;
            };
            if condition.op == CompareOp::In && !value.is_list() {
                return Err(ResolveError::invalid_parameter_value(
                    &condition.param,
                    "operator 'in' requires a list",
                ));
            }
            conditions.push(plan_condition(
                registry,
                query.entity_type,
                &condition.path,
                condition.op,
                value.clone(),
            )?);
        }
        Ok(Self {
            entity_type: query.entity_type,
            conditions,
        })
    }
}

fn plan_condition(
    registry: &Registry,
    entity_type: TypeId,
    path: &FieldPath,
    op: CompareOp,
    value: Value,
) -> ResolveResult<PlannedCondition> {
    match registry.walk_path(entity_type, path) {
        PathWalk::Resolved { relations, .. } => Ok(PlannedCondition {
            hops: relations,
            attr: path.terminal().to_string(),
            op,
            value,
        }),
        PathWalk::UnknownRelation { index, on_type } => Err(ResolveError::unknown_relation(
            &path.hops()[index],
            registry.type_name(on_type),
            path.to_string(),
        )),
        PathWalk::UnknownAttribute { owner } => Err(ResolveError::unknown_field(
            path.terminal(),
            registry.type_name(owner),
            path.to_string(),
        )),
    }
}
