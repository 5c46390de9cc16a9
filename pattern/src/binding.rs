//! Parameter bindings for predefined queries.

use crate::{ResolveError, ResolveResult};
use graft_core::Value;
use graft_registry::QueryDef;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

/// Parameter values bound for one query call.
///
/// Optional parameters that were omitted and have no default are absent;
/// conditions using them are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    map: HashMap<String, Value>,
}

impl Bindings {
    /// Create new empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the caller's `-match` mapping to the parameters of `query`.
    ///
    /// Every supplied name must be declared, every required parameter must
    /// be supplied, and omitted optional parameters take their default.
    pub fn bind(query: &QueryDef, supplied: &Map<String, Json>) -> ResolveResult<Self> {
        if let Some(unknown) = supplied.keys().find(|name| query.get_param(name).is_none()) {
            return Err(ResolveError::unknown_query_parameter(&query.name, unknown));
        }

        let mut bindings = Self::new();
        for param in &query.params {
            match supplied.get(&param.name) {
                Some(json) => {
                    let value = Value::from_json(json).ok_or_else(|| {
                        ResolveError::invalid_parameter_value(&param.name, "must be a scalar or a list")
                    })?;
                    bindings.insert(param.name.clone(), value);
                }
                None if param.required => {
                    return Err(ResolveError::missing_query_parameter(&query.name, &param.name));
                }
                None => {
                    if let Some(default) = &param.default {
                        bindings.insert(param.name.clone(), default.clone());
                    }
                }
            }
        }
        Ok(bindings)
    }

    /// Insert a binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(name.into(), value.into());
    }

    /// Get a binding by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    /// Check if a parameter is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
