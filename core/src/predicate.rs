//! Match predicates.
//!
//! A predicate selects target entities. It comes in two shapes that never
//! mix: a list of conditions (`["name", "=", "widget"]`, possibly several
//! triples concatenated, all of which must hold) or a mapping of
//! predefined-query parameters (`{"customerName": "Steve"}`).

use crate::{keywords, CompareOp, FieldPath, PredicateError, Value};
use serde_json::{Map, Number, Value as Json};

/// One `[field, op, value]` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: FieldPath,
    pub op: CompareOp,
    pub value: Value,
}

impl Condition {
    pub fn new(path: FieldPath, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            path,
            op,
            value: value.into(),
        }
    }
}

/// A match predicate in either of its two forms.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchPredicate {
    /// Ad-hoc conditions, conjunctive.
    Conditions(Vec<Condition>),
    /// Parameters of a predefined query, in caller order.
    Named(Map<String, Json>),
}

impl MatchPredicate {
    /// Single-condition predicate.
    pub fn triple(path: FieldPath, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Conditions(vec![Condition::new(path, op, value)])
    }

    /// Empty parameter mapping; extend with [`MatchPredicate::param`].
    pub fn named() -> Self {
        Self::Named(Map::new())
    }

    /// Add a condition. Has no effect on the named form.
    pub fn and(mut self, path: FieldPath, op: CompareOp, value: impl Into<Value>) -> Self {
        if let Self::Conditions(conditions) = &mut self {
            conditions.push(Condition::new(path, op, value));
        }
        self
    }

    /// Add a parameter binding. Has no effect on the condition form.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Self::Named(params) = &mut self {
            params.insert(name.into(), value.into().to_json());
        }
        self
    }

    /// Returns true for the predefined-query parameter form.
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// Conditions of the ad-hoc form; empty for the named form.
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Self::Conditions(conditions) => conditions,
            Self::Named(_) => &[],
        }
    }

    /// Read a predicate from the JSON value found under `-match`.
    pub fn from_json(json: &Json) -> Result<Self, PredicateError> {
        match json {
            Json::Array(items) => {
                if items.is_empty() || items.len() % 3 != 0 {
                    return Err(PredicateError::InvalidLength { len: items.len() });
                }
                items
                    .chunks(3)
                    .enumerate()
                    .map(|(index, chunk)| parse_condition(index, chunk))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Conditions)
            }
            Json::Object(params) => Ok(Self::Named(params.clone())),
            other => Err(PredicateError::invalid_shape(json_kind(other))),
        }
    }

    /// The wire form, as found under `-match`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Conditions(conditions) => Json::Array(
                conditions
                    .iter()
                    .flat_map(|c| {
                        [
                            Json::String(c.path.to_string()),
                            Json::String(c.op.as_str().to_string()),
                            c.value.to_json(),
                        ]
                    })
                    .collect(),
            ),
            Self::Named(params) => Json::Object(params.clone()),
        }
    }

    /// Wrap into a `{"-match": ...}` document.
    pub fn to_document(&self) -> Json {
        let mut doc = Map::new();
        doc.insert(keywords::MATCH.to_string(), self.to_json());
        Json::Object(doc)
    }
}

fn parse_condition(index: usize, chunk: &[Json]) -> Result<Condition, PredicateError> {
    let field = chunk[0]
        .as_str()
        .ok_or(PredicateError::FieldNotString { index })?;
    let path = FieldPath::parse(field)?;

    let op = match &chunk[1] {
        Json::String(s) => {
            CompareOp::parse(s).ok_or_else(|| PredicateError::unknown_operator(index, s))?
        }
        other => return Err(PredicateError::unknown_operator(index, other.to_string())),
    };

    if let Some(n) = wide_integer(&chunk[2]) {
        return Err(PredicateError::IntegerOutOfRange {
            index,
            value: n.to_string(),
        });
    }
    let value = Value::from_json(&chunk[2]).ok_or(PredicateError::NonScalarValue { index })?;
    if op == CompareOp::In && !value.is_list() {
        return Err(PredicateError::InOperandNotList { index });
    }

    Ok(Condition { path, op, value })
}

/// The first integer literal that has no `i64` form, searching lists.
fn wide_integer(json: &Json) -> Option<&Number> {
    match json {
        Json::Number(n) if n.is_u64() && n.as_i64().is_none() => Some(n),
        Json::Array(items) => items.iter().find_map(wide_integer),
        _ => None,
    }
}

/// Short description of a JSON value's kind, for error messages.
pub fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
