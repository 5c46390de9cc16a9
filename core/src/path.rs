//! Field paths used by match conditions.
//!
//! A path is zero or more relation hops followed by a terminal attribute,
//! written on the wire as a dotted string (`customers.firstName`).

use crate::PredicateError;
use std::fmt;

/// A field reference, possibly crossing relations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    hops: Vec<String>,
    field: String,
}

impl FieldPath {
    /// A direct attribute of the target entity.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            hops: Vec::new(),
            field: name.into(),
        }
    }

    /// Prepend a relation hop: `FieldPath::field("firstName").via("customers")`.
    pub fn via(mut self, relation: impl Into<String>) -> Self {
        self.hops.insert(0, relation.into());
        self
    }

    /// Parse a dotted path. Every segment must be non-empty.
    pub fn parse(s: &str) -> Result<Self, PredicateError> {
        let mut segments: Vec<String> = Vec::new();
        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(PredicateError::invalid_path(s));
            }
            segments.push(segment.to_string());
        }
        // split always yields at least one segment
        let field = segments.pop().ok_or_else(|| PredicateError::invalid_path(s))?;
        Ok(Self {
            hops: segments,
            field,
        })
    }

    /// Relation hops, outermost first.
    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    /// Terminal attribute name.
    pub fn terminal(&self) -> &str {
        &self.field
    }

    /// Returns true if the path names an attribute of the entity itself.
    pub fn is_direct(&self) -> bool {
        self.hops.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hop in &self.hops {
            write!(f, "{}.", hop)?;
        }
        f.write_str(&self.field)
    }
}
