//! Resolver error types.

use graft_core::GraphError;
use thiserror::Error;

/// Errors that can occur while resolving a match predicate.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Unknown entity type name.
    #[error("Unknown entity type '{name}'")]
    UnknownEntityType { name: String },

    /// A path hop is not a relation of the type reached so far.
    #[error("Unknown relation '{relation}' on type '{type_name}' in path '{path}'")]
    UnknownRelation {
        relation: String,
        type_name: String,
        path: String,
    },

    /// The terminal attribute does not exist.
    #[error("Unknown field '{field}' on type '{type_name}' in path '{path}'")]
    UnknownField {
        field: String,
        type_name: String,
        path: String,
    },

    /// No predefined query with this name.
    #[error("Unknown query '{name}'")]
    UnknownQuery { name: String },

    /// The caller supplied a parameter the query does not declare.
    #[error("Query '{query}' has no parameter '{name}'")]
    UnknownQueryParameter { query: String, name: String },

    /// A required parameter was not supplied.
    #[error("Query '{query}' requires parameter '{name}'")]
    MissingQueryParameter { query: String, name: String },

    /// A parameter value cannot be used as a condition operand.
    #[error("Parameter '{name}': {message}")]
    InvalidParameterValue { name: String, message: String },

    /// Named form where conditions were expected, or the reverse.
    #[error("Expected the {expected} form of match predicate")]
    PredicateFormMismatch { expected: String },

    /// Snapshot lookup failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ResolveError {
    pub fn unknown_entity_type(name: impl Into<String>) -> Self {
        Self::UnknownEntityType { name: name.into() }
    }

    pub fn unknown_relation(
        relation: impl Into<String>,
        type_name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::UnknownRelation {
            relation: relation.into(),
            type_name: type_name.into(),
            path: path.into(),
        }
    }

    pub fn unknown_field(
        field: impl Into<String>,
        type_name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::UnknownField {
            field: field.into(),
            type_name: type_name.into(),
            path: path.into(),
        }
    }

    pub fn unknown_query(name: impl Into<String>) -> Self {
        Self::UnknownQuery { name: name.into() }
    }

    pub fn unknown_query_parameter(query: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownQueryParameter {
            query: query.into(),
            name: name.into(),
        }
    }

    pub fn missing_query_parameter(query: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingQueryParameter {
            query: query.into(),
            name: name.into(),
        }
    }

    pub fn invalid_parameter_value(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn predicate_form_mismatch(expected: impl Into<String>) -> Self {
        Self::PredicateFormMismatch {
            expected: expected.into(),
        }
    }
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
