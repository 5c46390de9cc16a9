//! Normalization error types.

use graft_core::PredicateError;
use thiserror::Error;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Errors raised while normalizing a document.
///
/// Every variant except `UnknownEntityType` carries the document path
/// where the problem was found (`$.orders[1].products`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("{path}: invalid relation operator {key}")]
    InvalidRelationOperator { path: String, key: String },

    #[error("{path}: invalid entity-kind operator {key}")]
    InvalidEntityKindOperator { path: String, key: String },

    #[error("{path}: operator key cannot be combined with other keys ({})", .keys.join(", "))]
    AmbiguousOperatorKey { path: String, keys: Vec<String> },

    #[error("{path}: no match predicate reachable")]
    MissingMatchPredicate { path: String },

    #[error("{path}: match predicate not allowed here")]
    UnexpectedMatchPredicate { path: String },

    #[error("{path}: unknown operator {key}")]
    UnknownOperator { path: String, key: String },

    #[error("{path}: expected an object or an array of objects, got {found}")]
    InvalidPayload { path: String, found: String },

    #[error("{path}: {source}")]
    InvalidMatchPredicate {
        path: String,
        #[source]
        source: PredicateError,
    },

    #[error("{path}: expected the {expected} form of match predicate")]
    PredicateFormMismatch { path: String, expected: String },

    #[error("{path}: unknown field {field} on {entity_type}")]
    UnknownField {
        path: String,
        entity_type: String,
        field: String,
    },

    #[error("{path}: field {field} expects {expected}, got {found}")]
    InvalidFieldValue {
        path: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("Unknown entity type: {name}")]
    UnknownEntityType { name: String },
}

impl NormalizeError {
    pub fn invalid_relation_operator(path: impl ToString, key: impl Into<String>) -> Self {
        Self::InvalidRelationOperator {
            path: path.to_string(),
            key: key.into(),
        }
    }

    pub fn invalid_entity_kind_operator(path: impl ToString, key: impl Into<String>) -> Self {
        Self::InvalidEntityKindOperator {
            path: path.to_string(),
            key: key.into(),
        }
    }

    pub fn ambiguous_operator_key<'a>(
        path: impl ToString,
        keys: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        Self::AmbiguousOperatorKey {
            path: path.to_string(),
            keys: keys.into_iter().cloned().collect(),
        }
    }

    pub fn missing_match_predicate(path: impl ToString) -> Self {
        Self::MissingMatchPredicate {
            path: path.to_string(),
        }
    }

    pub fn unexpected_match_predicate(path: impl ToString) -> Self {
        Self::UnexpectedMatchPredicate {
            path: path.to_string(),
        }
    }

    pub fn unknown_operator(path: impl ToString, key: impl Into<String>) -> Self {
        Self::UnknownOperator {
            path: path.to_string(),
            key: key.into(),
        }
    }

    pub fn invalid_payload(path: impl ToString, found: impl Into<String>) -> Self {
        Self::InvalidPayload {
            path: path.to_string(),
            found: found.into(),
        }
    }

    pub fn invalid_match_predicate(path: impl ToString, source: PredicateError) -> Self {
        Self::InvalidMatchPredicate {
            path: path.to_string(),
            source,
        }
    }

    pub fn predicate_form_mismatch(path: impl ToString, expected: impl Into<String>) -> Self {
        Self::PredicateFormMismatch {
            path: path.to_string(),
            expected: expected.into(),
        }
    }

    pub fn unknown_field(
        path: impl ToString,
        entity_type: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UnknownField {
            path: path.to_string(),
            entity_type: entity_type.into(),
            field: field.into(),
        }
    }

    pub fn invalid_field_value(
        path: impl ToString,
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            path: path.to_string(),
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unknown_entity_type(name: impl Into<String>) -> Self {
        Self::UnknownEntityType { name: name.into() }
    }

    /// Document path of the error, if it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidRelationOperator { path, .. }
            | Self::InvalidEntityKindOperator { path, .. }
            | Self::AmbiguousOperatorKey { path, .. }
            | Self::MissingMatchPredicate { path }
            | Self::UnexpectedMatchPredicate { path }
            | Self::UnknownOperator { path, .. }
            | Self::InvalidPayload { path, .. }
            | Self::InvalidMatchPredicate { path, .. }
            | Self::PredicateFormMismatch { path, .. }
            | Self::UnknownField { path, .. }
            | Self::InvalidFieldValue { path, .. } => Some(path),
            Self::UnknownEntityType { .. } => None,
        }
    }
}
