//! Common error types for Graft.

use crate::{EntityId, RelationId, TypeId};
use thiserror::Error;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Entity has the wrong type for the requested operation.
    #[error("Entity {entity} has type {actual}, expected {expected}")]
    TypeMismatch {
        entity: EntityId,
        expected: TypeId,
        actual: TypeId,
    },

    /// Relation not known to the snapshot.
    #[error("Relation not found: {0}")]
    RelationNotFound(RelationId),
}

/// Result type for snapshot operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while reading a match predicate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    /// The predicate is neither a condition array nor a parameter mapping.
    #[error("match predicate must be an array of [field, op, value] triples or an object, got {found}")]
    InvalidShape { found: String },

    /// Condition array length is not a non-zero multiple of three.
    #[error("match predicate array has {len} elements, expected a non-zero multiple of 3")]
    InvalidLength { len: usize },

    /// Field position does not hold a string.
    #[error("condition {index}: field must be a string")]
    FieldNotString { index: usize },

    /// Operator position does not hold a known comparison operator.
    #[error("condition {index}: unknown comparison operator {op}")]
    UnknownOperator { index: usize, op: String },

    /// Field path is empty or has an empty segment.
    #[error("invalid field path '{path}'")]
    InvalidPath { path: String },

    /// Value position holds an object.
    #[error("condition {index}: value must be a scalar or a list")]
    NonScalarValue { index: usize },

    /// Integer literal outside the signed 64-bit range.
    #[error("condition {index}: integer {value} is out of range")]
    IntegerOutOfRange { index: usize, value: String },

    /// `in` requires a list operand.
    #[error("condition {index}: operator 'in' requires a list value")]
    InOperandNotList { index: usize },
}

impl PredicateError {
    pub fn invalid_shape(found: impl Into<String>) -> Self {
        Self::InvalidShape {
            found: found.into(),
        }
    }

    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    pub fn unknown_operator(index: usize, op: impl Into<String>) -> Self {
        Self::UnknownOperator {
            index,
            op: op.into(),
        }
    }
}
