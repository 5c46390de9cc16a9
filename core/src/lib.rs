//! Graft Core Types
//!
//! This crate provides the foundational types shared by every Graft crate:
//! - Identity types (EntityId, TypeId, RelationId)
//! - Scalar values (the Value enum) and their JSON conversions
//! - Entity and link records held by the in-memory snapshot
//! - Operator keywords of the relation-mutation document language
//! - Match predicates: comparison operators, field paths, conditions
//! - Common error types

mod entity;
mod error;
mod id;
pub mod keywords;
mod op;
mod path;
mod predicate;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use op::CompareOp;
pub use path::FieldPath;
pub use predicate::{json_kind, Condition, MatchPredicate};
pub use value::*;
