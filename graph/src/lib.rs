//! Graft Snapshot Storage
//!
//! The in-memory entity snapshot that match predicates are resolved against:
//! - Entity storage with monotonically increasing ids (creation order)
//! - Type index: entities of a type, in creation order
//! - Attribute index: entities by exact string/bool attribute value
//! - Link index: entities linked through a relation, both directions

mod graph;
mod index;

pub use graph::*;
