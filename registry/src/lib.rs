//! Graft Registry
//!
//! Runtime schema lookup. Single source of truth for entity types, their
//! attributes and relations, and the predefined queries a server declares.
//! The registry is immutable after construction via RegistryBuilder, or
//! via a schema document (`Registry::from_schema_str`).

mod builder;
mod registry;
mod schema;
mod types;

pub use builder::{QueryBuilder, RegistryBuilder, RegistryError, RelationBuilder, TypeBuilder};
pub use registry::{PathWalk, Registry};
pub use schema::{EntitySchema, ParamSchema, QuerySchema, RelationSchema, SchemaDocument};
pub use types::*;
