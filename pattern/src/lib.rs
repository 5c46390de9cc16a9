//! Graft Pattern
//!
//! Match predicate resolution against the in-memory snapshot:
//! - Ad-hoc conditions (`["name", "=", "widget"]`), including dotted paths
//!   that cross relations (`customers.firstName`)
//! - Predefined queries, with parameter checking, optional parameters and
//!   defaults
//!
//! Predicates are validated against the registry before any entity is
//! scanned. Results are in entity creation order, without duplicates.

mod binding;
mod error;
mod plan;
mod resolver;

pub use binding::Bindings;
pub use error::{ResolveError, ResolveResult};
pub use plan::{Plan, PlannedCondition};
pub use resolver::Resolver;
