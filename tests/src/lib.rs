//! Graft Tests
//!
//! Fixture-driven integration tests. A fixture directory holds a schema
//! document, a seed for the in-memory snapshot and request documents;
//! scenarios run those documents through the normalizer and the resolver
//! and check the outcome step by step.

mod assertion;
mod error;
mod fixture;
mod scenario;

pub use assertion::{Assertion, Outcome};
pub use error::{FixtureError, FixtureResult};
pub use fixture::Fixture;
pub use scenario::{Scenario, Step, StepKind};

/// Everything a test file needs.
pub mod prelude {
    pub use crate::{Assertion, Fixture, Outcome, Scenario};
    pub use graft_mutation::Action;
}
