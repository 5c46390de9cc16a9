//! Graft Mutation
//!
//! The relation-mutation document language: nested entity documents whose
//! relation fields say how linked entities change.
//!
//! Responsibilities:
//! - Make every relation operator (`-link`, `-unlink`, `-replace`) and
//!   entity-kind operator (`-create`, `-update`) explicit
//! - Validate operator placement and match predicates, failing fast with
//!   the document path of the problem
//! - Optionally check field names against a registry
//! - Build canonical documents in code
//!
//! # Module Structure
//!
//! - `normalizer` - Normalizer and request actions
//! - `document` - Typed documents and the builder
//! - `ops` - RelationOp and EntityKind
//! - `path` - Document paths for error reporting
//! - `error` - Error types for normalization failures

mod document;
mod error;
mod normalizer;
mod ops;
mod path;

pub use document::{EntityDocument, Member, Payload, RelationField};
pub use error::{NormalizeError, NormalizeResult};
pub use normalizer::{Action, Normalizer};
pub use ops::{EntityKind, RelationOp};
pub use path::DocPath;
