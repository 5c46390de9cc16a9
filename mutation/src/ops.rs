//! Relation and entity-kind operators.

use graft_core::keywords;
use std::fmt;

/// What a relation field does to the set of linked entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RelationOp {
    /// Add links.
    Link,
    /// Remove links.
    Unlink,
    /// Make the payload the complete linked set.
    #[default]
    Replace,
}

impl RelationOp {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            keywords::LINK => Some(Self::Link),
            keywords::UNLINK => Some(Self::Unlink),
            keywords::REPLACE => Some(Self::Replace),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Link => keywords::LINK,
            Self::Unlink => keywords::UNLINK,
            Self::Replace => keywords::REPLACE,
        }
    }
}

impl fmt::Display for RelationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether a nested payload describes new or existing entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EntityKind {
    #[default]
    Create,
    /// Existing entities, selected by a match predicate.
    Update,
}

impl EntityKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            keywords::CREATE => Some(Self::Create),
            keywords::UPDATE => Some(Self::Update),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Create => keywords::CREATE,
            Self::Update => keywords::UPDATE,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
