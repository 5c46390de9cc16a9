//! Operator keywords of the relation-mutation document language.
//!
//! These constants keep the wire keys consistent between the normalizer,
//! the builder and the schema loader.

/// Prefix that marks a key as an operator rather than a field name.
pub const OPERATOR_PREFIX: char = '-';

/// Relation operator: add links to the given entities.
pub const LINK: &str = "-link";

/// Relation operator: remove links to the given entities.
pub const UNLINK: &str = "-unlink";

/// Relation operator: make the given entities the complete linked set.
pub const REPLACE: &str = "-replace";

/// Entity-kind operator: the payload describes new entities.
pub const CREATE: &str = "-create";

/// Entity-kind operator: the payload selects existing entities.
pub const UPDATE: &str = "-update";

/// Match predicate key.
pub const MATCH: &str = "-match";

/// All relation operator keys.
pub const RELATION_OPERATORS: &[&str] = &[LINK, UNLINK, REPLACE];

/// All entity-kind operator keys.
pub const ENTITY_KIND_OPERATORS: &[&str] = &[CREATE, UPDATE];

/// Returns true if `key` is spelled as an operator.
pub fn is_operator_key(key: &str) -> bool {
    key.starts_with(OPERATOR_PREFIX)
}

/// Returns true if `key` is a relation operator.
pub fn is_relation_operator(key: &str) -> bool {
    RELATION_OPERATORS.contains(&key)
}

/// Returns true if `key` is an entity-kind operator.
pub fn is_entity_kind_operator(key: &str) -> bool {
    ENTITY_KIND_OPERATORS.contains(&key)
}
