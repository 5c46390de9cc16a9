//! Comparison operators usable in match conditions.

use crate::Value;
use std::cmp::Ordering;
use std::fmt;

/// A comparison operator from the fixed set accepted in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Membership in a list operand.
    In,
}

impl CompareOp {
    pub const ALL: &'static [CompareOp] = &[
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
        CompareOp::In,
    ];

    /// Parse the wire spelling of an operator.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "=" => CompareOp::Eq,
            "!=" => CompareOp::Ne,
            "<" => CompareOp::Lt,
            "<=" => CompareOp::Le,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::Ge,
            "in" => CompareOp::In,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "in",
        }
    }

    /// Apply the operator to an attribute value and a condition operand.
    ///
    /// Ordering operators are false for incomparable kinds.
    pub fn eval(self, actual: &Value, operand: &Value) -> bool {
        match self {
            CompareOp::Eq => actual.loose_eq(operand),
            CompareOp::Ne => !actual.loose_eq(operand),
            CompareOp::Lt => actual.compare(operand) == Some(Ordering::Less),
            CompareOp::Le => matches!(
                actual.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            CompareOp::Gt => actual.compare(operand) == Some(Ordering::Greater),
            CompareOp::Ge => matches!(
                actual.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompareOp::In => operand
                .as_list()
                .map(|items| items.iter().any(|item| actual.loose_eq(item)))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
