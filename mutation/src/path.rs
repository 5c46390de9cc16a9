//! Locations inside a document, for error reporting.

use std::fmt;

/// A JSONPath-like location: `$`, `$.addresses`, `$.orders[1].products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath(String);

impl DocPath {
    pub fn root() -> Self {
        Self("$".to_string())
    }

    pub fn field(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
