//! Error types for the fixture framework.

use graft_core::GraphError;
use graft_registry::RegistryError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Errors that can occur while loading fixtures or running scenarios.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid schema {}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    #[error("Invalid seed: {message}")]
    Seed { message: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Scenario '{scenario}' has no fixture")]
    NoFixture { scenario: String },

    #[error("Step '{step}' failed: {message}")]
    AssertionFailed { step: String, message: String },
}

impl FixtureError {
    pub fn file_read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn schema(path: impl AsRef<Path>, source: RegistryError) -> Self {
        Self::Schema {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed {
            message: message.into(),
        }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}
