//! Client error types.

use crate::ConfigError;
use graft_mutation::NormalizeError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the data API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The document was rejected before anything was sent.
    #[error("invalid document: {0}")]
    Normalize(#[from] NormalizeError),

    /// The request failed on the network or the server answered non-2xx.
    #[error("transport failure{}: {message}", .status.map(|s| format!(" (status {})", s)).unwrap_or_default())]
    TransportFailure { status: Option<u16>, message: String },

    /// Every attempt of a retried call failed.
    #[error("gave up after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::TransportFailure {
            status: Some(status),
            message: message.into(),
        }
    }

    /// HTTP status of a failed response, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::TransportFailure { status, .. } => *status,
            Self::RetriesExhausted { last, .. } => last.status_code(),
            _ => None,
        }
    }
}

impl ClientError {
    /// False for failures a repeat cannot fix: rejected documents, bad
    /// configuration and 4xx answers other than 408 and 429.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure {
                status: Some(status @ 400..=499),
                ..
            } => matches!(*status, 408 | 429),
            Self::TransportFailure { .. } => true,
            Self::RetriesExhausted { .. } | Self::Normalize(_) | Self::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::TransportFailure {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
