//! Client configuration.
//!
//! Handles loading `graft.toml`; `GRAFT_BASE_URL` and `GRAFT_NAMESPACE`
//! override the file.

use crate::RetryPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "graft.toml";

const ENV_BASE_URL: &str = "GRAFT_BASE_URL";
const ENV_NAMESPACE: &str = "GRAFT_NAMESPACE";

/// Where and how to reach the data API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    /// Schema name the endpoint was created under.
    pub namespace: String,
    pub timeout_secs: u64,
    pub retry: RetrySettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            namespace: "test".to_string(),
            timeout_secs: 30,
            retry: RetrySettings::default(),
        }
    }
}

/// `[retry]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            multiplier: policy.multiplier,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            multiplier: self.multiplier.max(1),
        }
    }
}

impl ClientConfig {
    /// Load `graft.toml` from the working directory, falling back to the
    /// defaults when there is none, then apply the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::load_from(Path::new(CONFIG_FILE)) {
            Err(ConfigError::NotFound(_)) => Self::default(),
            other => other?,
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.into())
            } else {
                ConfigError::Io(path.into(), e)
            }
        })?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse(_, source) => ConfigError::Parse(path.into(), source),
            other => other,
        })
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(PathBuf::from(CONFIG_FILE), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup, then check the result.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = base_url;
        }
        if let Some(namespace) = lookup(ENV_NAMESPACE).filter(|v| !v.is_empty()) {
            self.namespace = namespace;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.namespace.is_empty() || self.namespace.contains('/') {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("base_url must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),

    #[error("invalid namespace '{0}'")]
    InvalidNamespace(String),
}
