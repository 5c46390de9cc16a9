//! Graft Client
//!
//! Submits documents to a document-style data API.
//!
//! - `Transport` is the `submit(url, body) -> Response` seam; `HttpTransport`
//!   implements it over reqwest
//! - `Client` builds request paths, normalizes every document before it is
//!   sent and performs the schema bootstrap call with bounded retry
//! - `ClientConfig` is read from `graft.toml` with environment overrides

mod client;
mod config;
mod error;
mod retry;
mod transport;

pub use client::Client;
pub use config::{ClientConfig, ConfigError, RetrySettings, CONFIG_FILE};
pub use error::{ClientError, ClientResult};
pub use retry::RetryPolicy;
pub use transport::{Body, HttpTransport, Response, Transport, HOCON_CONTENT_TYPE};
