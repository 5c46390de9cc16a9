//! Request transport.
//!
//! The client only ever POSTs a body to a URL and reads back JSON, so the
//! seam is a single method. [`HttpTransport`] is the real thing; tests
//! script their own.

use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value as Json;
use std::time::Duration;
use tracing::debug;

pub const HOCON_CONTENT_TYPE: &str = "application/hocon";

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Json),
    /// Text sent verbatim with its own content type (schema upload).
    Raw { content_type: String, text: String },
}

impl Body {
    pub fn hocon(text: impl Into<String>) -> Self {
        Self::Raw {
            content_type: HOCON_CONTENT_TYPE.to_string(),
            text: text.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            Self::Json(_) => "application/json",
            Self::Raw { content_type, .. } => content_type,
        }
    }
}

/// Response status and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Json,
}

impl Response {
    pub fn new(status: u16, body: Json) -> Self {
        Self { status, body }
    }

    /// Build from raw text. Non-JSON text is kept as a string, empty text
    /// becomes null.
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Json::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Json::String(text.to_string()))
        };
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url`.
    async fn submit(&self, url: &str, body: Body) -> ClientResult<Response>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, url: &str, body: Body) -> ClientResult<Response> {
        debug!(url, content_type = body.content_type(), "POST");
        let request = self.http.post(url);
        let request = match body {
            Body::Json(json) => request.json(&json),
            Body::Raw { content_type, text } => request
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(text),
        };
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(Response::from_text(status, &text))
    }
}
