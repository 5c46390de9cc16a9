//! Data API client.

use crate::{Body, ClientConfig, ClientError, ClientResult, Response, RetryPolicy, Transport};
use graft_mutation::{Action, Normalizer};
use serde_json::Value as Json;
use tracing::{debug, info};

const VALIDATE: &str = "validate";

/// Client for one namespace of the data API.
///
/// Every data call normalizes the document first; nothing is sent when
/// that fails.
pub struct Client<T: Transport> {
    transport: T,
    base_url: String,
    namespace: String,
    retry: RetryPolicy,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            namespace: config.namespace.clone(),
            retry: config.retry.policy(),
        }
    }

    /// Replace the bootstrap retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL the namespace's endpoint lives at.
    pub fn endpoint(&self) -> String {
        join(&self.base_url, &[&self.namespace])
    }

    /// URL for an entity action.
    pub fn entity_url(&self, entity: &str, action: &Action) -> String {
        match action {
            Action::Query(name) => join(&self.base_url, &[&self.namespace, name]),
            _ => join(&self.base_url, &[&self.namespace, entity, action.as_str()]),
        }
    }

    pub async fn create(&self, entity: &str, doc: &Json) -> ClientResult<Json> {
        self.send(entity, &Action::Create, doc).await
    }

    pub async fn get(&self, entity: &str, doc: &Json) -> ClientResult<Json> {
        self.send(entity, &Action::Get, doc).await
    }

    pub async fn update(&self, entity: &str, doc: &Json) -> ClientResult<Json> {
        self.send(entity, &Action::Update, doc).await
    }

    /// Call a predefined query by name.
    pub async fn query(&self, name: &str, doc: &Json) -> ClientResult<Json> {
        self.send(name, &Action::Query(name.to_string()), doc).await
    }

    /// Upload the raw schema document, retrying until the endpoint accepts
    /// it or the policy runs out. Returns the endpoint URL.
    pub async fn push_schema(&self, schema: &str) -> ClientResult<String> {
        let url = self.endpoint();
        let (endpoint, transport) = (url.as_str(), &self.transport);
        self.retry
            .run("push schema", move || async move {
                let response = transport.submit(endpoint, Body::hocon(schema)).await?;
                check(response).map(|_| ())
            })
            .await?;
        info!(endpoint = %url, "Endpoint created");
        Ok(url)
    }

    /// URL of the server's schema check, outside any namespace.
    pub fn validate_url(&self) -> String {
        join(&self.base_url, &[VALIDATE])
    }

    /// Ask the server to check the raw schema document without creating an
    /// endpoint. Not retried.
    pub async fn validate_schema(&self, schema: &str) -> ClientResult<()> {
        let url = self.validate_url();
        debug!(%url, "validating schema");
        let response = self.transport.submit(&url, Body::hocon(schema)).await?;
        check(response).map(|_| ())
    }

    async fn send(&self, entity: &str, action: &Action, doc: &Json) -> ClientResult<Json> {
        let normalized = Normalizer::new().normalize_for(action, doc)?;
        let url = self.entity_url(entity, action);
        debug!(%url, %action, "submitting");
        let response = self.transport.submit(&url, Body::Json(normalized)).await?;
        check(response)
    }
}

fn check(response: Response) -> ClientResult<Json> {
    if response.is_success() {
        return Ok(response.body);
    }
    let message = match &response.body {
        Json::String(text) => text.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    };
    Err(ClientError::status(response.status, message))
}

fn join(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}
