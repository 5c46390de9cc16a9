//! The demonstration sequence.
//!
//! Push the schema, then create a customer with nested addresses and
//! orders, read it back, update it, and call the predefined query.

use graft_client::{Client, ClientResult, Transport};
use graft_mutation::Action;
use serde_json::Value as Json;

pub const SCHEMA: &str = include_str!("../demo/schema.json");
pub const CREATE: &str = include_str!("../demo/create.json");
pub const GET: &str = include_str!("../demo/get.json");
pub const UPDATE: &str = include_str!("../demo/update.json");
pub const QUERY: &str = include_str!("../demo/query.json");

pub const ENTITY: &str = "Customer";
pub const QUERY_NAME: &str = "customerByFirstName";

/// One data call of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Heading printed before the step, if it starts a new test.
    pub section: Option<&'static str>,
    pub action: Action,
    pub body: Json,
}

impl Step {
    fn new(section: Option<&'static str>, action: Action, source: &str) -> serde_json::Result<Self> {
        Ok(Self {
            section,
            action,
            body: serde_json::from_str(source)?,
        })
    }

    pub async fn send<T: Transport>(&self, client: &Client<T>) -> ClientResult<Json> {
        match &self.action {
            Action::Create => client.create(ENTITY, &self.body).await,
            Action::Get => client.get(ENTITY, &self.body).await,
            Action::Update => client.update(ENTITY, &self.body).await,
            Action::Query(name) => client.query(name, &self.body).await,
        }
    }
}

/// The data calls, in order. The schema push comes first and is not a step.
pub fn steps() -> serde_json::Result<Vec<Step>> {
    Ok(vec![
        Step::new(Some("test 1"), Action::Create, CREATE)?,
        Step::new(None, Action::Get, GET)?,
        Step::new(Some("test 2"), Action::Update, UPDATE)?,
        Step::new(None, Action::Get, GET)?,
        Step::new(Some("test 3"), Action::Create, CREATE)?,
        Step::new(None, Action::Get, GET)?,
        Step::new(Some("test 4"), Action::Query(QUERY_NAME.to_string()), QUERY)?,
    ])
}
