//! Replays the demonstration sequence through the client.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use graft_cli::demo;
use graft_client::{
    Body, Client, ClientConfig, ClientError, ClientResult, Response, RetryPolicy, Transport,
};
use graft_tests::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

/// Answers from a queue, then 200 with an empty object. Records every call.
#[derive(Default)]
struct Recorder {
    responses: Mutex<VecDeque<ClientResult<Response>>>,
    calls: Mutex<Vec<(String, Body)>>,
}

impl Recorder {
    fn failing_first(n: usize) -> Self {
        let recorder = Self::default();
        {
            let mut responses = recorder.responses.lock().unwrap();
            for _ in 0..n {
                responses.push_back(Err(ClientError::transport("connection refused")));
            }
        }
        recorder
    }

    fn calls(&self) -> Vec<(String, Body)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn submit(&self, url: &str, body: Body) -> ClientResult<Response> {
        self.calls.lock().unwrap().push((url.to_string(), body));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Response::new(200, json!({}))))
    }
}

fn client(transport: Recorder) -> Client<Recorder> {
    let config = ClientConfig {
        base_url: "http://localhost:8080".into(),
        namespace: "test".into(),
        ..ClientConfig::default()
    };
    Client::new(transport, &config).with_retry(RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        multiplier: 2,
    })
}

async fn replay(client: &Client<Recorder>) -> ClientResult<()> {
    client.push_schema(demo::SCHEMA).await?;
    for step in demo::steps().unwrap() {
        step.send(client).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_demo_sequence_paths() {
    // GIVEN an endpoint that is not up for the first two attempts
    let client = client(Recorder::failing_first(2));

    // WHEN replaying the demo
    replay(&client).await.unwrap();

    // THEN the schema push was retried and every call hit its path
    let urls: Vec<String> = client.transport().calls().into_iter().map(|(url, _)| url).collect();
    assert_eq!(
        urls,
        vec![
            "http://localhost:8080/test",
            "http://localhost:8080/test",
            "http://localhost:8080/test",
            "http://localhost:8080/test/Customer/create",
            "http://localhost:8080/test/Customer/get",
            "http://localhost:8080/test/Customer/update",
            "http://localhost:8080/test/Customer/get",
            "http://localhost:8080/test/Customer/create",
            "http://localhost:8080/test/Customer/get",
            "http://localhost:8080/test/customerByFirstName",
        ]
    );
}

#[tokio::test]
async fn test_demo_bodies_are_canonical() {
    let fixture = Fixture::load("shop").unwrap();
    let client = client(Recorder::default());

    replay(&client).await.unwrap();

    let calls = client.transport().calls();
    assert_eq!(calls[0].1, Body::hocon(demo::SCHEMA));
    let body = |i: usize| match &calls[i].1 {
        Body::Json(json) => json.clone(),
        other => panic!("expected a JSON body, got {:?}", other),
    };
    assert_eq!(body(1), fixture.document("demo_create.canonical").unwrap());
    assert_eq!(body(2), fixture.document("demo_get").unwrap());
    assert_eq!(body(3), fixture.document("demo_update.canonical").unwrap());
    assert_eq!(body(6), body(2));
    assert_eq!(body(7), json!({ "-match": { "customerName": "Steve" } }));
}

#[tokio::test]
async fn test_demo_stops_when_endpoint_never_comes_up() {
    let client = client(Recorder::failing_first(10));

    let result = replay(&client).await;

    assert!(matches!(result, Err(ClientError::RetriesExhausted { attempts: 3, .. })));
    // Nothing but the three pushes was sent
    assert_eq!(client.transport().calls().len(), 3);
}

#[tokio::test]
async fn test_server_error_is_surfaced() {
    let recorder = Recorder::default();
    {
        let mut responses = recorder.responses.lock().unwrap();
        responses.push_back(Ok(Response::new(200, Json::Null)));
        responses.push_back(Ok(Response::from_text(500, "boom")));
    }
    let client = client(recorder);

    let result = replay(&client).await;

    assert!(matches!(
        result,
        Err(ClientError::TransportFailure { status: Some(500), ref message }) if message == "boom"
    ));
}

#[test]
fn test_demo_payloads_match_fixture_documents() {
    let fixture = Fixture::load("shop").unwrap();
    let steps = demo::steps().unwrap();

    assert_eq!(steps[0].body, fixture.document("demo_create").unwrap());
    assert_eq!(steps[1].body, fixture.document("demo_get").unwrap());
    assert_eq!(steps[2].body, fixture.document("demo_update").unwrap());
    assert_eq!(steps[6].body, fixture.document("demo_query").unwrap());
    assert_eq!(steps[6].action, Action::Query(demo::QUERY_NAME.into()));
}
