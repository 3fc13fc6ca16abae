//! Raw HTTP route behavior

use crate::common::*;
use crate::{assert_contains, assert_ok};
use pretty_assertions::assert_eq;
use std::time::Duration;
use uuid::Uuid;
use xfpad::shared::{CommitRequest, DocumentMetadata, Operation};

async fn seed_over_http(server: &TestServer, doc_id: &str, text: &str) {
    let request = CommitRequest {
        origin: Uuid::new_v4(),
        seq: Some(0),
        parent: 0,
        diff: vec![Operation::insert(0, text)].into(),
    };
    let response = assert_ok!(
        reqwest::Client::new()
            .put(server.url(&format!("/docs/{}/commits", doc_id)))
            .json(&request)
            .send()
            .await
    );
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_list_documents() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    seed_over_http(&server, "b-doc", "bb").await;
    seed_over_http(&server, "a-doc", "a").await;

    let response = assert_ok!(reqwest::get(server.url("/docs")).await);
    let listing: Vec<DocumentMetadata> = assert_ok!(response.json().await);
    let summary: Vec<(String, usize, usize)> = listing
        .into_iter()
        .map(|m| (m.id, m.head, m.length))
        .collect();
    assert_eq!(
        summary,
        vec![("a-doc".to_string(), 1, 1), ("b-doc".to_string(), 1, 2)]
    );
}

#[tokio::test]
async fn test_commit_wire_format() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    seed_over_http(&server, "doc", "hi").await;

    let response = assert_ok!(reqwest::get(server.url("/docs/doc/commits/1")).await);
    let body: serde_json::Value = assert_ok!(response.json().await);
    assert_eq!(body["parent"], 0);
    assert_eq!(
        body["diff"],
        serde_json::json!([{ "kind": "Insert", "index": 0, "value": "hi" }])
    );
    assert!(body["originID"].is_string());
}

#[tokio::test]
async fn test_unreadable_commit_is_bad_request() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let response = assert_ok!(
        reqwest::Client::new()
            .put(server.url("/docs/doc/commits"))
            .header("content-type", "application/json")
            .body("{\"parent\": \"zero\"}")
            .send()
            .await
    );
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = assert_ok!(response.json().await);
    assert_eq!(body["status"], 400);
    assert_contains!(body["error"].as_str().unwrap_or_default(), "invalid commit");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let response = assert_ok!(reqwest::get(server.url("/nowhere")).await);
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = assert_ok!(response.json().await);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_stream_delivers_commits_as_events() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    seed_over_http(&server, "doc", "streamed").await;

    let mut response = assert_ok!(reqwest::get(server.url("/docs/doc/stream?from=1")).await);
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let mut received = String::new();
    let read = async {
        while !received.contains("\n\n") {
            match response.chunk().await {
                Ok(Some(chunk)) => received.push_str(&String::from_utf8_lossy(&chunk)),
                _ => break,
            }
        }
    };
    assert_ok!(tokio::time::timeout(SETTLE_TIMEOUT, read).await);

    assert_contains!(received, "event: commit");
    assert_contains!(received, "id: 1");
    assert_contains!(received, "streamed");
}
