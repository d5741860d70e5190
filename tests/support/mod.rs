#![allow(dead_code)]

use std::sync::Arc;

use clyre::ThreadStore;
use clyre_api::{ClyreApiClient, ClyreApiConfig, ConversationSummary};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn client_for(server: &MockServer) -> Arc<ClyreApiClient> {
    Arc::new(ClyreApiClient::new(ClyreApiConfig::new(server.uri())).expect("client"))
}

pub fn store_for(server: &MockServer) -> ThreadStore {
    ThreadStore::new(client_for(server))
}

pub fn summary(id: &str, title: &str) -> ConversationSummary {
    ConversationSummary {
        id: id.to_string(),
        title: title.to_string(),
        creation_time: "2024-05-01T09:00:00".to_string(),
        update_time: "2024-05-02T10:00:00".to_string(),
    }
}

pub fn history_body(id: &str, title: &str, messages: Value) -> Value {
    json!({
        "id": id,
        "title": title,
        "creationDate": "2024-05-01T09:00:00",
        "updateTime": "2024-05-02T10:00:00",
        "messages": messages,
    })
}

pub fn catalog_body(ids: &[&str]) -> Value {
    let threads: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Thread {id}"),
                "creationDate": "2024-05-01T09:00:00",
                "updateTime": "2024-05-02T10:00:00",
            })
        })
        .collect();
    json!({ "threads": threads })
}

pub fn ndjson(lines: &[Value]) -> ResponseTemplate {
    let body: String = lines.iter().map(|line| format!("{line}\n")).collect();
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "application/x-ndjson")
}

pub async fn mount_catalog(server: &MockServer, ids: &[&str], expected: u64) {
    Mock::given(method("GET"))
        .and(path("/thread/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(ids)))
        .expect(expected)
        .mount(server)
        .await;
}

pub async fn mount_history(server: &MockServer, id: &str, title: &str, messages: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/thread/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body(id, title, messages)))
        .mount(server)
        .await;
}
