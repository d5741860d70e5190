use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clyre_api::{
    AuthExpiredHandler, ClyreApiClient, ClyreApiConfig, Credentials, SessionState,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CountingHandler {
    calls: AtomicUsize,
}

impl AuthExpiredHandler for CountingHandler {
    fn on_auth_expired(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn threads_body() -> serde_json::Value {
    json!({
        "threads": [
            {"id": "abc", "title": "First", "creationDate": "2024-05-01", "updateTime": "2024-05-02T10:00:00"}
        ]
    })
}

async fn logged_in_client(server: &MockServer, token: &str) -> ClyreApiClient {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(server)
        .await;

    let client = ClyreApiClient::new(ClyreApiConfig::new(server.uri())).expect("client");
    client
        .login(&Credentials::new("a@b.c", "pw"))
        .await
        .expect("login succeeds");
    client
}

#[tokio::test]
async fn bearer_token_is_attached_when_session_holds_one() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/thread/all"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(threads_body()))
        .expect(1)
        .mount(&server)
        .await;

    let threads = client.list_threads().await.expect("threads");
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].id, "abc");
    assert_eq!(threads[0].creation_time, "2024-05-01");
}

#[tokio::test]
async fn unauthenticated_requests_carry_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1", "name": "Ada", "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClyreApiClient::new(ClyreApiConfig::new(server.uri())).expect("client");
    let user = client.current_user().await.expect("user");
    assert_eq!(user.name, "Ada");

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_response_refreshes_once_and_replays_with_new_token() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, "stale").await;

    Mock::given(method("GET"))
        .and(path("/thread/all"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/thread/all"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(threads_body()))
        .expect(1)
        .mount(&server)
        .await;

    let threads = client.list_threads().await.expect("replayed request succeeds");
    assert_eq!(threads.len(), 1);
    assert_eq!(client.session().access_token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn second_unauthorized_response_propagates_without_another_refresh() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, "stale").await;

    Mock::given(method("GET"))
        .and(path("/thread/all"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let error = client.list_threads().await.expect_err("replay is rejected");
    assert!(error.is_unauthorized());
}

#[tokio::test]
async fn failed_refresh_ends_session_and_returns_original_error() {
    let server = MockServer::start().await;
    let handler = Arc::new(CountingHandler::default());
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "stale"})))
        .mount(&server)
        .await;
    let client = ClyreApiClient::new(ClyreApiConfig::new(server.uri()))
        .expect("client")
        .with_auth_expired_handler(handler.clone());
    client
        .login(&Credentials::new("a@b.c", "pw"))
        .await
        .expect("login");

    Mock::given(method("GET"))
        .and(path("/thread/abc"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "token expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "no cookie"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let error = client.thread_history("abc").await.expect_err("auth expired");
    assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(error.to_string().contains("token expired"));
    assert_eq!(client.session().state(), SessionState::Unauthenticated);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_unauthorized_errors_are_not_retried() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/thread/all"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Thread not found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let error = client.list_threads().await.expect_err("404");
    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "HTTP 404 Not Found Thread not found");
}

#[tokio::test]
async fn delete_reports_success_status() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, "tok").await;

    Mock::given(method("DELETE"))
        .and(path("/thread/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.delete_thread("abc").await.expect("delete");
    assert_eq!(status, StatusCode::OK);
}
