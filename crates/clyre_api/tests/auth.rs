use clyre_api::{ClyreApiClient, ClyreApiConfig, Credentials, RegisterCredentials, SessionState};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ClyreApiClient {
    ClyreApiClient::new(ClyreApiConfig::new(server.uri())).expect("client")
}

#[tokio::test]
async fn session_starts_unauthenticated() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    assert_eq!(client.session().state(), SessionState::Unauthenticated);
    assert!(client.session().access_token().is_none());
}

#[tokio::test]
async fn login_posts_credentials_and_adopts_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .login(&Credentials::new("ada@example.com", "pw"))
        .await
        .expect("login");

    assert!(client.session().is_authenticated());
    assert_eq!(client.session().access_token().as_deref(), Some("t-1"));
}

#[tokio::test]
async fn failed_login_leaves_session_unauthenticated_and_never_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad credentials"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .login(&Credentials::new("ada@example.com", "wrong"))
        .await
        .expect_err("login rejected");

    assert!(error.is_unauthorized());
    assert_eq!(client.session().state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn register_posts_name_and_adopts_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({"email": "ada@example.com", "password": "pw", "name": "Ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .register(&RegisterCredentials {
            email: "ada@example.com".to_string(),
            password: "pw".to_string(),
            name: "Ada".to_string(),
        })
        .await
        .expect("register");

    assert_eq!(client.session().access_token().as_deref(), Some("t-2"));
}

#[tokio::test]
async fn refresh_failure_transitions_to_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .login(&Credentials::new("a@b.c", "pw"))
        .await
        .expect("login");

    assert!(client.refresh().await.is_err());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .login(&Credentials::new("a@b.c", "pw"))
        .await
        .expect("login");

    client.logout().await;
    assert_eq!(client.session().state(), SessionState::Unauthenticated);
}
