use assert_json_diff::assert_json_eq;
use chrono::{Duration, Utc};
use mockito::{Matcher, Server};
use serde_json::json;
use ssapi_client::prelude::*;
use std::sync::Arc;

const LOGIN_BODY: &str =
    r#"{"error": null, "token": "abc", "expired": "2999-01-01T00:00:00Z"}"#;

// Helper function to create a test config pointing at the mock server
fn create_test_config(server: &Server) -> Config {
    Config::with_credentials("manager@example.com", "secret").with_base_url(server.url())
}

// Helper function to create a client that already holds a valid token
fn create_authenticated_client(config: Config) -> HttpClient {
    let transport = Arc::new(ReqwestTransport::new(&config.rest_api).unwrap());
    let session = Session {
        token: Some("abc".to_string()),
        expires_at: Some(Utc::now() + Duration::hours(1)),
    };
    HttpClient::from_session(config, transport, session)
}

#[tokio::test]
async fn test_login_then_ping() {
    setup_logger();
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", "/manager/auth")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "email": "manager@example.com",
            "password": "secret"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LOGIN_BODY)
        .create_async()
        .await;

    let ping = server
        .mock("GET", "/ping")
        .match_header("authorization", "abc")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": null, "pong": true}"#)
        .create_async()
        .await;

    let client = HttpClient::new(create_test_config(&server)).await.unwrap();
    let result = client.send_request("/ping", "GET", None).await.unwrap();

    assert_json_eq!(result, json!({"pong": true}));
    login.assert_async().await;
    ping.assert_async().await;
}

#[tokio::test]
async fn test_expired_token_is_refreshed_before_request() {
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", "/manager/auth")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": null, "token": "stale", "expired": "2000-01-01T00:00:00Z"}"#)
        .expect(2)
        .create_async()
        .await;

    let ping = server
        .mock("GET", "/ping")
        .match_header("authorization", "stale")
        .with_status(200)
        .with_body(r#"{"error": null, "pong": true}"#)
        .create_async()
        .await;

    let client = HttpClient::new(create_test_config(&server)).await.unwrap();
    client.send_request("/ping", "GET", None).await.unwrap();

    login.assert_async().await;
    ping.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credentials() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/manager/auth")
        .with_status(200)
        .with_body(r#"{"error": {"name": "AuthError", "AuthError": {"message": "Invalid password"}}}"#)
        .create_async()
        .await;

    let result = HttpClient::new(create_test_config(&server)).await;
    match result {
        Err(AppError::Authentication { message }) => assert_eq!(message, "Invalid password"),
        Err(other) => panic!("Expected Authentication error, got {other:?}"),
        Ok(_) => panic!("Expected login to fail"),
    }
}

#[tokio::test]
async fn test_get_payload_is_sent_as_query() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/clients")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("q".into(), "smith & co".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"error": null, "items": [1, 2]}"#)
        .create_async()
        .await;

    let client = create_authenticated_client(create_test_config(&server));
    let result = client
        .send_request("/clients", "get", Some(json!({"page": 2, "q": "smith & co"})))
        .await
        .unwrap();

    assert_json_eq!(result, json!({"items": [1, 2]}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_payload_is_sent_as_json() {
    let mut server = Server::new_async().await;
    let payload = json!({"name": "Zoë", "active": true});
    let length = serde_json::to_string(&payload).unwrap().len().to_string();

    let mock = server
        .mock("POST", "/clients")
        .match_header("content-length", length.as_str())
        .match_body(Matcher::Json(payload.clone()))
        .with_status(200)
        .with_body(r#"{"error": null, "id": 12}"#)
        .create_async()
        .await;

    let client = create_authenticated_client(create_test_config(&server));
    #[derive(serde::Deserialize)]
    struct Created {
        id: u64,
    }
    let created: Created = client.post("/clients", payload).await.unwrap();

    assert_eq!(created.id, 12);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_head_created_returns_true() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("HEAD", "/clients/1")
        .with_status(201)
        .create_async()
        .await;

    let client = create_authenticated_client(create_test_config(&server));
    let result = client.send_request("/clients/1", "HEAD", None).await.unwrap();

    assert_eq!(result, json!(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_created_is_unsupported() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/export")
        .with_status(201)
        .with_header("content-type", "text/csv")
        .with_body("a,b\n1,2\n")
        .create_async()
        .await;

    let client = create_authenticated_client(create_test_config(&server));
    let err = client.send_request("/export", "GET", None).await.unwrap_err();

    match err {
        AppError::UnsupportedResponse { content_type, .. } => assert_eq!(content_type, "text/csv"),
        other => panic!("Expected UnsupportedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_carries_diagnostics() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/clients/404")
        .with_status(404)
        .with_body(r#"{"error": "NotFoundException[clients/404]"}"#)
        .create_async()
        .await;

    let client = create_authenticated_client(create_test_config(&server));
    let err = client.send_request("/clients/404", "GET", None).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    let diagnostics = err.diagnostics().unwrap();
    assert_eq!(diagnostics.method, "GET");
    assert_eq!(diagnostics.url, format!("{}/clients/404", server.url()));
    assert_eq!(diagnostics.payload, None);
    let body = diagnostics.response_body.as_ref().unwrap();
    assert!(body["error"].as_str().unwrap().contains("<span"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config =
        Config::with_credentials("manager@example.com", "secret").with_base_url("http://127.0.0.1:1");
    let client = create_authenticated_client(config);

    let err = client.send_request("/ping", "GET", None).await.unwrap_err();
    match err {
        AppError::Transport { diagnostics, .. } => {
            assert_eq!(diagnostics.url, "http://127.0.0.1:1/ping");
            assert_eq!(diagnostics.status, None);
        }
        other => panic!("Expected Transport error, got {other:?}"),
    }
}
