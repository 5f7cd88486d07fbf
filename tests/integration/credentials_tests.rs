//! OAuth2 flows against a local token endpoint.

use outreach_sdk::{AuthorizationRequest, Credentials, ErrorKind, transport::RestTransport};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestServer, credentials, init_tracing, token_response};

const CREATED_AT: i64 = 1_593_604_800;

#[tokio::test]
async fn test_client_refresh_updates_authorization_header() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(json!({
            "client_id": "client_id",
            "client_secret": "client_secret",
            "redirect_uri": "https://example.com/oauth/callback",
            "refresh_token": "refresh_token",
            "grant_type": "refresh_token",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("fresh", CREATED_AT)))
        .expect(1)
        .mount(&ts.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&ts.server)
        .await;

    let refreshed = ts.client.refresh_credentials().await.unwrap();
    assert_eq!(refreshed.access_token(), Some("fresh"));
    assert_eq!(refreshed.refresh_token(), Some("fresh_refresh"));
    assert_eq!(refreshed.expires_at(), Some(CREATED_AT + 7200));
    assert_eq!(ts.client.credentials(), refreshed);

    ts.client.resource("users").unwrap().list().await.unwrap();
}

#[tokio::test]
async fn test_refresh_rejected_keeps_old_tokens() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_grant"})),
        )
        .mount(&ts.server)
        .await;

    let err = ts.client.refresh_credentials().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status(), Some(401));
    assert_eq!(ts.client.credentials().access_token(), Some("access_token"));
}

#[tokio::test]
async fn test_refresh_without_refresh_token_sends_nothing() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut partial = Credentials::new()
        .with_client_id("client_id")
        .with_client_secret("client_secret")
        .with_redirect_uri("https://example.com/oauth/callback")
        .with_token_url(format!("{}/oauth/token", server.uri()));
    let transport = RestTransport::builder().build().unwrap();

    let err = partial.refresh(&transport).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Credential);
}

#[tokio::test]
async fn test_authorization_code_flow() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "client_id=client_id&client_secret=client_secret\
             &redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fcallback\
             &grant_type=authorization_code&code=abc123",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("first", CREATED_AT)))
        .expect(1)
        .mount(&server)
        .await;

    let request = AuthorizationRequest::new(
        "client_id",
        "client_secret",
        "https://example.com/oauth/callback",
    )
    .scopes(["prospects.read", "users.read"])
    .with_token_url(format!("{}/oauth/token", server.uri()));

    let url = request.authorize_url().unwrap();
    assert!(url.as_str().starts_with("https://api.outreach.io/oauth/authorize?"));
    assert!(url.query_pairs().any(|(k, v)| k == "scope" && v == "prospects.read users.read"));

    let code = AuthorizationRequest::code_from_redirect(
        "https://example.com/oauth/callback?code=abc123&state=xyz",
    )
    .unwrap();
    let transport = RestTransport::builder().build().unwrap();
    let credentials = request.exchange_code(&transport, &code).await.unwrap();

    assert_eq!(credentials.access_token(), Some("first"));
    assert_eq!(credentials.client_id(), Some("client_id"));
    assert_eq!(credentials.expires_at(), Some(CREATED_AT + 7200));
}

#[tokio::test]
async fn test_refresh_then_persist_round_trip() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("saved", CREATED_AT)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("credentials.json");

    let mut creds = credentials(&server);
    let transport = RestTransport::builder().build().unwrap();
    creds.refresh(&transport).await.unwrap();
    creds.save(&file, &["client_secret"]).unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(stored["access_token"], "saved");
    assert!(stored.get("client_secret").is_none());

    let defaults = Credentials::new().with_client_secret("from_env");
    let loaded =
        Credentials::from_json_with_defaults(&std::fs::read_to_string(&file).unwrap(), &defaults)
            .unwrap();
    assert_eq!(loaded.client_secret(), Some("from_env"));
    assert_eq!(loaded.access_token(), Some("saved"));
    assert_eq!(loaded.expires_at(), Some(CREATED_AT + 7200));
}
