//! Common test harness for Outreach SDK integration tests.

use std::sync::Once;

use outreach_sdk::{Client, Credentials};
use serde_json::{Value, json};
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A local API server and a client pointed at it.
pub struct TestServer {
    pub server: MockServer,
    pub client: Client,
}

impl TestServer {
    /// Starts a server; the client authenticates with [`credentials()`].
    pub async fn start() -> anyhow::Result<Self> {
        init_tracing();
        let server = MockServer::start().await;
        let client = Client::builder()
            .api_url(format!("{}/api/v2", server.uri()))
            .credentials(credentials(&server))
            .build()?;
        Ok(Self { server, client })
    }
}

/// Full credentials whose token URL points at `server`.
pub fn credentials(server: &MockServer) -> Credentials {
    Credentials::new()
        .with_client_id("client_id")
        .with_client_secret("client_secret")
        .with_redirect_uri("https://example.com/oauth/callback")
        .with_access_token("access_token")
        .with_refresh_token("refresh_token")
        .with_expires_at(0)
        .with_token_url(format!("{}/oauth/token", server.uri()))
}

/// A successful token endpoint response.
pub fn token_response(access_token: &str, created_at: i64) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": format!("{access_token}_refresh"),
        "token_type": "bearer",
        "created_at": created_at,
        "expires_in": 7200,
    })
}

/// A single-prospect JSON:API document.
pub fn prospect_document(id: u64) -> Value {
    json!({
        "data": {
            "type": "prospect",
            "id": id,
            "attributes": {"firstName": "John", "lastName": "Doe"},
            "relationships": {"owner": {"data": {"type": "user", "id": 7}}},
        },
        "included": [
            {"type": "user", "id": 7, "attributes": {"firstName": "Jane"}}
        ],
    })
}
