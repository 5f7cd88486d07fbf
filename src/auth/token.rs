//! OAuth2 token endpoint exchange shared by refresh and code grants.

use serde::Deserialize;
use serde_json::Number;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{Error, Result};

/// Body of a successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: Option<String>,
    pub(crate) refresh_token: Option<String>,
    created_at: Option<Number>,
    expires_in: Option<Number>,
}

impl TokenResponse {
    /// Absolute expiry: the server's `created_at` plus `expires_in`.
    pub(crate) fn expires_at(&self) -> Result<i64> {
        let created_at = self
            .created_at
            .as_ref()
            .and_then(unix_seconds)
            .ok_or_else(|| Error::invalid_response("token response is missing 'created_at'"))?;
        let expires_in = self
            .expires_in
            .as_ref()
            .and_then(unix_seconds)
            .ok_or_else(|| Error::invalid_response("token response is missing 'expires_in'"))?;
        Ok(created_at.saturating_add(expires_in))
    }
}

/// Reads a JSON number as whole seconds, truncating floats.
pub(crate) fn unix_seconds(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|secs| secs.is_finite())
            .map(|secs| secs as i64)
    })
}

/// Sends a prepared token endpoint request and decodes the grant.
///
/// Non-success statuses come back as [`ErrorKind::Http`](crate::ErrorKind::Http)
/// with the status and raw body; nothing is retried.
pub(crate) async fn request_token<T>(transport: &T, request: HttpRequest) -> Result<TokenResponse>
where
    T: HttpTransport + ?Sized,
{
    let response: HttpResponse = transport.send(request).await?;

    tracing::debug!(status = response.status, "token endpoint responded");

    if !response.is_success() {
        return Err(Error::http(response.status, &response.text()));
    }
    response.json_body()
}
