//! Internal client implementation.

use std::sync::Arc;

use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use parking_lot::RwLock;
use serde_json::Value;

use crate::{
    Error,
    auth::Credentials,
    config::{ErrorEnvelopePolicy, PaginationConfig, endpoints},
    resources::{Envelope, ResourceCatalog, envelope},
    transport::{HttpRequest, HttpTransport, Method},
    user_agent,
};

/// Internal client state shared by every clone and every resource handle.
pub(crate) struct ClientInner {
    /// API base URL without a trailing slash.
    pub(crate) api_url: String,
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) catalog: Arc<dyn ResourceCatalog>,
    pub(crate) pagination: PaginationConfig,
    pub(crate) error_envelope_policy: ErrorEnvelopePolicy,
    /// User-Agent, Content-Type and Authorization.
    pub(crate) headers: RwLock<HeaderMap>,
    pub(crate) credentials: RwLock<Credentials>,
}

impl ClientInner {
    /// Builds the headers sent with every resource request.
    pub(crate) fn default_headers(credentials: &Credentials) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent::user_agent()));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(endpoints::JSON_API_CONTENT_TYPE),
        );
        credentials.apply(&mut headers)?;
        Ok(headers)
    }

    /// Replaces the credentials and the headers derived from them.
    pub(crate) fn set_credentials(&self, credentials: Credentials) -> Result<(), Error> {
        let headers = Self::default_headers(&credentials)?;
        *self.headers.write() = headers;
        *self.credentials.write() = credentials;
        Ok(())
    }

    /// Sends one request and normalizes the response.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<Envelope, Error> {
        let mut request = HttpRequest::new(method, url)
            .with_query(query)
            .with_headers(self.headers.read().clone());
        if let Some(body) = body {
            request = request.with_json(body);
        }

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            query = %request.query_string(),
            "sending request"
        );

        let response = self.transport.send(request).await?;

        tracing::debug!(status = response.status, "received response");

        envelope::normalize(response, self.error_envelope_policy)
    }
}

impl std::fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("api_url", &self.api_url)
            .field("pagination", &self.pagination)
            .field("error_envelope_policy", &self.error_envelope_policy)
            .finish_non_exhaustive()
    }
}
