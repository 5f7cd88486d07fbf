//! Transport trait definitions and common types.
//!
//! This module defines the HTTP abstraction the rest of the SDK is written
//! against. The SDK never talks to reqwest directly: it builds an
//! [`HttpRequest`], hands it to an [`HttpTransport`], and interprets the
//! [`HttpResponse`].

use std::fmt;

use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;

// ============================================================================
// Method
// ============================================================================

/// HTTP methods used by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request / Response
// ============================================================================

/// An outgoing HTTP request.
///
/// Query parameters are kept as an ordered list of pairs so the emitted
/// querystring mirrors the order in which the SDK built it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// The absolute URL, without query parameters.
    pub url: String,
    /// Query parameters in emission order.
    pub query: Vec<(String, String)>,
    /// Request headers.
    pub headers: HeaderMap,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// `application/x-www-form-urlencoded` body, if any. Takes precedence
    /// over `body`.
    pub form: Option<Vec<(String, String)>>,
}

impl HttpRequest {
    /// Creates a request with no query, headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            form: None,
        }
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a form-encoded body; fields are sent in the given order.
    #[must_use]
    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    /// Returns the value of the first form field named `key`.
    pub fn form_field(&self, key: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of the first query parameter named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the querystring without percent-encoding, e.g.
    /// `filter[firstName]=John&sort=-account.name`.
    ///
    /// Intended for logs and assertions; the transport does its own encoding.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A received HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from a status and raw body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a response whose body is the serialized JSON value.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns `true` if the body is empty or only whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// A request/response HTTP capability.
///
/// Implementations perform exactly one exchange per call and never retry.
/// Non-success statuses are **not** errors at this layer: they come back as
/// an [`HttpResponse`] so the caller can inspect the body. Only failures to
/// complete the exchange (connection, timeout) are returned as `Err`.
///
/// The SDK ships [`RestTransport`](crate::transport::RestTransport) (reqwest)
/// and [`MockTransport`](crate::testing::MockTransport) (in-memory).
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and waits for the complete response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

#[async_trait::async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        (**self).send(request).await
    }
}
