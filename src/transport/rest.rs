//! REST transport implementation using reqwest.
//!
//! This module provides the production [`HttpTransport`] for the Outreach
//! SDK. It performs exactly one HTTP exchange per call; it never retries and
//! never turns a non-success status into an error (that is the caller's job).

use std::time::Duration;

use url::Url;

use crate::config::TlsConfig;
use crate::transport::traits::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::user_agent;
use crate::Error;

// ============================================================================
// REST Transport
// ============================================================================

/// REST transport using reqwest.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a new REST transport builder.
    pub fn builder() -> RestTransportBuilder {
        RestTransportBuilder::new()
    }

    /// Creates a new REST transport with the given configuration.
    pub fn new(tls_config: &TlsConfig, timeout: Duration) -> Result<Self, Error> {
        let mut client_builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent::user_agent());

        if tls_config.accept_invalid_certs {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }
        for bundle in tls_config.extra_root_bundles()? {
            let certs = reqwest::Certificate::from_pem_bundle(&bundle).map_err(|e| {
                Error::configuration(format!("invalid CA bundle: {e}")).with_source(e)
            })?;
            if certs.is_empty() {
                return Err(Error::configuration("CA bundle contains no certificates"));
            }
            for cert in certs {
                client_builder = client_builder.add_root_certificate(cert);
            }
        }

        let client = client_builder.build().map_err(|e| {
            Error::configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, timeout })
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the final URL, appending query pairs in order.
    fn build_url(request: &HttpRequest) -> Result<Url, Error> {
        let mut url = Url::parse(&request.url)?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl HttpTransport for RestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let url = Self::build_url(&request)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };
        builder = builder.headers(request.headers);
        if let Some(ref fields) = request.form {
            builder = builder.form(fields);
        } else if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

// ============================================================================
// REST Transport Builder
// ============================================================================

/// Builder for REST transport.
pub struct RestTransportBuilder {
    tls_config: TlsConfig,
    timeout: Duration,
}

impl RestTransportBuilder {
    fn new() -> Self {
        Self {
            tls_config: TlsConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the REST transport.
    pub fn build(self) -> Result<RestTransport, Error> {
        RestTransport::new(&self.tls_config, self.timeout)
    }
}

/// Maps reqwest errors to SDK errors.
fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("Request timed out: {}", e)).with_source(e)
    } else if e.is_connect() {
        Error::connection(format!("Connection failed: {}", e)).with_source(e)
    } else if e.is_builder() {
        Error::configuration(format!("Invalid request: {}", e)).with_source(e)
    } else {
        Error::transport(format!("HTTP error: {}", e)).with_source(e)
    }
}

// ============================================================================
// Tests
// ============================================================================
