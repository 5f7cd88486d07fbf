//! Client builder with typestate pattern.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use parking_lot::RwLock;

use super::inner::ClientInner;
#[cfg(feature = "rest")]
use crate::transport::RestTransport;
use crate::{
    Client, Error,
    auth::Credentials,
    config::{ErrorEnvelopePolicy, PaginationConfig, TlsConfig, endpoints},
    resources::{ResourceCatalog, StaticCatalog},
    transport::HttpTransport,
};

/// Default request timeout of the REST transport.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker type: Credentials not yet provided.
pub struct NoCredentials;

/// Marker type: Credentials have been provided.
pub struct HasCredentials;

/// Builder for creating [`Client`] instances.
///
/// Uses the typestate pattern to ensure credentials are provided at
/// compile time.
///
/// ## Required Configuration
///
/// - `credentials()`: OAuth2 credentials with an access token
///
/// ## Optional Configuration
///
/// - `api_url()`: API base URL (default `https://api.outreach.io/api/v2`)
/// - `transport()`: Custom [`HttpTransport`] (default: reqwest)
/// - `catalog()`: Custom [`ResourceCatalog`] (default: bundled)
/// - `pagination()`: Default paging for `list()` calls
/// - `error_envelope_policy()`: Raise or return JSON:API error documents
/// - `timeout()` / `tls_config()`: Settings for the default transport
///
/// ## Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use outreach_sdk::{Client, Credentials, PaginationConfig};
///
/// # fn example() -> Result<(), outreach_sdk::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::load("credentials.json")?)
///     .pagination(PaginationConfig::default().with_size(100))
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder<CredentialsState> {
    api_url: String,
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn HttpTransport>>,
    catalog: Option<Arc<dyn ResourceCatalog>>,
    pagination: PaginationConfig,
    error_envelope_policy: ErrorEnvelopePolicy,
    tls_config: TlsConfig,
    timeout: Option<Duration>,
    _credentials_state: PhantomData<CredentialsState>,
}

impl ClientBuilder<NoCredentials> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            api_url: endpoints::API_URL.to_string(),
            credentials: None,
            transport: None,
            catalog: None,
            pagination: PaginationConfig::default(),
            error_envelope_policy: ErrorEnvelopePolicy::default(),
            tls_config: TlsConfig::default(),
            timeout: None,
            _credentials_state: PhantomData,
        }
    }

    /// Sets the OAuth2 credentials.
    ///
    /// Credentials are not refreshed by the client; refresh them first
    /// if [`Credentials::valid()`] is `false`.
    pub fn credentials(self, credentials: Credentials) -> ClientBuilder<HasCredentials> {
        ClientBuilder {
            api_url: self.api_url,
            credentials: Some(credentials),
            transport: self.transport,
            catalog: self.catalog,
            pagination: self.pagination,
            error_envelope_policy: self.error_envelope_policy,
            tls_config: self.tls_config,
            timeout: self.timeout,
            _credentials_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoCredentials> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ClientBuilder<C> {
    /// Sets the API base URL, e.g. to point at a local stand-in.
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the transport used for every request.
    ///
    /// When set, [`timeout()`](Self::timeout) and
    /// [`tls_config()`](Self::tls_config) are ignored.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the resource catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: Arc<dyn ResourceCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the default pagination for `list()` calls.
    #[must_use]
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets how JSON:API `errors` documents are surfaced.
    #[must_use]
    pub fn error_envelope_policy(mut self, policy: ErrorEnvelopePolicy) -> Self {
        self.error_envelope_policy = policy;
        self
    }

    /// Sets the TLS configuration of the default transport.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Sets the request timeout of the default transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl ClientBuilder<HasCredentials> {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API URL is invalid, the access
    /// token cannot be used as a header, the bundled catalog cannot be
    /// loaded, or no transport is available.
    pub fn build(self) -> Result<Client, Error> {
        let api_url = url::Url::parse(&self.api_url)?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "api url must be http or https, got '{}'",
                api_url.scheme()
            )));
        }
        let api_url = self.api_url.trim_end_matches('/').to_string();

        let credentials = self
            .credentials
            .ok_or_else(|| Error::configuration("credentials are required"))?;
        let headers = ClientInner::default_headers(&credentials)?;

        let catalog: Arc<dyn ResourceCatalog> = match self.catalog {
            Some(catalog) => catalog,
            None => StaticCatalog::bundled()?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Self::default_transport(&self.tls_config, self.timeout.unwrap_or(DEFAULT_TIMEOUT))?,
        };

        tracing::debug!(api_url = %api_url, "outreach client built");

        Ok(Client::from_inner(ClientInner {
            api_url,
            transport,
            catalog,
            pagination: self.pagination,
            error_envelope_policy: self.error_envelope_policy,
            headers: RwLock::new(headers),
            credentials: RwLock::new(credentials),
        }))
    }

    #[cfg(feature = "rest")]
    fn default_transport(tls_config: &TlsConfig, timeout: Duration) -> Result<Arc<dyn HttpTransport>, Error> {
        Ok(Arc::new(RestTransport::new(tls_config, timeout)?))
    }

    #[cfg(not(feature = "rest"))]
    fn default_transport(_tls_config: &TlsConfig, _timeout: Duration) -> Result<Arc<dyn HttpTransport>, Error> {
        Err(Error::configuration(
            "no transport configured and the 'rest' feature is not enabled",
        ))
    }
}
