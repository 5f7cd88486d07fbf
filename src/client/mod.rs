//! Client types for connecting to the Outreach API.
//!
//! - [`Client`]: holds the transport, catalog and authenticated headers
//! - [`ApiResource`](crate::ApiResource): one resource (`prospects`,
//!   `accounts`, ...) bound to a client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outreach_sdk::prelude::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let client = Client::builder()
//!     .credentials(Credentials::load("credentials.json")?)
//!     .build()?;
//!
//! let prospects = client.resource("prospects")?;
//! let johns = prospects.list().filter("firstName", "John").await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod inner;

pub use builder::{ClientBuilder, HasCredentials, NoCredentials};

use std::sync::Arc;

use crate::{
    Error,
    auth::Credentials,
    config::{ErrorEnvelopePolicy, PaginationConfig},
    resources::{ApiResource, ResourceCatalog},
};

pub(crate) use inner::ClientInner;

/// The Outreach SDK client.
///
/// Create a client with [`Client::builder()`], then obtain resource handles
/// with [`resource()`](Client::resource).
///
/// ## Thread Safety
///
/// `Client` is `Clone`, `Send` and `Sync`; clones share one transport and
/// one set of credentials.
///
/// ## Credentials
///
/// The client never refreshes on its own. Either refresh before building,
/// or call [`refresh_credentials()`](Client::refresh_credentials) and
/// persist what it returns.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder<NoCredentials> {
        ClientBuilder::new()
    }

    /// Returns a handle for the named catalog resource.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::ResourceNotSupported`](crate::ErrorKind::ResourceNotSupported)
    /// if the resource, or a resource it relates to, is not in the catalog.
    pub fn resource(&self, name: &str) -> Result<ApiResource, Error> {
        ApiResource::new(self.clone(), name)
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &str {
        &self.inner.api_url
    }

    /// Returns the default pagination for `list()` calls.
    pub fn pagination(&self) -> PaginationConfig {
        self.inner.pagination
    }

    /// Returns how JSON:API error documents are surfaced.
    pub fn error_envelope_policy(&self) -> ErrorEnvelopePolicy {
        self.inner.error_envelope_policy
    }

    /// Returns a copy of the current credentials.
    pub fn credentials(&self) -> Credentials {
        self.inner.credentials.read().clone()
    }

    /// Replaces the credentials used for subsequent requests.
    pub fn set_credentials(&self, credentials: Credentials) -> Result<(), Error> {
        self.inner.set_credentials(credentials)
    }

    /// Refreshes the current credentials through the client's transport,
    /// applies them, and returns them for persistence.
    ///
    /// Concurrent refreshes on clones of one client are not coordinated.
    pub async fn refresh_credentials(&self) -> Result<Credentials, Error> {
        let mut credentials = self.credentials();
        credentials.refresh(self.inner.transport.as_ref()).await?;
        self.set_credentials(credentials.clone())?;
        Ok(credentials)
    }

    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }

    pub(crate) fn catalog(&self) -> &dyn ResourceCatalog {
        self.inner.catalog.as_ref()
    }

    pub(crate) fn from_inner(inner: ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.inner.api_url)
            .finish_non_exhaustive()
    }
}
