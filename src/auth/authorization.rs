//! Authorization-code grant: authorize URL, redirect parsing, code exchange.

use url::Url;

use super::token::request_token;
use super::Credentials;
use crate::config::endpoints;
use crate::transport::{HttpRequest, HttpTransport, Method};
use crate::{Error, Result};

/// The first leg of the OAuth2 authorization-code flow.
///
/// A user opens [`authorize_url()`](Self::authorize_url) in a browser,
/// approves access, and is redirected to the app's redirect URI with a
/// `code` query parameter. [`exchange_code()`](Self::exchange_code) trades
/// that code for [`Credentials`].
///
/// ```rust
/// use outreach_sdk::AuthorizationRequest;
///
/// let request = AuthorizationRequest::new("app-id", "app-secret", "https://app.example/callback")
///     .scope("prospects.read")
///     .scope("accounts.all");
///
/// let url = request.authorize_url().unwrap();
/// assert!(url.as_str().starts_with("https://api.outreach.io/oauth/authorize?"));
///
/// let code = AuthorizationRequest::code_from_redirect(
///     "https://app.example/callback?code=abc123",
/// ).unwrap();
/// assert_eq!(code, "abc123");
/// ```
#[derive(Clone)]
pub struct AuthorizationRequest {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Vec<String>,
    authorize_url: String,
    token_url: String,
}

impl AuthorizationRequest {
    /// Creates a request for the given app.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: Vec::new(),
            authorize_url: endpoints::AUTHORIZE_URL.to_string(),
            token_url: endpoints::TOKEN_URL.to_string(),
        }
    }

    /// Creates a request from `OUTREACH_APP_ID`, `OUTREACH_APP_SECRET` and
    /// `OUTREACH_OAUTH_REDIRECT_URI`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env()`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::configuration(format!("environment variable {key} not set")))
        };
        Ok(Self::new(
            require(endpoints::ENV_APP_ID)?,
            require(endpoints::ENV_APP_SECRET)?,
            require(endpoints::ENV_OAUTH_REDIRECT_URI)?,
        ))
    }

    /// Adds a scope, e.g. `prospects.read`.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds several scopes.
    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Overrides the authorization endpoint.
    #[must_use]
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// Overrides the token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// The requested scopes.
    pub fn requested_scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Builds the URL the user must visit to grant access.
    pub fn authorize_url(&self) -> Result<Url> {
        let scope = self.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.authorize_url,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Extracts the `code` query parameter from the URL the user was
    /// redirected to.
    pub fn code_from_redirect(redirected: &str) -> Result<String> {
        let url = Url::parse(redirected.trim())?;
        url.query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, code)| code.into_owned())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| Error::credential("redirect URL does not contain an authorization code"))
    }

    /// Exchanges an authorization code for credentials.
    ///
    /// The grant is posted form-encoded, as the token endpoint expects for
    /// `grant_type=authorization_code`.
    ///
    /// A non-success response fails with
    /// [`ErrorKind::Http`](crate::ErrorKind::Http).
    pub async fn exchange_code<T>(&self, transport: &T, code: &str) -> Result<Credentials>
    where
        T: HttpTransport + ?Sized,
    {
        let form = vec![
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
            ("redirect_uri".to_string(), self.redirect_uri.clone()),
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
        ];
        let request = HttpRequest::new(Method::Post, &self.token_url).with_form(form);

        tracing::debug!(token_url = %self.token_url, "exchanging authorization code");
        let token = request_token(transport, request).await?;
        let expires_at = token.expires_at()?;

        let mut credentials = Credentials::new()
            .with_client_id(self.client_id.clone())
            .with_client_secret(self.client_secret.clone())
            .with_redirect_uri(self.redirect_uri.clone())
            .with_expires_at(expires_at);
        if self.token_url != endpoints::TOKEN_URL {
            credentials = credentials.with_token_url(self.token_url.clone());
        }
        if let Some(access_token) = token.access_token {
            credentials = credentials.with_access_token(access_token);
        }
        if let Some(refresh_token) = token.refresh_token {
            credentials = credentials.with_refresh_token(refresh_token);
        }
        Ok(credentials)
    }
}

impl std::fmt::Debug for AuthorizationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
