//! OAuth2 credentials for the Outreach API.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use super::token::{request_token, unix_seconds};
use crate::config::endpoints;
use crate::transport::{HttpRequest, HttpTransport, Method};
use crate::{Error, Result};

/// Seconds before the real expiry at which a token is treated as expired.
pub const TOKEN_EXPIRY_GRACE_PERIOD_SECS: i64 = 5 * 60;

/// Raised when [`Credentials::refresh`] lacks a required field.
const REFRESH_REQUIRED: &str = "These credentials do not contain the necessary fields needed to \
     refresh the access token. You must specify client_id, client_secret, redirect_uri, and \
     refresh_token.";

/// OAuth2 access and refresh token state for an Outreach app.
///
/// Credentials never refresh themselves: check [`valid()`](Self::valid) and
/// call [`refresh()`](Self::refresh) before handing them to a
/// [`Client`](crate::Client).
///
/// ## Persistence
///
/// The persisted form is a flat JSON object of the non-null fields. Keys
/// stripped on save (typically the app's id, secret and redirect URI, which
/// live in the environment) are filled back in from defaults on load:
///
/// ```rust
/// use outreach_sdk::Credentials;
///
/// let creds = Credentials::new()
///     .with_client_id("app")
///     .with_access_token("token")
///     .with_expires_at(1_600_000_000);
///
/// let stored = creds.to_json(&["client_id"]);
/// assert!(!stored.contains("client_id"));
///
/// let defaults = Credentials::new().with_client_id("app");
/// let restored = Credentials::from_json_with_defaults(&stored, &defaults).unwrap();
/// assert_eq!(restored, creds);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_timestamp"
    )]
    expires_at: Option<i64>,

    #[serde(skip)]
    token_url: Option<String>,
}

impl Credentials {
    /// Creates empty credentials with no environment defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates credentials whose app id, secret and redirect URI come from
    /// `OUTREACH_APP_ID`, `OUTREACH_APP_SECRET` and
    /// `OUTREACH_OAUTH_REDIRECT_URI`, when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env()`](Self::from_env), reading variables through `lookup`.
    ///
    /// ```rust
    /// use outreach_sdk::Credentials;
    ///
    /// let creds = Credentials::from_lookup(|key| match key {
    ///     "OUTREACH_APP_ID" => Some("app".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(creds.client_id(), Some("app"));
    /// assert!(creds.client_secret().is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            client_id: lookup(endpoints::ENV_APP_ID),
            client_secret: lookup(endpoints::ENV_APP_SECRET),
            redirect_uri: lookup(endpoints::ENV_OAUTH_REDIRECT_URI),
            ..Self::default()
        }
    }

    /// Sets the app's client ID.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the app's client secret.
    #[must_use]
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the redirect URI used for the original authorization grant.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiry as a unix timestamp in seconds.
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Overrides the token endpoint. Not persisted.
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// The app's client ID.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// The app's client secret.
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// The redirect URI of the original authorization grant.
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// The access token.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The refresh token.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Expiry as a unix timestamp in seconds.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// The token endpoint used by [`refresh()`](Self::refresh).
    pub fn token_url(&self) -> &str {
        self.token_url.as_deref().unwrap_or(endpoints::TOKEN_URL)
    }

    /// Returns `true` if the token is within the grace period of its expiry
    /// or past it. Unknown expiry is never expired.
    pub fn expired(&self) -> bool {
        self.expired_at(Utc::now())
    }

    /// [`expired()`](Self::expired) evaluated at `now`.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => {
                now.timestamp() >= expires_at.saturating_sub(TOKEN_EXPIRY_GRACE_PERIOD_SECS)
            }
        }
    }

    /// Returns `true` if an access token is present and not expired.
    pub fn valid(&self) -> bool {
        self.valid_at(Utc::now())
    }

    /// [`valid()`](Self::valid) evaluated at `now`.
    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_some() && !self.expired_at(now)
    }

    /// Inserts `Authorization: Bearer <access_token>` into `headers`.
    ///
    /// Validity is not checked. Without an access token the headers are left
    /// untouched.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        if let Some(ref token) = self.access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                Error::configuration("access token is not a valid header value").with_source(e)
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Requires `client_id`, `client_secret`, `redirect_uri` and
    /// `refresh_token`; without them this fails with
    /// [`ErrorKind::Credential`](crate::ErrorKind::Credential) and sends
    /// nothing. A non-success response fails with
    /// [`ErrorKind::Http`](crate::ErrorKind::Http). On success the access
    /// token, refresh token and expiry are replaced in place.
    pub async fn refresh<T>(&mut self, transport: &T) -> Result<()>
    where
        T: HttpTransport + ?Sized,
    {
        let (Some(client_id), Some(client_secret), Some(redirect_uri), Some(refresh_token)) = (
            non_empty(&self.client_id),
            non_empty(&self.client_secret),
            non_empty(&self.redirect_uri),
            non_empty(&self.refresh_token),
        ) else {
            return Err(Error::credential(REFRESH_REQUIRED));
        };

        let body = serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "redirect_uri": redirect_uri,
            "refresh_token": refresh_token,
            "grant_type": "refresh_token",
        });

        tracing::debug!(token_url = %self.token_url(), "refreshing access token");
        let request = HttpRequest::new(Method::Post, self.token_url()).with_json(body);
        let token = request_token(transport, request).await?;
        let expires_at = token.expires_at()?;

        self.access_token = token.access_token;
        self.refresh_token = token.refresh_token;
        self.expires_at = Some(expires_at);

        tracing::debug!(expires_at, "access token refreshed");
        Ok(())
    }

    /// Returns the non-null fields as a flat map, minus any key in `strip`.
    pub fn to_map(&self, strip: &[&str]) -> Map<String, Value> {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.retain(|key, _| !strip.contains(&key.as_str()));
        map
    }

    /// Serializes [`to_map()`](Self::to_map) as a JSON string.
    pub fn to_json(&self, strip: &[&str]) -> String {
        Value::Object(self.to_map(strip)).to_string()
    }

    /// Rebuilds credentials from a flat map, taking any key absent (or null)
    /// in `map` from `defaults`.
    ///
    /// `expires_at` may be an integer or a float timestamp.
    pub fn from_map_with_defaults(map: &Map<String, Value>, defaults: &Credentials) -> Result<Self> {
        let parsed: Credentials = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| Error::configuration(format!("invalid credentials: {e}")).with_source(e))?;
        Ok(parsed.or(defaults))
    }

    /// Parses a persisted JSON object, see
    /// [`from_map_with_defaults()`](Self::from_map_with_defaults).
    pub fn from_json_with_defaults(json: &str, defaults: &Credentials) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("invalid credentials: {e}")).with_source(e))?;
        match value {
            Value::Object(map) => Self::from_map_with_defaults(&map, defaults),
            _ => Err(Error::configuration(
                "invalid credentials: expected a JSON object",
            )),
        }
    }

    /// Parses a persisted JSON object using [`from_env()`](Self::from_env)
    /// for the missing keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_defaults(json, &Self::from_env())
    }

    /// Reads credentials from a JSON file, with environment defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Writes credentials to a JSON file, omitting the keys in `strip`.
    pub fn save(&self, path: impl AsRef<Path>, strip: &[&str]) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json(strip))?;
        Ok(())
    }

    fn or(self, defaults: &Credentials) -> Self {
        Self {
            client_id: self.client_id.or_else(|| defaults.client_id.clone()),
            client_secret: self.client_secret.or_else(|| defaults.client_secret.clone()),
            redirect_uri: self.redirect_uri.or_else(|| defaults.redirect_uri.clone()),
            access_token: self.access_token.or_else(|| defaults.access_token.clone()),
            refresh_token: self.refresh_token.or_else(|| defaults.refresh_token.clone()),
            expires_at: self.expires_at.or(defaults.expires_at),
            token_url: self.token_url.or_else(|| defaults.token_url.clone()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "[REDACTED]")
        }

        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("redirect_uri", &self.redirect_uri)
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Unset and empty fields both count as missing.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(number) => unix_seconds(&number)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expires_at is not a unix timestamp")),
    }
}
