//! Fixed Outreach endpoints and environment variable names.

/// Base URL of the Outreach REST API.
pub const API_URL: &str = "https://api.outreach.io/api/v2";

/// OAuth2 token endpoint, used for refresh and code exchange.
pub const TOKEN_URL: &str = "https://api.outreach.io/oauth/token";

/// OAuth2 authorization endpoint a user is sent to in a browser.
pub const AUTHORIZE_URL: &str = "https://api.outreach.io/oauth/authorize";

/// Environment variable holding the Outreach app's client ID.
pub const ENV_APP_ID: &str = "OUTREACH_APP_ID";

/// Environment variable holding the Outreach app's client secret.
pub const ENV_APP_SECRET: &str = "OUTREACH_APP_SECRET";

/// Environment variable holding the app's registered OAuth redirect URI.
pub const ENV_OAUTH_REDIRECT_URI: &str = "OUTREACH_OAUTH_REDIRECT_URI";

/// Media type of every JSON:API request body.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";
