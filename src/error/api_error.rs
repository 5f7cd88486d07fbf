//! ApiError type for vendor-reported application errors.

use std::error::Error as StdError;
use std::fmt;

use serde::Deserialize;

/// Error reported by the Outreach API in a JSON:API `errors` document.
///
/// This is raised after the HTTP exchange itself succeeded: the server
/// answered, but the answer is an error document rather than data.
///
/// ```json
/// {
///   "errors": [
///     {
///       "id": "unauthorizedRequest",
///       "title": "Unauthorized Request",
///       "detail": "You are not authorized to perform that request."
///     }
///   ]
/// }
/// ```
///
/// Only the first entry of the `errors` list is kept.
///
/// ## Display Format
///
/// ```rust
/// use outreach_sdk::ApiError;
///
/// let err = ApiError::new(403, "Unauthorized Request", "You are not authorized to perform that request.");
/// assert_eq!(
///     err.to_string(),
///     "403 Unauthorized Request\ndetail: You are not authorized to perform that request."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: u16,
    id: Option<String>,
    title: String,
    detail: String,
}

/// A single entry of a JSON:API `errors` list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorObject {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: u16, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status,
            id: None,
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Builds an API error from the first entry of an `errors` list.
    ///
    /// Missing titles and details become empty strings.
    pub(crate) fn from_error_object(status: u16, object: ErrorObject) -> Self {
        Self {
            status,
            id: object.id,
            title: object.title.unwrap_or_default(),
            detail: object.detail.unwrap_or_default(),
        }
    }

    /// Returns the HTTP status code of the response.
    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the vendor error identifier (e.g. `unauthorizedRequest`), if any.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the error title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the error detail.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}\ndetail: {}", self.status, self.title, self.detail)
    }
}

impl StdError for ApiError {}

impl From<ApiError> for super::Error {
    fn from(api_error: ApiError) -> Self {
        super::Error::api(api_error)
    }
}
