//! Main error type for the Outreach SDK.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::{ApiError, ErrorKind};

/// The primary error type for Outreach SDK operations.
///
/// `Error` provides enough context to decide what to do next:
/// - [`kind()`](Error::kind): Categorization for `match` statements
/// - [`status()`](Error::status): HTTP status, when a response was received
/// - [`api_error()`](Error::api_error): Vendor error document, for `ErrorKind::Api`
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── status: Option           (HTTP status code)
/// ├── api_error: Option        (first entry of a JSON:API errors list)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use outreach_sdk::{Error, ErrorKind};
///
/// fn handle_error(err: Error) {
///     match err.kind() {
///         ErrorKind::Api => {
///             if let Some(api) = err.api_error() {
///                 eprintln!("{api}");
///             }
///         }
///         ErrorKind::Credential => {
///             eprintln!("cannot refresh: {err}");
///         }
///         kind if kind.is_query_parameter() => {
///             eprintln!("bad query: {err}");
///         }
///         _ => eprintln!("request failed: {err}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// HTTP status code, if a response was received.
    status: Option<u16>,

    /// Vendor error document, for `ErrorKind::Api`.
    api_error: Option<ApiError>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use outreach_sdk::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Configuration, "api url cannot be empty");
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            api_error: None,
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, if a response was received.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the vendor error document for `ErrorKind::Api` errors.
    #[inline]
    pub fn api_error(&self) -> Option<&ApiError> {
        self.api_error.as_ref()
    }

    /// Sets the HTTP status code for this error.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a credential error (refresh preconditions unmet).
    pub fn credential(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Credential, message)
    }

    /// Creates an invalid filter parameter error naming the offending field.
    pub fn invalid_filter(field: &str) -> Self {
        Self::new(
            ErrorKind::InvalidFilterParameter,
            format!("'{field}' field is not filterable."),
        )
    }

    /// Creates an invalid sort parameter error naming the offending field.
    pub fn invalid_sort(field: &str) -> Self {
        Self::new(
            ErrorKind::InvalidSortParameter,
            format!("'{field}' field is not sortable."),
        )
    }

    /// Creates a missing relationship error.
    pub fn no_related_resource(resource_type: &str, relationship: &str) -> Self {
        Self::new(
            ErrorKind::NoRelatedResource,
            format!("Resource '{resource_type}' does not have relationship '{relationship}'."),
        )
    }

    /// Creates an error for a sparse fieldset on a relationship that was not included.
    pub fn related_resource_not_included() -> Self {
        Self::new(
            ErrorKind::RelatedResourceNotIncluded,
            "To request fields for a related resource it must also be included.",
        )
    }

    /// Creates an unknown resource error.
    pub fn resource_not_supported(name: &str) -> Self {
        Self::new(
            ErrorKind::ResourceNotSupported,
            format!("The resource '{name}' is not currently supported or doesn't exist."),
        )
    }

    /// Creates an API error from a vendor error document.
    pub fn api(api_error: ApiError) -> Self {
        Self {
            kind: ErrorKind::Api,
            message: Cow::Owned(api_error.to_string()),
            status: Some(api_error.status()),
            api_error: Some(api_error),
            source: None,
        }
    }

    /// Creates an HTTP error for a non-success status.
    pub fn http(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        Self::new(ErrorKind::Http, message).with_status(status)
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(ref api_error) = self.api_error {
            return Some(api_error);
        }
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string()).with_source(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}
