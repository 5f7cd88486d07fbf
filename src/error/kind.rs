//! Error kind enumeration for categorizing SDK errors.

/// Categorization of SDK errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// ## Where Errors Come From
///
/// | ErrorKind                    | Raised                      | Network call made |
/// |------------------------------|-----------------------------|-------------------|
/// | `Credential`                 | `Credentials::refresh()`    | No                |
/// | `InvalidFilterParameter`     | `list()` filter validation  | No                |
/// | `InvalidSortParameter`       | `list()` sort validation    | No                |
/// | `NoRelatedResource`          | `get()` include validation  | No                |
/// | `RelatedResourceNotIncluded` | `get()` fields validation   | No                |
/// | `ResourceNotSupported`       | `Client::resource()`        | No                |
/// | `Api`                        | response normalization      | Yes               |
/// | `Http`                       | non-2xx without an envelope | Yes               |
///
/// The SDK never retries. Every error is surfaced to the caller as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Credentials lack the fields required to refresh the access token.
    #[error("credential error")]
    Credential,

    /// A filter names an attribute that is not filterable.
    #[error("invalid filter parameter")]
    InvalidFilterParameter,

    /// A sort names an attribute that is not sortable.
    #[error("invalid sort parameter")]
    InvalidSortParameter,

    /// An include names a relationship the resource does not have.
    #[error("no related resource")]
    NoRelatedResource,

    /// A sparse fieldset names a related resource that was not included.
    #[error("related resource not included")]
    RelatedResourceNotIncluded,

    /// The resource name is not in the catalog.
    #[error("resource not supported")]
    ResourceNotSupported,

    /// The API answered with a JSON:API `errors` document.
    ///
    /// Use [`Error::api_error()`](crate::Error::api_error) for the status,
    /// title and detail.
    #[error("api error")]
    Api,

    /// The server answered with a non-success status and no error document.
    ///
    /// Use [`Error::status()`](crate::Error::status) for the status code.
    #[error("http error")]
    Http,

    /// Connection error (DNS, TLS handshake, network unreachable).
    #[error("connection error")]
    Connection,

    /// Request timed out.
    #[error("timeout")]
    Timeout,

    /// Transport layer error that fits no more specific category.
    #[error("transport error")]
    Transport,

    /// Response body could not be parsed.
    #[error("invalid response")]
    InvalidResponse,

    /// Configuration error (invalid URL, bad header value, bad catalog).
    #[error("configuration error")]
    Configuration,

    /// Local I/O failure, e.g. while persisting credentials.
    #[error("i/o error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` for filter and sort validation failures.
    ///
    /// Both are specializations of a query-parameter error.
    ///
    /// ```rust
    /// use outreach_sdk::ErrorKind;
    ///
    /// assert!(ErrorKind::InvalidFilterParameter.is_query_parameter());
    /// assert!(ErrorKind::InvalidSortParameter.is_query_parameter());
    /// assert!(!ErrorKind::Api.is_query_parameter());
    /// ```
    #[inline]
    pub fn is_query_parameter(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidFilterParameter | ErrorKind::InvalidSortParameter
        )
    }

    /// Returns `true` for include/fieldset relationship mismatches.
    #[inline]
    pub fn is_related_resource(&self) -> bool {
        matches!(
            self,
            ErrorKind::NoRelatedResource | ErrorKind::RelatedResourceNotIncluded
        )
    }

    /// Returns `true` if this error is raised before any network call.
    #[inline]
    pub fn is_client_side(&self) -> bool {
        self.is_query_parameter()
            || self.is_related_resource()
            || matches!(
                self,
                ErrorKind::Credential | ErrorKind::ResourceNotSupported | ErrorKind::Configuration
            )
    }
}
