//! Configuration types for the Outreach SDK.
//!
//! This module provides configuration options for:
//! - [`endpoints`]: Fixed Outreach URLs and environment variable names
//! - [`PaginationConfig`]: Default paging for `list()` calls
//! - [`TlsConfig`]: TLS settings for the REST transport
//! - [`ErrorEnvelopePolicy`]: What to do with a JSON:API `errors` document

pub mod endpoints;
mod pagination;
mod tls;

pub use pagination::{MAX_PAGE_LIMIT, PaginationConfig};
pub use tls::TlsConfig;

/// How the SDK treats a response body that carries a JSON:API `errors` list.
///
/// ```rust
/// use outreach_sdk::ErrorEnvelopePolicy;
///
/// assert_eq!(ErrorEnvelopePolicy::default(), ErrorEnvelopePolicy::Raise);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorEnvelopePolicy {
    /// Fail with [`ErrorKind::Api`](crate::ErrorKind::Api) carrying the first error.
    #[default]
    Raise,
    /// Hand the error document back to the caller as an
    /// [`Envelope`](crate::Envelope); check [`Envelope::errors`](crate::Envelope::errors).
    Return,
}
