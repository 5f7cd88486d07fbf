//! Error types for the Outreach SDK.
//!
//! The SDK provides two error types:
//! - [`Error`]: Every failure the SDK can return, categorized by [`ErrorKind`]
//! - [`ApiError`]: The vendor's JSON:API error document (status, title, detail)
//!
//! ## Fail Fast
//!
//! Filter, sort, include and fieldset problems are detected locally, before
//! any request leaves the process:
//!
//! ```rust,ignore
//! let err = prospects.list().filter("fiirstName", "John").await.unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidFilterParameter);
//! ```

mod api_error;
#[allow(clippy::module_inception)]
mod error;
mod kind;

pub use api_error::ApiError;
pub(crate) use api_error::ErrorObject;
pub use error::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for Outreach SDK operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
