//! Transport layer for Outreach API communication.
//!
//! This module provides the HTTP abstraction the SDK is written against and
//! its default implementation:
//!
//! - [`HttpTransport`]: one request in, one response out, never retried
//! - [`RestTransport`] (via reqwest): the production transport
//!
//! An in-memory recording transport for tests lives in
//! [`testing`](crate::testing).
//!
//! ## Feature Flags
//!
//! - `rest` (default): Enable the reqwest transport

pub(crate) mod traits;

#[cfg(feature = "rest")]
pub(crate) mod rest;

pub use traits::{HttpRequest, HttpResponse, HttpTransport, Method};

#[cfg(feature = "rest")]
pub use rest::{RestTransport, RestTransportBuilder};
