//! Prelude module for convenient imports.
//!
//! ```rust
//! use outreach_sdk::prelude::*;
//! ```
//!
//! This provides access to:
//! - Client and resource types
//! - Error types
//! - Credentials and the authorization flow
//! - Query building types

pub use crate::{
    auth::{AuthorizationRequest, Credentials},
    client::{Client, ClientBuilder},
    config::{ErrorEnvelopePolicy, PaginationConfig, TlsConfig},
    error::{ApiError, Error, ErrorKind, Result},
    resources::{ApiResource, Envelope, FilterValue, SortSpec},
};
