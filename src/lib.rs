//! # Outreach Rust SDK
//!
//! Client for the [Outreach](https://www.outreach.io) REST API (JSON:API,
//! version 2).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outreach_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), outreach_sdk::Error> {
//!     // Load stored credentials, filling app settings from the environment
//!     let mut credentials = Credentials::load("credentials.json")?;
//!     let client = Client::builder().credentials(credentials.clone()).build()?;
//!
//!     if credentials.expired() {
//!         credentials = client.refresh_credentials().await?;
//!         credentials.save("credentials.json", &[])?;
//!     }
//!
//!     let prospects = client.resource("prospects")?;
//!     let page = prospects
//!         .list()
//!         .filter("emailAddresses__email", "email@example.com")
//!         .sort("-updatedAt")
//!         .await?;
//!     println!("{:?}", page.data());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Credentials**: OAuth2 app settings plus the token pair; refreshing is
//!   explicit and persistence is the caller's job
//! - **Resources**: `client.resource("prospects")` validates filters, sorts,
//!   includes and fieldsets locally, before any request is sent
//! - **Envelopes**: responses are returned as the raw JSON:API document
//!
//! ## Features
//!
//! - `rest` (default): Enable the reqwest transport
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod resources;

// Transport layer
pub mod transport;

// Testing utilities
pub mod testing;

mod user_agent;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use client::{Client, ClientBuilder};
pub use error::{ApiError, Error, ErrorKind, Result};

// Re-export auth types
pub use auth::{AuthorizationRequest, Credentials};

// Re-export config types
pub use config::{ErrorEnvelopePolicy, PaginationConfig, TlsConfig};

// Re-export resource types
pub use resources::{
    ApiResource, Envelope, FilterValue, GetRequest, ListRequest, ResourceCatalog, ResourceSchema,
    SortSpec, StaticCatalog,
};
