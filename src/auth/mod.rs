//! OAuth2 authentication for the Outreach SDK.
//!
//! This module provides:
//!
//! - [`Credentials`]: access/refresh token state, expiry checks and refresh
//! - [`AuthorizationRequest`]: the authorization-code grant that issues the
//!   first set of credentials
//!
//! ## Existing Credentials
//!
//! The usual workflow loads stored tokens, refreshes them when needed and
//! writes them back, keeping app secrets in the environment:
//!
//! ```rust,no_run
//! use outreach_sdk::Credentials;
//! use outreach_sdk::transport::RestTransport;
//!
//! # async fn example() -> Result<(), outreach_sdk::Error> {
//! let mut credentials = Credentials::load("credentials.json")?;
//! if !credentials.valid() {
//!     let transport = RestTransport::builder().build()?;
//!     credentials.refresh(&transport).await?;
//!     credentials.save("credentials.json", &["client_id", "client_secret", "redirect_uri"])?;
//! }
//! # Ok(())
//! # }
//! ```

mod authorization;
mod credentials;
mod token;

pub use authorization::AuthorizationRequest;
pub use credentials::{Credentials, TOKEN_EXPIRY_GRACE_PERIOD_SECS};
