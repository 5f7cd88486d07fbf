//! Testing utilities for the Outreach SDK.
//!
//! - [`MockTransport`]: an in-memory [`HttpTransport`](crate::transport::HttpTransport)
//!   that records every request and replays queued responses
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use outreach_sdk::testing::MockTransport;
//! use outreach_sdk::{Client, Credentials};
//!
//! # async fn example() -> Result<(), outreach_sdk::Error> {
//! let transport = Arc::new(MockTransport::new());
//! transport.push_json(200, serde_json::json!({"data": []}));
//!
//! let client = Client::builder()
//!     .credentials(Credentials::new().with_access_token("token"))
//!     .transport(transport.clone())
//!     .build()?;
//!
//! client.resource("prospects")?.list().await?;
//! assert_eq!(transport.request_count(), 1);
//! # Ok(())
//! # }
//! ```

mod mock_transport;

pub use mock_transport::MockTransport;
