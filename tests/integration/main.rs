//! Integration tests for the Outreach Rust SDK.
//!
//! These tests drive the real reqwest transport against a local
//! [`wiremock`] server standing in for `api.outreach.io`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # Run with request logs
//! RUST_LOG=outreach_sdk=debug cargo test --test integration -- --nocapture
//! ```

mod common;
mod credentials_tests;
mod resource_tests;
