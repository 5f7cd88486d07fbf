//! The `User-Agent` sent with every request, token exchanges included.

use std::sync::OnceLock;

/// Product token, followed by the crate version.
const PRODUCT: &str = "Outreach SDK Rust";

/// Returns `Outreach SDK Rust/<version> (<os>; <arch>)`, built once.
pub fn user_agent() -> &'static str {
    static USER_AGENT: OnceLock<String> = OnceLock::new();
    USER_AGENT.get_or_init(|| {
        render(
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    })
}

fn render(version: &str, os: &str, arch: &str) -> String {
    format!("{PRODUCT}/{version} ({os}; {arch})")
}
