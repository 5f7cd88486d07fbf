//! Lists prospects, refreshing stored credentials first if they expired.
//!
//! # Running
//!
//! ```bash
//! # credentials.json from the `authorize` demo
//! export OUTREACH_APP_ID="..."
//! export OUTREACH_APP_SECRET="..."
//! export OUTREACH_OAUTH_REDIRECT_URI="https://example.com/oauth/callback"
//!
//! RUST_LOG=outreach_sdk=debug cargo run -p outreach-sdk-demos --bin list_prospects
//! ```

use outreach_sdk::prelude::*;

const CREDENTIALS_FILE: &str = "credentials.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let credentials = Credentials::load(CREDENTIALS_FILE)?;
    let client = Client::builder().credentials(credentials.clone()).build()?;

    if credentials.expired() {
        let refreshed = client.refresh_credentials().await?;
        refreshed.save(CREDENTIALS_FILE, &["client_id", "client_secret", "redirect_uri"])?;
        println!("Refreshed access token");
    }

    let prospects = client.resource("prospects")?;
    let page = prospects
        .list()
        .filter("createdAt", "2020-01-01..inf")
        .sort(["-updatedAt", "lastName"])
        .pagination(PaginationConfig::default().with_size(25).with_count(true))
        .await?;

    if let Some(total) = page.meta().and_then(|meta| meta.get("count")) {
        println!("{total} prospects");
    }
    for prospect in page.data().and_then(|data| data.as_array()).into_iter().flatten() {
        let attributes = &prospect["attributes"];
        println!(
            "{:>8}  {} {}",
            prospect["id"],
            attributes["firstName"].as_str().unwrap_or("-"),
            attributes["lastName"].as_str().unwrap_or("-"),
        );
    }

    let first = prospects
        .get(1)
        .include(["owner"])
        .fields(["firstName", "owner.email"])
        .await?;
    println!("{}", serde_json::to_string_pretty(first.document())?);

    Ok(())
}
