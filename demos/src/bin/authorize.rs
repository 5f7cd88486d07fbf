//! Authorization-code flow demo.
//!
//! Prints the consent URL, reads the redirected URL from stdin, exchanges
//! the code and writes `credentials.json`.
//!
//! # Running
//!
//! ```bash
//! export OUTREACH_APP_ID="..."
//! export OUTREACH_APP_SECRET="..."
//! export OUTREACH_OAUTH_REDIRECT_URI="https://example.com/oauth/callback"
//!
//! cargo run -p outreach-sdk-demos --bin authorize
//! ```

use std::io::{self, BufRead, Write};

use outreach_sdk::{AuthorizationRequest, transport::RestTransport};

const CREDENTIALS_FILE: &str = "credentials.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let request = AuthorizationRequest::from_env()?.scopes(["prospects.all", "users.read"]);

    println!("Open this URL and approve access:\n\n  {}\n", request.authorize_url()?);
    print!("Paste the URL you were redirected to: ");
    io::stdout().flush()?;

    let mut redirected = String::new();
    io::stdin().lock().read_line(&mut redirected)?;
    let code = AuthorizationRequest::code_from_redirect(redirected.trim())?;

    let transport = RestTransport::builder().build()?;
    let credentials = request.exchange_code(&transport, &code).await?;

    // App settings come from the environment, so only tokens are stored
    credentials.save(CREDENTIALS_FILE, &["client_id", "client_secret", "redirect_uri"])?;
    println!("Saved {CREDENTIALS_FILE}");

    Ok(())
}
