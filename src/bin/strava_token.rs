//! One-time Strava setup: exchange an authorization code for a refresh token.
//!
//! Authorize the app in a browser, copy the `code` query parameter from the
//! redirect, then run:
//!
//! ```bash
//! strava-token --client-id 12345 --client-secret ... --code ...
//! ```
//!
//! The code is single-use, so run this once per code. The printed line goes
//! into the service's environment as `STRAVA_REFRESH_TOKEN`.

use anyhow::{Context, Result};
use clap::Parser;
use coach_backend::config::DEFAULT_STRAVA_TOKEN_URL;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Progress lines are shown unless `RUST_LOG` says otherwise.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser)]
#[command(name = "strava-token")]
#[command(about = "Exchange a Strava authorization code for a refresh token")]
struct Cli {
    /// OAuth2 client ID
    #[arg(long, env = "STRAVA_CLIENT_ID")]
    client_id: String,

    /// OAuth2 client secret
    #[arg(long, env = "STRAVA_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Authorization code from the OAuth redirect
    #[arg(long, env = "STRAVA_AUTH_CODE")]
    code: String,

    /// Token endpoint
    #[arg(long, env = "STRAVA_TOKEN_URL", default_value = DEFAULT_STRAVA_TOKEN_URL)]
    token_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    info!("Exchanging code for tokens...");

    let params = [
        ("client_id", cli.client_id.as_str()),
        ("client_secret", cli.client_secret.as_str()),
        ("code", cli.code.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let response = reqwest::Client::new()
        .post(&cli.token_url)
        .form(&params)
        .send()
        .await
        .context("Failed to send token exchange request")?;

    let data: Value = response
        .json()
        .await
        .context("Failed to parse token exchange response")?;

    match refresh_token_line(&data) {
        Some(line) => {
            println!("\nSUCCESS! Copy this into your environment:");
            println!("{}", line);
        }
        None => println!("\nError: {}", data),
    }

    Ok(())
}

/// `STRAVA_REFRESH_TOKEN="..."` if the response carries a refresh token.
fn refresh_token_line(data: &Value) -> Option<String> {
    data.get("refresh_token")
        .and_then(Value::as_str)
        .map(|token| format!("STRAVA_REFRESH_TOKEN=\"{}\"", token))
}
