//! Recent activity summary from Strava.
//!
//! Each call swaps the configured refresh token for a fresh access token and
//! reads the latest [`ACTIVITY_WINDOW`] activities. Nothing is cached between
//! calls and the refresh token is never rotated.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolError, ToolId};
use crate::config::StravaConfig;

/// Number of most recent activities fetched. Enough to answer "last Monday".
pub const ACTIVITY_WINDOW: u32 = 30;

pub const STRAVA_KEYS_MISSING: &str = "Error: Strava keys missing.";
pub const TOKEN_REFRESH_FAILED: &str = "Error: Could not refresh Strava token.";
pub const NO_RUNS_FOUND: &str = "No runs found in the last 30 activities.";
pub const ACTIVITIES_API_ERROR: &str = "No runs found (API Error).";

/// The tool takes no arguments; anything the model sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StravaArgs {}

/// The fields of a Strava activity the summary uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySummary {
    /// Meters
    #[serde(default)]
    pub distance: f64,

    #[serde(default = "unknown_date")]
    pub start_date: String,

    #[serde(default = "default_name")]
    pub name: String,
}

fn unknown_date() -> String {
    "Unknown".to_string()
}

fn default_name() -> String {
    "Run".to_string()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// Kilometers rounded to two decimals, always with a fractional part
/// (`5000.0` -> `"5.0"`, `8046.7` -> `"8.05"`).
pub fn format_km(meters: f64) -> String {
    // Round the exact double, not a rescaled copy of it.
    let fixed = format!("{:.2}", meters / 1000.0);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn format_activity(activity: &ActivitySummary) -> String {
    let date: String = activity.start_date.chars().take(10).collect();
    format!(
        "- {}: {} ({}km)",
        date,
        activity.name,
        format_km(activity.distance)
    )
}

/// One bullet line per activity, or [`NO_RUNS_FOUND`].
pub fn summarize_activities(activities: &[ActivitySummary]) -> String {
    if activities.is_empty() {
        return NO_RUNS_FOUND.to_string();
    }
    activities
        .iter()
        .map(format_activity)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct StravaStats {
    config: StravaConfig,
    client: reqwest::Client,
}

impl StravaStats {
    pub fn new(config: &StravaConfig) -> Self {
        Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Exchange the refresh token for an access token. `None` on a non-200.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Option<String>, ToolError> {
        let params = [
            ("client_id", self.config.client_id.as_deref().unwrap_or_default()),
            (
                "client_secret",
                self.config.client_secret.as_deref().unwrap_or_default(),
            ),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
            ("f", "json"),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), "Strava token refresh failed");
            return Ok(None);
        }

        let token: TokenResponse = response.json().await?;
        Ok(Some(token.access_token))
    }
}

#[async_trait]
impl Tool for StravaStats {
    type Args = StravaArgs;

    fn id(&self) -> ToolId {
        ToolId::GetStravaStats
    }

    fn description(&self) -> &str {
        "Get the user's recent run stats from Strava"
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: StravaArgs) -> Result<String, ToolError> {
        let Some(refresh_token) = self.config.refresh_token.as_deref() else {
            return Ok(STRAVA_KEYS_MISSING.to_string());
        };

        let Some(access_token) = self.refresh_access_token(refresh_token).await? else {
            return Ok(TOKEN_REFRESH_FAILED.to_string());
        };

        let url = format!(
            "{}/athlete/activities",
            self.config.api_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .query(&[("per_page", ACTIVITY_WINDOW)])
            .bearer_auth(&access_token)
            .send()
            .await?;

        // Reported to the model as text rather than as a failure.
        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), "Strava activity fetch failed");
            return Ok(ACTIVITIES_API_ERROR.to_string());
        }

        let activities: Vec<ActivitySummary> = response.json().await?;
        let summary = summarize_activities(&activities);
        if activities.is_empty() {
            tracing::debug!(count = 0, "No Strava activities in window");
        } else {
            tracing::debug!(count = activities.len(), "Strava data found:\n{}", summary);
        }

        Ok(summary)
    }
}
