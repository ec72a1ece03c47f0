//! Tools the model may call, and the registry that advertises and dispatches them.
//!
//! Dispatch goes through a closed set of [`ToolId`]s. A name the model makes
//! up is not an error: it answers with [`UNKNOWN_TOOL_RESULT`] and the
//! conversation carries on.

mod strava;
mod weather;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::llm::{FunctionSchema, ToolSchema};

pub use strava::{
    format_km, summarize_activities, ActivitySummary, StravaArgs, StravaStats, ACTIVITIES_API_ERROR,
    ACTIVITY_WINDOW, NO_RUNS_FOUND, STRAVA_KEYS_MISSING, TOKEN_REFRESH_FAILED,
};
pub use weather::{Weather, WeatherArgs, SIMULATED_WEATHER, WEATHER_FETCH_ERROR};

/// Result handed back to the model for a tool name it invented.
pub const UNKNOWN_TOOL_RESULT: &str = "Error";

/// Identifier of every tool the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    GetWeather,
    GetStravaStats,
}

impl ToolId {
    /// Name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            ToolId::GetWeather => "get_weather",
            ToolId::GetStravaStats => "get_strava_stats",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "get_weather" => Some(ToolId::GetWeather),
            "get_strava_stats" => Some(ToolId::GetStravaStats),
            _ => None,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Malformed arguments for {tool}: {source}")]
    MalformedArguments {
        tool: ToolId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Tool request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from {tool}: {reason}")]
    UnexpectedResponse { tool: ToolId, reason: String },
}

/// Decoded arguments, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArgs {
    Weather(WeatherArgs),
    StravaStats(StravaArgs),
}

impl ToolArgs {
    /// Decode the model's JSON argument blob for `tool`.
    ///
    /// A blank blob is read as `{}`.
    pub fn decode(tool: ToolId, raw: &str) -> Result<Self, ToolError> {
        let raw = if raw.trim().is_empty() { "{}" } else { raw };
        let malformed = |source| ToolError::MalformedArguments { tool, source };

        match tool {
            ToolId::GetWeather => serde_json::from_str(raw)
                .map(ToolArgs::Weather)
                .map_err(malformed),
            ToolId::GetStravaStats => serde_json::from_str(raw)
                .map(ToolArgs::StravaStats)
                .map_err(malformed),
        }
    }
}

/// A single capability exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    type Args: DeserializeOwned + Send;

    fn id(&self) -> ToolId;

    /// Tells the model when to use the tool.
    fn description(&self) -> &str;

    /// JSON schema of the arguments.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Self::Args) -> Result<String, ToolError>;

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            tool_type: "function".to_string(),
            function: FunctionSchema {
                name: self.id().name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters_schema(),
            },
        }
    }
}

/// The fixed set of tools, built once at startup.
pub struct ToolRegistry {
    weather: Weather,
    strava: StravaStats,
}

impl ToolRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            weather: Weather::new(&config.weather),
            strava: StravaStats::new(&config.strava),
        }
    }

    /// Schemas advertised to the model.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        vec![self.weather.schema(), self.strava.schema()]
    }

    /// Run the tool the model asked for.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        let Some(tool) = ToolId::from_name(name) else {
            tracing::warn!(tool = name, "Model requested an unknown tool");
            return Ok(UNKNOWN_TOOL_RESULT.to_string());
        };

        match ToolArgs::decode(tool, arguments)? {
            ToolArgs::Weather(args) => self.weather.execute(args).await,
            ToolArgs::StravaStats(args) => self.strava.execute(args).await,
        }
    }
}
