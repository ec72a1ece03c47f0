//! Configuration management for the coach backend.
//!
//! Configuration is read once from environment variables:
//! - `OPENAI_API_KEY` - Optional. Without it every model call fails upstream.
//! - `OPENAI_MODEL` - Optional. Chat model to use. Defaults to `gpt-4o-mini`.
//! - `OPENAI_BASE_URL` - Optional. Defaults to `https://api.openai.com/v1`.
//! - `OPENWEATHER_API_KEY` - Optional. Without it the weather tool answers with a simulated reading.
//! - `OPENWEATHER_BASE_URL` - Optional. Defaults to `http://api.openweathermap.org`.
//! - `STRAVA_REFRESH_TOKEN` - Optional. Without it the Strava tool reports missing keys.
//! - `STRAVA_CLIENT_ID` / `STRAVA_CLIENT_SECRET` - Optional. Used for the token refresh.
//! - `STRAVA_TOKEN_URL` - Optional. Defaults to `https://www.strava.com/oauth/token`.
//! - `STRAVA_API_BASE_URL` - Optional. Defaults to `https://www.strava.com/api/v3`.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//!
//! Variables set to an empty string are treated as unset.

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WEATHER_BASE_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
pub const DEFAULT_STRAVA_API_BASE_URL: &str = "https://www.strava.com/api/v3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// OpenWeather settings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// API key; `None` switches the tool to its simulated reading
    pub api_key: Option<String>,

    /// Base URL, without the `/data/2.5/weather` path
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }
}

/// Strava settings.
#[derive(Debug, Clone)]
pub struct StravaConfig {
    /// Long-lived refresh token obtained once with `strava-token`
    pub refresh_token: Option<String>,

    pub client_id: Option<String>,

    pub client_secret: Option<String>,

    /// OAuth token endpoint
    pub token_url: String,

    /// REST API base (`.../api/v3`)
    pub api_base_url: String,
}

impl Default for StravaConfig {
    fn default() -> Self {
        Self {
            refresh_token: None,
            client_id: None,
            client_secret: None,
            token_url: DEFAULT_STRAVA_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_STRAVA_API_BASE_URL.to_string(),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key (empty when unset)
    pub openai_api_key: String,

    /// Chat model identifier
    pub model: String,

    /// OpenAI-compatible API base URL
    pub openai_base_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Weather tool settings
    pub weather: WeatherConfig,

    /// Strava tool settings
    pub strava: StravaConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let weather = WeatherConfig {
            api_key: var("OPENWEATHER_API_KEY"),
            base_url: var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
        };

        let strava = StravaConfig {
            refresh_token: var("STRAVA_REFRESH_TOKEN"),
            client_id: var("STRAVA_CLIENT_ID"),
            client_secret: var("STRAVA_CLIENT_SECRET"),
            token_url: var("STRAVA_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_TOKEN_URL.to_string()),
            api_base_url: var("STRAVA_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_API_BASE_URL.to_string()),
        };

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY").unwrap_or_default(),
            model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            weather,
            strava,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(openai_api_key: String, model: String) -> Self {
        Self {
            openai_api_key,
            model,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            weather: WeatherConfig::default(),
            strava: StravaConfig::default(),
        }
    }
}
