//! Current weather lookup via OpenWeather.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolError, ToolId};
use crate::config::WeatherConfig;

/// Returned when no API key is configured.
pub const SIMULATED_WEATHER: &str = "Simulated: Sunny, 25°C";

pub const WEATHER_FETCH_ERROR: &str = "Error fetching weather.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherArgs {
    pub city: String,
}

/// Current conditions for a city, as `"<description>, <temp>°C"`.
pub struct Weather {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    // Kept as the raw JSON number so it prints exactly as the API sent it.
    temp: serde_json::Number,
}

impl Weather {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Tool for Weather {
    type Args = WeatherArgs;

    fn id(&self) -> ToolId {
        ToolId::GetWeather
    }

    fn description(&self) -> &str {
        "Get current weather for a city"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })
    }

    async fn execute(&self, args: WeatherArgs) -> Result<String, ToolError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(SIMULATED_WEATHER.to_string());
        };

        let url = format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", args.city.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), city = %args.city, "Weather lookup failed");
            return Ok(WEATHER_FETCH_ERROR.to_string());
        }

        let data: CurrentWeather = response.json().await?;
        let condition = data
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::UnexpectedResponse {
                tool: ToolId::GetWeather,
                reason: "no weather conditions in response".to_string(),
            })?;

        Ok(format!("{}, {}°C", condition.description, data.main.temp))
    }
}
