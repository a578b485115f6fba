//! Weather proxy
//!
//! Forwards a city query to OpenWeatherMap and relays the provider's JSON
//! unchanged. Error messages never carry the request URL, which holds the key.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::{Result, TravelPlannerError};

/// Unit system requested from the provider; temperatures come back in Celsius.
const UNITS: &str = "metric";

const USER_AGENT: &str = concat!("travel-planner/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for `city`, in the provider's own response shape
    async fn current_weather(&self, city: &str) -> Result<Value>;
}

/// Validate the city and forward it to the provider
pub async fn get_weather(provider: &dyn WeatherProvider, city: Option<&str>) -> Result<Value> {
    let city = city
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| TravelPlannerError::missing_parameter("city"))?;

    provider.current_weather(city).await
}

/// OpenWeatherMap current-weather client
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                TravelPlannerError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<Value> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TravelPlannerError::external_provider("WEATHER_API_KEY is not configured")
        })?;

        let url = format!("{}/weather", self.base_url);
        debug!("Requesting current weather from {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", UNITS)])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Weather API Error: {}", e);
                TravelPlannerError::external_provider(format!("Weather request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Weather API returned HTTP {} for '{}'", status, city);
            return Err(TravelPlannerError::external_provider(format!(
                "Weather API request failed with status: {status}"
            )));
        }

        let report: Value = response.json().await.map_err(|e| {
            TravelPlannerError::external_provider(format!(
                "Invalid weather data received: {}",
                e.without_url()
            ))
        })?;

        info!(
            "Retrieved weather for '{}' in {:.3}s",
            city,
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }
}
